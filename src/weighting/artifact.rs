use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::Paper;

/// Paper as written to the network file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperEntry {
    pub id: String,
    pub src: String,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "pubYear")]
    pub pub_year: i32,
    #[serde(rename = "citedCount")]
    pub cited_count: u64,
    /// Ids this paper references
    pub links: Vec<String>,
}

impl PaperEntry {
    pub fn from_paper(paper: &Paper, links: Vec<String>) -> Self {
        Self {
            id: paper.id.clone(),
            src: paper.source.clone(),
            title: paper.title.clone(),
            authors: paper.authors.clone(),
            pub_year: paper.pub_year,
            cited_count: paper.cited_count,
            links,
        }
    }
}

/// `[citing, cited, weight]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedLink(pub String, pub String, pub f64);

/// The weighted citation network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkArtifact {
    pub papers: BTreeMap<String, PaperEntry>,
    pub links: Vec<WeightedLink>,
}

impl NetworkArtifact {
    pub fn weight_of(&self, citing: &str, cited: &str) -> Option<f64> {
        self.links
            .iter()
            .find(|link| link.0 == citing && link.1 == cited)
            .map(|link| link.2)
    }
}
