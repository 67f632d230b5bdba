use log::warn;
use std::collections::HashMap;

use crate::common::{Paper, PaperRef};

/// Result of offering a paper to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogInsert {
    Added,
    /// Same (source, id) already known; first copy kept
    Duplicate,
    /// Same id already known under another source; first copy kept
    Collision,
}

/// Known papers keyed by identifier, in discovery order.
///
/// Identifiers are assumed unique across sources within one run. A paper whose
/// id is already taken by another source is rejected and logged.
#[derive(Debug, Default, Clone)]
pub struct PaperCatalog {
    papers: HashMap<String, Paper>,
    order: Vec<String>,
}

impl PaperCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, paper: Paper) -> CatalogInsert {
        if let Some(existing) = self.papers.get(&paper.id) {
            if existing.source == paper.source {
                return CatalogInsert::Duplicate;
            }
            warn!(
                "Identifier collision: {} already known as {}, ignoring {}",
                paper.id,
                existing.key(),
                paper.key()
            );
            return CatalogInsert::Collision;
        }
        self.order.push(paper.id.clone());
        self.papers.insert(paper.id.clone(), paper);
        CatalogInsert::Added
    }

    pub fn get(&self, id: &str) -> Option<&Paper> {
        self.papers.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.papers.contains_key(id)
    }

    pub fn paper_ref(&self, id: &str) -> Option<PaperRef> {
        self.get(id).map(Paper::key)
    }

    /// Papers in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &Paper> {
        self.order.iter().filter_map(|id| self.papers.get(id))
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}
