use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{NetworkError, Result};

/// Reference to a paper in a given bibliographic source (e.g. "MED", "PMC")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaperRef {
    pub source: String,
    pub id: String,
}

impl PaperRef {
    /// Build a validated reference; both parts must be non-empty
    pub fn new(source: impl Into<String>, id: impl Into<String>) -> Result<Self> {
        let paper = Self {
            source: source.into(),
            id: id.into(),
        };
        paper.validate()?;
        Ok(paper)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() || self.id.trim().is_empty() {
            return Err(NetworkError::invalid(format!(
                "paper reference: expected non-empty (source, id), found ({:?}, {:?})",
                self.source, self.id
            )));
        }
        Ok(())
    }
}

impl fmt::Display for PaperRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.id)
    }
}

/// Paper metadata as first observed in a query response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub id: String,
    pub source: String,
    pub title: String,
    pub authors: Vec<String>,
    pub pub_year: i32,
    pub cited_count: u64,
}

impl Paper {
    pub fn key(&self) -> PaperRef {
        PaperRef {
            source: self.source.clone(),
            id: self.id.clone(),
        }
    }
}

// Identity is the (source, id) pair, metadata is ignored
impl PartialEq for Paper {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.id == other.id
    }
}

impl Eq for Paper {}

impl Hash for Paper {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.id.hash(state);
    }
}

/// Summary of a finished build, reported by the CLI
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    pub papers_found: usize,
    pub papers_explored: usize,
    pub relations_found: usize,
    pub papers_with_terms: usize,
    pub unresolved_queries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(source: &str, id: &str, title: &str) -> Paper {
        Paper {
            id: id.to_string(),
            source: source.to_string(),
            title: title.to_string(),
            authors: vec![],
            pub_year: 2001,
            cited_count: 0,
        }
    }

    #[test]
    fn test_paper_ref_rejects_empty_parts() {
        assert!(PaperRef::new("MED", "123").is_ok());
        assert!(matches!(
            PaperRef::new("", "123"),
            Err(NetworkError::InvalidArgument(_))
        ));
        assert!(matches!(
            PaperRef::new("MED", "  "),
            Err(NetworkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_paper_equality_uses_source_and_id() {
        assert_eq!(paper("MED", "1", "A"), paper("MED", "1", "B"));
        assert_ne!(paper("MED", "1", "A"), paper("PMC", "1", "A"));
    }

    #[test]
    fn test_paper_ref_display() {
        let key = paper("MED", "42", "T").key();
        assert_eq!(key.to_string(), "MED:42");
    }
}
