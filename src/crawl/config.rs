use std::fmt;
use std::path::PathBuf;

use crate::error::{NetworkError, Result};
use crate::query::QuerySettings;

/// Papers per mined-term batch
pub const MINED_TERMS_BUFFER_SIZE: usize = 10;

/// When the relation backfill stage stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExploredTarget {
    /// Stop once this many papers are explored (or the frontier empties)
    Count(usize),
    /// Keep going until the frontier is empty
    DrainFrontier,
}

impl ExploredTarget {
    /// Decode the command-line form, where -1 means "drain the frontier"
    pub fn from_raw(raw: i64) -> Result<Self> {
        match raw {
            -1 => Ok(ExploredTarget::DrainFrontier),
            n if n >= 0 => Ok(ExploredTarget::Count(n as usize)),
            n => Err(NetworkError::invalid(format!(
                "explored threshold: expected -1 or a non-negative count, found {}",
                n
            ))),
        }
    }

    pub fn as_raw(&self) -> i64 {
        match self {
            ExploredTarget::Count(n) => *n as i64,
            ExploredTarget::DrainFrontier => -1,
        }
    }
}

impl fmt::Display for ExploredTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_raw())
    }
}

/// Parameters of one network build
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub initial_paper_id: String,
    /// Stage 0 stops once the catalog reaches this size
    pub reference_threshold: usize,
    /// Stage 4 stop condition
    pub explored_threshold: ExploredTarget,
    /// Stage 3 stops once the catalog reaches this size
    pub papers_threshold: usize,
    /// Frontier papers expanded per round in stages 0 and 4
    pub ref_buffer_size: usize,
    /// Candidates expanded per round in stage 3
    pub cit_buffer_size: usize,
    pub same_author_weight: f64,
    pub terms_buffer_size: usize,
    pub query: QuerySettings,
    /// Where the final artifact is written; `None` keeps it in memory only
    pub output_dir: Option<PathBuf>,
}

impl CrawlConfig {
    pub fn new(initial_paper_id: impl Into<String>) -> Self {
        Self {
            initial_paper_id: initial_paper_id.into(),
            reference_threshold: 2000,
            explored_threshold: ExploredTarget::Count(5000),
            papers_threshold: 5000,
            ref_buffer_size: 10,
            cit_buffer_size: 2,
            same_author_weight: 1.0,
            terms_buffer_size: MINED_TERMS_BUFFER_SIZE,
            query: QuerySettings::default(),
            output_dir: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_paper_id.trim().is_empty() {
            return Err(NetworkError::invalid("initial paper id must not be empty"));
        }
        if self.ref_buffer_size == 0 || self.cit_buffer_size == 0 || self.terms_buffer_size == 0 {
            return Err(NetworkError::invalid(format!(
                "buffer sizes must be at least 1 (references {}, citations {}, terms {})",
                self.ref_buffer_size, self.cit_buffer_size, self.terms_buffer_size
            )));
        }
        if !self.same_author_weight.is_finite() {
            return Err(NetworkError::invalid(format!(
                "same author weight must be finite, found {}",
                self.same_author_weight
            )));
        }
        if self.query.page_size == 0 {
            return Err(NetworkError::invalid("page size must be at least 1"));
        }
        Ok(())
    }
}
