//! Staged frontier exploration around an initial paper.

pub mod config;
pub mod engine;
pub mod progress;
pub mod relevance;

pub use config::*;
pub use engine::{build_paper_network, CrawlReport, FrontierEngine};
pub use progress::*;
pub use relevance::*;
