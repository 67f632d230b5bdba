//! Europe PMC citation-network exploration.
//!
//! Starting from one paper, [`crawl::build_paper_network`] walks references
//! and citations through the Europe PMC REST service, enriches papers with
//! text-mined terms and emits a weighted citation network.

pub mod common;
pub mod crawl;
pub mod error;
pub mod network;
pub mod query;
pub mod remote;
pub mod weighting;

pub use crawl::{build_paper_network, CrawlConfig, ExploredTarget};
pub use error::{NetworkError, Result};
