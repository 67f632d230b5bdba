pub mod catalog;
pub mod frontier;
pub mod relations;
pub mod state;
pub mod terms;
pub mod words;

pub use catalog::*;
pub use frontier::*;
pub use relations::*;
pub use state::CrawlState;
pub use terms::*;
pub use words::*;
