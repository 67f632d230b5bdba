pub mod logging;
pub mod output;
pub mod types;
pub mod utils;

pub use logging::*;
pub use output::{artifact_file_name, write_json};
pub use types::*;
pub use utils::*;
