pub mod build;
pub mod search;

pub use build::run_build;
pub use search::run_search;

use epmc_paper_network::query::QuerySettings;

use crate::cli::ServiceArgs;

fn query_settings(args: &ServiceArgs) -> QuerySettings {
    QuerySettings {
        endpoint: args.endpoint.clone(),
        page_size: args.page_size,
        concurrency: args.concurrency,
        timeout_secs: args.timeout,
        ..QuerySettings::default()
    }
}
