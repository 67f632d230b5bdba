use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use epmc_paper_network::common::{format_elapsed, setup_logging};
use epmc_paper_network::query::{HttpTransport, QueryClient};

use super::query_settings;
use crate::cli::SearchArgs;

pub async fn run_search_async(args: SearchArgs) -> Result<usize> {
    let start_time = Instant::now();

    setup_logging(&args.log_level)?;

    info!("Searching Europe PMC for {:?}", args.query);
    info!("Output: {}", args.output);

    let settings = query_settings(&args.service);
    let timeout = match settings.timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let transport = HttpTransport::new(&settings.endpoint, timeout)
        .context("Failed to create HTTP client")?;
    let client = QueryClient::new(Arc::new(transport), settings);

    let papers = client
        .search_papers(&args.query)
        .await
        .with_context(|| format!("Search failed for {:?}", args.query))?;

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create output file: {}", args.output))?;
    let mut writer = BufWriter::new(file);
    for paper in &papers {
        let json_line = serde_json::to_string(paper)?;
        writeln!(writer, "{}", json_line)?;
    }
    writer.flush()?;

    info!(
        "Wrote {} paper(s) to {} in {}",
        papers.len(),
        args.output,
        format_elapsed(start_time.elapsed())
    );
    Ok(papers.len())
}

pub fn run_search(args: SearchArgs) -> Result<usize> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_search_async(args))
}
