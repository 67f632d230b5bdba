use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use epmc_paper_network::common::{format_elapsed, setup_logging, BuildStats};
use epmc_paper_network::crawl::{
    ConsoleListener, CrawlConfig, ExploredTarget, FrontierEngine, JsonLinesListener, MultiListener,
};
use epmc_paper_network::query::HttpTransport;

use super::query_settings;
use crate::cli::BuildArgs;

fn crawl_config(args: &BuildArgs) -> Result<CrawlConfig> {
    let mut config = CrawlConfig::new(args.paper_id.clone());
    config.reference_threshold = args.reference_threshold;
    config.explored_threshold = ExploredTarget::from_raw(args.explored_threshold)?;
    config.papers_threshold = args.papers_threshold;
    config.ref_buffer_size = args.ref_buffer_size;
    config.cit_buffer_size = args.cit_buffer_size;
    config.same_author_weight = args.same_author_weight;
    config.query = query_settings(&args.service);
    config.output_dir = Some(PathBuf::from(&args.output_dir));
    config.validate()?;
    Ok(config)
}

pub async fn run_build_async(args: BuildArgs) -> Result<Option<BuildStats>> {
    let start_time = Instant::now();

    setup_logging(&args.log_level)?;

    info!("Starting Europe PMC paper network build");
    info!("Initial paper: {}", args.paper_id);
    info!("Endpoint: {}", args.service.endpoint);
    info!(
        "Thresholds: references {}, explored {}, papers {}",
        args.reference_threshold, args.explored_threshold, args.papers_threshold
    );
    info!(
        "Buffers: references {}, citations {}",
        args.ref_buffer_size, args.cit_buffer_size
    );

    let config = crawl_config(&args)?;
    if !PathBuf::from(&args.output_dir).is_dir() {
        bail!("Output directory does not exist: {}", args.output_dir);
    }

    let timeout = match config.query.timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let transport = HttpTransport::new(&config.query.endpoint, timeout)
        .context("Failed to create HTTP client")?;

    let mut listener = MultiListener::new().with(Box::new(ConsoleListener::new()));
    if let Some(path) = &args.progress_file {
        let sink = JsonLinesListener::create(Path::new(path))
            .with_context(|| format!("Failed to create progress file: {}", path))?;
        listener = listener.with(Box::new(sink));
    }

    let engine = FrontierEngine::new(&config, Arc::new(transport), &listener)?;
    let Some(report) = engine.run().await.context("Network build failed")? else {
        warn!("Initial paper {} not found, nothing written", args.paper_id);
        return Ok(None);
    };

    let stats = report.stats;
    info!("==================== FINAL SUMMARY ====================");
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));
    info!("Initial paper: {}", report.initial);
    info!("Papers found: {}", stats.papers_found);
    info!("Papers explored: {}", stats.papers_explored);
    info!("Relations found: {}", stats.relations_found);
    info!("Papers with mined terms: {}", stats.papers_with_terms);
    if stats.unresolved_queries > 0 {
        warn!("Unresolved queries: {}", stats.unresolved_queries);
    }
    if let Some(path) = &report.output_path {
        info!("Output: {}", path.display());
    }
    info!("========================================================");

    Ok(Some(stats))
}

pub fn run_build(args: BuildArgs) -> Result<Option<BuildStats>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_build_async(args))
}
