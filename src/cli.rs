use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "epmc-paper-network")]
#[command(about = "Crawl Europe PMC around a paper and build a weighted citation network")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the weighted citation network around an initial paper
    Build(BuildArgs),

    /// Search Europe PMC and write the matching papers as JSON lines
    Search(SearchArgs),
}

/// Remote service options shared by every subcommand
#[derive(Parser, Clone)]
pub struct ServiceArgs {
    /// Europe PMC REST base URL
    #[arg(long, default_value = "https://www.ebi.ac.uk/europepmc/webservices/rest/")]
    pub endpoint: String,

    /// Results per page
    #[arg(long, default_value = "1000")]
    pub page_size: u32,

    /// Concurrent HTTP requests per round
    #[arg(short, long, default_value = "64")]
    pub concurrency: usize,

    /// Timeout in seconds per request (0 disables it)
    #[arg(short, long, default_value = "30")]
    pub timeout: u64,
}

#[derive(Parser, Clone)]
pub struct BuildArgs {
    /// Identifier of the initial paper (e.g. a PubMed id)
    #[arg(short, long, required = true)]
    pub paper_id: String,

    /// Stop reference expansion once this many papers are known
    #[arg(long, default_value = "2000")]
    pub reference_threshold: usize,

    /// Stop relation backfill once this many papers are explored (-1 drains the frontier)
    #[arg(long, default_value = "5000", allow_negative_numbers = true)]
    pub explored_threshold: i64,

    /// Stop citation expansion once this many papers are known
    #[arg(long, default_value = "5000")]
    pub papers_threshold: usize,

    /// Frontier papers expanded per round
    #[arg(long, default_value = "10")]
    pub ref_buffer_size: usize,

    /// Relevant papers expanded per round during citation expansion
    #[arg(long, default_value = "2")]
    pub cit_buffer_size: usize,

    /// Weight added for every shared author
    #[arg(long, default_value = "1.0")]
    pub same_author_weight: f64,

    /// Directory for the network file
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Also write progress snapshots and the final network as JSON lines
    #[arg(long)]
    pub progress_file: Option<String>,

    #[command(flatten)]
    pub service: ServiceArgs,

    /// Logging level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}

#[derive(Parser, Clone)]
pub struct SearchArgs {
    /// Free-text query
    #[arg(short, long, required = true)]
    pub query: String,

    /// Output JSONL file
    #[arg(short, long, default_value = "papers.jsonl")]
    pub output: String,

    #[command(flatten)]
    pub service: ServiceArgs,

    /// Logging level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}
