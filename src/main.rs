mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use commands::{run_build, run_search};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => {
            run_build(args)?;
        }
        Commands::Search(args) => {
            run_search(args)?;
        }
    }

    Ok(())
}
