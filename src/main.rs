//! fsindexer CLI: index directories into SQLite, then count or query the result.

use anyhow::Result;
use clap::Parser;
use fsindexer::engine::arg_parser::Cli;
use fsindexer::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
