use anyhow::Result;
use clap::Parser;
use log::debug;
use projsplit::cli;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    cli::init_logging(&args);
    debug!("Starting projsplit v{}", env!("CARGO_PKG_VERSION"));

    cli::run(args)
}
