use std::io::stderr;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::{
    cli::{Cli, CliCommand},
    commands::Command,
};

pub async fn run() -> anyhow::Result<()> {
    let options = Cli::parse();
    tracing_subscriber::fmt()
        .compact()
        .with_max_level(level_filter(options.global.verbose))
        .with_writer(stderr)
        .init();

    let global = &options.global;
    match options.subcommand {
        CliCommand::Completions(command) => command.execute(global).await,
        CliCommand::Ls(command) => command.execute(global).await,
        CliCommand::Rm(command) => command.execute(global).await,
        CliCommand::Put(command) => command.execute(global).await,
        CliCommand::Get(command) => command.execute(global).await,
    }
}

/// Maps the number of `-v` flags to the most verbose level logged.
fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3.. => LevelFilter::TRACE,
    }
}
