mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use output::CliOutput;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        if let Some(harbor_error) = e.downcast_ref::<harbor::Error>() {
            eprintln!("Error: {}", harbor_error);
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let output = CliOutput;

    match &cli.command {
        Commands::Validate { file } => commands::validate(file, &output),
        Commands::Parse {
            file,
            target,
            load_env_files,
            pretty,
        } => commands::parse(file, target, *load_env_files, *pretty, &output),
        Commands::Merge {
            files,
            target,
            pretty,
        } => commands::merge(files, target, *pretty, &output),
    }
}
