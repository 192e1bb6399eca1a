mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Command};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Dump { file } => commands::dump::run(&file),
        Command::Run { file, args } => commands::run::run(&file, &args),
    }
}
