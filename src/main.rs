mod cli;
mod commands;
mod config;
mod error;
mod infiniband;
mod output;

use clap::Parser;
use cli::Cli;
use commands::handle_facts_command;
use config::load_config;
use error::FactsError;
use infiniband::{HostSystem, InfinibandProbe};
use output::print_error;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), FactsError> {
    let config = load_config(cli.config.as_deref())?;
    let system = HostSystem;
    let probe = InfinibandProbe::new(&system, &config);
    handle_facts_command(&cli.command, &probe)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
