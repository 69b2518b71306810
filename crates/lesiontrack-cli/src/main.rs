use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use lesiontrack_cli::{run, Cli, LogRepaint, Session};
use lesiontrack_validation::config::load_config;
use lesiontrack_validation::ValidatorConfig;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ValidatorConfig::default(),
    };

    let session = Session::load(&cli.session)?;
    let report = run(session, &config, &LogRepaint);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
