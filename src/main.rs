//! corenlp-client CLI entry point.

use clap::Parser;

use corenlp_client::cli::{self, Cli};
use corenlp_client::infrastructure::config::ConfigLoader;
use corenlp_client::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => cli::handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => cli::handle_error(err, cli.json),
    };

    if let Err(err) = cli::run(cli.command, &config, cli.json).await {
        cli::handle_error(err, cli.json);
    }
}
