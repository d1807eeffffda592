//! casimir-sweep CLI entry point.

use clap::Parser;

use casimir_sweep::cli::{handle_error, Cli, Commands};
use casimir_sweep::infrastructure::config::ConfigLoader;
use casimir_sweep::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let logger = match LoggerImpl::init(&LogConfig::from_settings(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Run(args) => casimir_sweep::cli::commands::run::execute(args, config, cli.json).await,
        Commands::Nodes(args) => {
            casimir_sweep::cli::commands::nodes::execute(args, config, cli.json).await
        }
        Commands::Config(args) => {
            casimir_sweep::cli::commands::config::execute(args, config, cli.json).await
        }
    };

    if let Err(err) = result {
        // Flush the file appender before exiting
        drop(logger);
        handle_error(err, cli.json);
    }
}
