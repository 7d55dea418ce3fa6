#![cfg(not(tarpaulin_include))]

use clap::Parser;
use survey_syntax::app;
use survey_syntax::config::ServerConfig;

/// Main entry point for the syntax generator web server
///
/// Reads the configuration from the command line and environment, initialises
/// logging (`RUST_LOG` overrides the default `info` level) and serves the API.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();
    log::info!("Starting syntax generator on {}", config.address());

    app::run(config).await
}
