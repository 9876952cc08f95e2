use std::sync::Arc;

use clap::Parser;
use tool_tracker::{App, Cli, UreqTransport};
use tool_tracker_core::config::BASE_URL_ENV;
use tool_tracker_core::TrackerClient;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tool_tracker=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.client_config(std::env::var(BASE_URL_ENV).ok());
    tracing::debug!(base_url = %config.base_url, "configuration resolved");

    let app = App::new(
        TrackerClient::new(&config.base_url),
        Arc::new(UreqTransport::new()),
        cli.format,
    );
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(app.run(cli.command))?;
    println!("{}", output.trim_end());
    Ok(())
}
