use clap::Parser;
use rustls::crypto::ring::default_provider;
use std::error::Error;
use tracing::{error, info};
use tradewatch_tui::{Cli, Dashboard, app, logging::init_logging, terminal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let log_file = cli.log_file.clone();
    let (dashboard_config, stream_config) = cli.into_configs()?;

    init_logging(log_file.as_deref())?;

    // Required by rustls 0.23 before the first wss:// handshake.
    let _ = default_provider().install_default();

    info!(
        pair = %dashboard_config.pair,
        candle_window = ?dashboard_config.candle_window,
        url = %stream_config.url,
        "starting tradewatch"
    );

    let mut tui = terminal::init()?;
    let result = app::run(&mut tui, Dashboard::new(dashboard_config), stream_config).await;
    terminal::restore(&mut tui)?;

    if let Err(error) = &result {
        error!(%error, "dashboard exited with error");
    }
    result.map_err(Into::into)
}
