use thiserror::Error;

/// All errors generated in `tradewatch-tui`.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
