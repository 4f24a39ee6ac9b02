use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// All errors generated in `tradewatch-data`.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DataError {
    #[error("failed to connect to feed: {0}")]
    Connect(String),

    #[error("timed out connecting to feed after {timeout_secs} seconds")]
    ConnectTimeout { timeout_secs: u64 },

    #[error("SocketError: {0}")]
    Socket(String),

    #[error("feed stream ended: {0}")]
    StreamEnded(String),

    #[error("failed to serialise feed request: {0}")]
    Serialise(String),

    #[error("failed to deserialise feed message: {error}, payload: {payload}")]
    Deserialise { error: String, payload: String },

    #[error("invalid trade: {0}")]
    InvalidTrade(String),

    #[error("exchange error: {message} ({reason})")]
    Exchange { message: String, reason: String },
}

impl DataError {
    /// Determine if an error only affects a single inbound message, which is then discarded.
    ///
    /// Every other error ends the current connection and triggers a reconnect.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_malformed(&self) -> bool {
        match self {
            DataError::Deserialise { .. } | DataError::InvalidTrade(_) => true,
            DataError::Exchange { .. } => true,
            _ => false,
        }
    }
}

impl From<tungstenite::Error> for DataError {
    fn from(value: tungstenite::Error) -> Self {
        Self::Socket(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_is_malformed() {
        struct TestCase {
            input: DataError,
            expected: bool,
        }

        let tests = vec![
            TestCase {
                // TC0: malformed w/ DataError::Deserialise
                input: DataError::Deserialise {
                    error: "expected value".to_string(),
                    payload: "{".to_string(),
                },
                expected: true,
            },
            TestCase {
                // TC1: malformed w/ DataError::InvalidTrade
                input: DataError::InvalidTrade("price -1 is not positive".to_string()),
                expected: true,
            },
            TestCase {
                // TC2: malformed w/ DataError::Exchange
                input: DataError::Exchange {
                    message: "Failed to subscribe".to_string(),
                    reason: "XYZ-USD is not a valid product".to_string(),
                },
                expected: true,
            },
            TestCase {
                // TC3: not malformed w/ DataError::Socket
                input: DataError::from(tungstenite::Error::ConnectionClosed),
                expected: false,
            },
            TestCase {
                // TC4: not malformed w/ DataError::StreamEnded
                input: DataError::StreamEnded("no data for 120 seconds".to_string()),
                expected: false,
            },
            TestCase {
                // TC5: not malformed w/ DataError::ConnectTimeout
                input: DataError::ConnectTimeout { timeout_secs: 10 },
                expected: false,
            },
            TestCase {
                // TC6: not malformed w/ DataError::Serialise
                input: DataError::Serialise("key must be a string".to_string()),
                expected: false,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = test.input.is_malformed();
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }
}
