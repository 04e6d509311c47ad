/// Domain-specific error types for the marketplace console.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("Wallet operation failed: {0}")]
    Wallet(String),

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("RPC operation failed: {0}")]
    Rpc(String),

    #[error("Marketplace SDK call failed: {0}")]
    Sdk(String),

    #[error("Process execution failed: {0}")]
    Process(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for MarketError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Convenience type alias.
pub type MarketResult<T> = Result<T, MarketError>;
