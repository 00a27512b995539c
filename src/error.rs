use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid seed for {symbol}: {reason}")]
    InvalidSeed { symbol: String, reason: String },

    #[error("duplicate instrument symbol: {0}")]
    DuplicateSymbol(String),
}
