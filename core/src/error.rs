use thiserror::Error;

/// Error type for gas definitions and gas name parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GasError {
    #[error("invalid gas fractions: O2 {o2}, He {he} (each must be 0-1 and their sum at most 1)")]
    InvalidFractions { o2: f64, he: f64 },

    #[error("parse error at position {position}: {message}")]
    ParseError { position: usize, message: String },

    #[error("unknown gas: {0}")]
    UnknownGas(String),
}

/// Error type for consumption, decompression and bottom time planning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("profile needs to contain at least {required} segments, got {got}")]
    TooFewSegments { required: usize, got: usize },

    #[error("emergency ascent needs to contain at least 1 segment")]
    EmptyEmergencyAscent,

    #[error("at least one tank is required")]
    NoTanks,

    #[error("segment references tank {index}, but only {count} tanks are available")]
    UnknownTank { index: usize, count: usize },

    #[error("invalid search range: {0}")]
    InvalidSearch(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("decompression at {depth} m exceeds the maximum stop duration")]
    DecompressionTooLong { depth: f64 },

    #[error(transparent)]
    Gas(#[from] GasError),
}
