//! Error types for the inventory codec.

use thiserror::Error;

/// Error variants for codec and pipeline operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A codec was handed an empty string; there is nothing to build a
    /// frequency table or narrow an interval from.
    #[error("empty input")]
    EmptyInput,

    /// The bit stream ended before the expected number of symbols was decoded.
    #[error("truncated code: decoded {decoded} of {expected} symbols")]
    TruncatedCode {
        /// Symbols decoded before the stream ran out.
        decoded: usize,
        /// Symbols requested.
        expected: usize,
    },

    /// Bits remained after the expected number of symbols was decoded.
    #[error("{0} trailing bits after the last symbol")]
    TrailingBits(usize),

    /// A bit unit held something other than 0 or 1.
    #[error("invalid bit value: {0}")]
    InvalidBit(u8),

    /// A changelog or search payload is valid JSON but not a usable record.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// An input line is not valid UTF-8.
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A JSON payload could not be parsed or written.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration sources could not be read or deserialized.
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    /// An I/O error occurred while reading or writing a file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
