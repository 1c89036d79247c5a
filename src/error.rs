//! Crate-level error types.

use std::fmt;

/// Errors produced by the folio-motion crate.
///
/// Presentational failures (missing nodes, broken images, empty feeds) are
/// not errors; they degrade to a static layout inside the engine.
#[derive(Debug)]
pub enum MotionError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Testimonial feed could not be decoded.
    DataSource(String),
    /// Locale dictionary could not be decoded.
    Dictionary(String),
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::DataSource(msg) => {
                write!(f, "data source error: {msg}")
            }
            Self::Dictionary(msg) => write!(f, "dictionary error: {msg}"),
        }
    }
}

impl std::error::Error for MotionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MotionError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
