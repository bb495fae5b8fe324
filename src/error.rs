//! Error type shared by the overlay model.

use thiserror::Error;

/// Errors raised by the overlay model.
///
/// Geometry queries never fail: degenerate footprints produce non-finite or
/// empty results instead. Only argument validation and tiepoint I/O report
/// errors.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("tiepoint I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl OverlayError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        OverlayError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, OverlayError>;
