//! Error type for clock operations

use thiserror::Error;

/// Errors surfaced by [`LedClock`](crate::LedClock) operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The tick timer backend refused to start or stop
    #[error("tick timer failure: {0}")]
    Timer(String),

    /// The configured timezone is not a known IANA zone
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),
}

pub type Result<T> = std::result::Result<T, ClockError>;
