use thiserror::Error;

/// Errors reported at the crate boundary.
///
/// Field arithmetic and the ladder are total and never fail; only operator
/// input and backend initialization can.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("secret key must be 32 bytes, got {0}")]
    InvalidScalarLength(usize),

    #[error("accelerated backend unavailable: {0}")]
    AcceleratorUnavailable(String),

    #[error("library backend not compiled in (enable the `dalek` feature)")]
    LibraryUnavailable,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}
