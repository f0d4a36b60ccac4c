use thiserror::Error;

/// Errors that can occur while setting up a Kaiseki parser.
///
/// Parsing itself never fails: any file name, however malformed, produces a
/// [`ParseResult`](crate::ParseResult). These errors only surface when a
/// [`Parser`](crate::Parser) is constructed.
#[derive(Debug, Error)]
pub enum KaisekiError {
    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// The supplied parse options cannot be used.
    #[error("invalid parse options: {0}")]
    InvalidOptions(String),
}

/// Result type alias for Kaiseki operations.
pub type Result<T> = std::result::Result<T, KaisekiError>;
