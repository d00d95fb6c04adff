use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchdayError {
    /// Scoring was asked to compare a prediction or lineup that is absent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A store operation received an empty identifier.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("rule configuration error: {0}")]
    RuleConfig(String),

    /// An external lineup or prediction lookup failed.
    #[error("source error: {0}")]
    Source(String),

    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MatchdayError>;
