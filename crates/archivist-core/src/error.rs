use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A visit row carried a referrer type outside the known set. Visit rows are
    /// validated upstream, so this aborts the archiving task.
    #[error("unexpected referrer type on visit row: {0:?}")]
    UnexpectedRefererType(String),

    #[error("invalid period: {0}")]
    InvalidPeriod(String),
}
