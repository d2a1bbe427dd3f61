use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed registry or config. Fatal at startup — the process
    /// refuses to run rather than substitute defaults.
    #[error("Configuration fault: {0}")]
    Config(String),

    /// Clock skew guard: a region's last_update lies in the future.
    #[error("Negative elapsed time: {hours} hours")]
    NegativeElapsed { hours: f64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
