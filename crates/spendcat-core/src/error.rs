//! Error types for spendcat

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema error in column '{column}': {message}")]
    Schema { column: String, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Model has not been fit; call fit before predict")]
    ModelNotFit,

    #[error("Model error: {0}")]
    Model(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Build a schema error for a named column
    pub fn schema(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
