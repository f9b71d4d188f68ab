//! Error types for Dropcast

use std::path::PathBuf;

/// Result type alias using Dropcast's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Dropcast operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model artifact is missing, corrupt, or in an incompatible format
    #[error("failed to load model from {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },

    /// Input is not a table, a flat sequence, or a named mapping
    #[error("unsupported input type: {0}")]
    UnsupportedInput(String),

    /// Schema mismatch or model-internal failure during prediction
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new model load error
    pub fn model_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new unsupported input error
    pub fn unsupported_input(msg: impl Into<String>) -> Self {
        Self::UnsupportedInput(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short machine-readable name of the error kind, used for metrics labels
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelLoad { .. } => "model_load",
            Self::UnsupportedInput(_) => "unsupported_input",
            Self::Inference(_) => "inference",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}
