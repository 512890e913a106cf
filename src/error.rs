use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Storage error for {path}: {message}")]
    Storage { path: String, message: String },

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Notebook error: {0}")]
    Notebook(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ContextError {
    pub fn storage(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContextError>;
