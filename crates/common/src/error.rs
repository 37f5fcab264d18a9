//! Error types for Postwright.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostwrightError {
    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Memory error: {0}")]
    Memory(String),

    #[error("Social platform error: {0}")]
    Social(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timed out after {0} ms")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PostwrightError>;
