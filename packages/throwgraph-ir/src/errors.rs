//! Error types for throwgraph-ir
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

/// Main error type for throwgraph-ir operations
#[derive(Debug, Error)]
pub enum ThrowgraphError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fragment file could not be parsed (after the backslash-strip retry)
    #[error("Malformed fragment: {0}")]
    Fragment(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Artifact serialization / shard writing error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ThrowgraphError {
    /// Create a fragment error
    pub fn fragment(msg: impl Into<String>) -> Self {
        ThrowgraphError::Fragment(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ThrowgraphError::Config(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        ThrowgraphError::Storage(msg.into())
    }
}

/// Result type alias for throwgraph operations
pub type Result<T> = std::result::Result<T, ThrowgraphError>;
