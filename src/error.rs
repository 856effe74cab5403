//! Error types for faults outside the detection itself.
//!
//! Lookup failures never show up here: they are absorbed into `None` by the
//! fetcher and resolver. These variants cover the adapter-level faults that
//! turn into a 500 response.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The response body could not be encoded
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    /// The detection task panicked or was cancelled
    #[error("detection task failed: {0}")]
    Task(String),
}
