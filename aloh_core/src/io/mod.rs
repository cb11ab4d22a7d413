//! Module for reading and writing catalogs and plans
pub mod json;

use thiserror::Error;

use crate::catalog::ValidationError;

/// Errors raised while reading or writing planning data
#[derive(Error, Debug)]
pub enum IoError {
    /// The file couldn't be read or written
    #[error("Unable to access file: {0}")]
    File(#[from] std::io::Error),
    /// The document isn't valid JSON or doesn't have the expected shape
    #[error("Unable to parse json: {0}")]
    Json(#[from] serde_json::Error),
    /// The document parsed, but describes an invalid catalog
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] ValidationError),
}
