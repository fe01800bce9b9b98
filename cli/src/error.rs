#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use apigen_core::AppError;
use derive_more::{Display, From};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Failure inside the generation pipeline.
    #[display("{}", _0)]
    Core(AppError),

    /// The model could not be written as JSON.
    #[from(ignore)]
    #[display("JSON Error: {}", _0)]
    Json(String),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// `General(String)` holds a plain `String`, so `derive(Error)` cannot supply `source()`.
impl std::error::Error for CliError {}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Json(err.to_string())
    }
}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
