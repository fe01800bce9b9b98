//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Only fatal conditions live here. Resolution gaps are not errors; they are
//! collected as warnings by [`crate::oas::diagnostics::Diagnostics`].

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The document text or tree could not be deserialized.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// The identifier disambiguator ran out of attempts within a scope.
    #[from(ignore)]
    #[display("Too many similar names for '{name}' in scope '{scope}' (gave up after {attempts} attempts)")]
    NameExhausted {
        /// Label of the scope being filled (e.g. `client Pets`).
        scope: String,
        /// The candidate that kept colliding.
        name: String,
        /// Number of suffixes tried.
        attempts: usize,
    },

    /// Inline schema synthesis revisited a type it was still building.
    #[from(ignore)]
    #[display("schema reference cycle detected at `{path}`")]
    SchemaCycle {
        /// Slash separated trail of type and property names.
        path: String,
    },

    /// The operation path filter is not a valid regular expression.
    #[from(ignore)]
    #[display("Invalid filter: {_0}")]
    InvalidFilter(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
