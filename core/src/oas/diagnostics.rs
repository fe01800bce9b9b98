#![deny(missing_docs)]

//! # Diagnostics
//!
//! Collects non-fatal findings (resolution gaps, renamed enum cases) so generation can
//! make forward progress on incomplete documents. Threaded explicitly through the pipeline.

use serde::Serialize;
use std::fmt;

/// A non-fatal finding reported alongside the generated model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Where it happened (e.g. `GET /pets/{id} response`, `Pet.owner`).
    pub location: String,
    /// What happened.
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Ordered warning sink.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and mirrors it to the log.
    pub fn warn(&mut self, location: impl Into<String>, message: impl Into<String>) {
        let warning = Warning {
            location: location.into(),
            message: message.into(),
        };
        tracing::debug!(location = %warning.location, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Recorded warnings, in order.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of warnings.
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consumes the collector.
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn("Pet.owner", "first");
        diagnostics.warn("GET /pets", "second");

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.warnings()[0].to_string(), "Pet.owner: first");
        assert_eq!(diagnostics.into_warnings()[1].message, "second");
    }
}
