//! Error types for Meridian pipeline operations.
//!
//! This module provides the main error type [`MeridianError`] which wraps
//! the error conditions of the full pipeline: reading input, parsing,
//! layout, and diagram usage.

use std::io;

use thiserror::Error;

use meridian_parser::error::ParseError;

use crate::{diagram::DiagramError, layout::LayoutError};

/// The main error type for Meridian operations.
///
/// The `Parse` variant keeps the source text alongside the structured
/// diagnostics so callers can render spans as line/column snippets.
#[derive(Debug, Error)]
pub enum MeridianError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Diagram error: {0}")]
    Diagram(#[from] DiagramError),
}

impl MeridianError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use meridian_parser::error::Diagnostic;

    use super::*;

    #[test]
    fn test_parse_error_display_uses_first_diagnostic() {
        let parse_err = ParseError::from(Diagnostic::error("undeclared participant `db`"));
        let err = MeridianError::new_parse_error(parse_err, "-> db;");

        assert_eq!(err.to_string(), "error: undeclared participant `db`");
    }

    #[test]
    fn test_diagram_error_conversion() {
        let err: MeridianError = DiagramError::NotLaidOut.into();
        assert!(matches!(err, MeridianError::Diagram(_)));
    }
}
