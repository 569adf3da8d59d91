//! Error and diagnostic system for the Meridian parser.
//!
//! The system is built around the [`Diagnostic`] type, which represents a
//! single error or warning with an optional [`ErrorCode`], one or more
//! labeled source spans, and help text. Multiple diagnostics are wrapped in
//! [`ParseError`] for returning from the parsing lifecycle (lexing collects
//! several per pass; parsing stops at the first).
//!
//! # Example
//!
//! ```
//! # use meridian_parser::error::{Diagnostic, ErrorCode};
//! # use meridian_parser::Span;
//!
//! let arrow_span = Span::new(42..44);
//!
//! let diag = Diagnostic::error("lost messages must be synchronous")
//!     .with_code(ErrorCode::E210)
//!     .with_label(arrow_span, "asynchronous arrow")
//!     .with_help("use `->` instead of `~>`");
//! ```

use std::fmt;

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;

/// A type alias for `Result<T, Diagnostic>` used inside the parser.
pub(crate) type Result<T> = std::result::Result<T, Diagnostic>;

/// Error type for the parsing lifecycle, wrapping one or more diagnostics.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{}", first)?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

/// A collector for accumulating diagnostics during a processing phase.
///
/// Lets the lexer report every problem in a single pass instead of failing
/// on the first error encountered.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection: `Err(ParseError)` with all diagnostics if any
    /// error was emitted, `Ok(())` otherwise.
    ///
    /// Note: warnings are currently discarded in the success case.
    pub fn finish(self) -> std::result::Result<(), ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(())
        }
    }
}
