//! Parser for the Meridian sequence language.
//!
//! This crate turns source text into a validated
//! [`Sequence`](meridian_core::sequence::Sequence) in two stages:
//!
//! 1. [`lexer::tokenize`] - error-recovering lexical analysis producing
//!    positioned tokens
//! 2. [`parser::parse_sequence`] - statement parsing with per-field
//!    evidence tracking, species classification, and participant
//!    resolution
//!
//! The convenience entry point [`parse`] runs both stages. All failures
//! are reported as [`error::ParseError`]s wrapping rich
//! [`error::Diagnostic`]s with source spans.
//!
//! # Example
//!
//! ```
//! let source = r#"
//!     actor user;
//!     component server;
//!
//!     -> server : "start" {
//!         -> * : "audit";
//!         return "ok";
//!     };
//! "#;
//!
//! let sequence = meridian_parser::parse(source).expect("valid source");
//! assert_eq!(sequence.entity_count(), 2);
//! assert_eq!(sequence.activations().len(), 1);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;

mod description;
mod species;
mod span;
mod tokens;


pub use span::{Span, Spanned};
pub use tokens::{PositionedToken, Token};

use meridian_core::sequence::Sequence;

use crate::error::ParseError;

/// Parse Meridian source text into a validated sequence.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every lexer diagnostic, or the first
/// parser diagnostic, encountered in the input.
pub fn parse(source: &str) -> Result<Sequence, ParseError> {
    let tokens = lexer::tokenize(source)?;
    parser::parse_sequence(&tokens)
}
