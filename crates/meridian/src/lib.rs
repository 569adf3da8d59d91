//! Meridian: a sequence-diagram compiler.
//!
//! Meridian converts a textual description of an interactive sequence
//! into a validated in-memory model, then derives a flat set of
//! positioned visual parts ready to be drawn.
//!
//! # Pipeline
//!
//! ```text
//! Source Text
//!     ↓ meridian_parser::parse       (lexer + statement parser + species)
//! Sequence Model                     (meridian_core::sequence)
//!     ↓ Diagram::from_sequence       (activation walker)
//! Flat Diagram Parts
//!     ↓ Diagram::layout              (head measurement + row constraints)
//! Positioned Parts
//!     ↓ Diagram::draw                (opaque Renderer sink)
//! ```
//!
//! # Example
//!
//! ```
//! use meridian::{Diagram, compile};
//!
//! let source = r#"
//!     actor user;
//!     component server;
//!
//!     -> server : "start" {
//!         return "ok";
//!     };
//! "#;
//!
//! let sequence = compile(source).expect("valid source");
//! let diagram = Diagram::from_sequence(&sequence);
//! assert_eq!(diagram.entity_parts().len(), 2);
//! ```
//!
//! Text measurement and concrete drawing are external collaborators
//! behind the [`render::HeadMeasurer`] and [`render::Renderer`] traits.

pub mod diagram;
pub mod error;
pub mod layout;
pub mod render;

pub use diagram::{ActivationBarPart, Diagram, DiagramBuilder, DiagramError, EntityPart, MessagePart};
pub use error::MeridianError;
pub use layout::{Extent, LayoutError, RowLayout, RowOptions, RowPlacement};
pub use render::{HeadAttributes, HeadMeasurer, Renderer};

use meridian_core::sequence::Sequence;

/// Parse source text into a validated [`Sequence`].
///
/// # Errors
///
/// Returns [`MeridianError::Parse`] carrying the diagnostics and the
/// source text for span rendering.
pub fn compile(source: &str) -> Result<Sequence, MeridianError> {
    meridian_parser::parse(source).map_err(|err| MeridianError::new_parse_error(err, source))
}
