//! Core types for Meridian sequence diagrams.
//!
//! This crate contains the passive data structures shared by the parser and
//! the layout/rendering pipeline:
//!
//! - [`identifier::Id`] - interned participant identifiers
//! - [`geometry`] - geometric primitives ([`geometry::Point`], [`geometry::Size`])
//! - [`sequence`] - the sequence model: [`sequence::Entity`],
//!   [`sequence::Message`], [`sequence::Activation`], [`sequence::Sequence`]
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ lexer                 (meridian-parser)
//! Tokens
//!     ↓ parser + species      (meridian-parser)
//! Sequence Model (this crate) - resolved participants, activation tree
//!     ↓ diagram builder       (meridian)
//! Flat Diagram Parts
//!     ↓ row layout            (meridian)
//! Positioned Parts
//!     ↓ renderer              (external)
//! ```
//!
//! Types in this crate carry no behavior beyond construction and read
//! access. Validity (participant resolution, tree well-formedness) is
//! enforced upstream by the parser; the model never rejects a value once
//! it has been placed into it.

pub mod geometry;
pub mod identifier;
pub mod sequence;

pub use identifier::Id;
pub use sequence::{Activation, Entity, EntityKind, Message, MessageStyle, Sequence};
