//! Transient statement descriptions handed to the species matchers.
//!
//! A [`MessageDescription`] is the generic, pre-validation form of one
//! parsed statement. It exists only for the duration of a single parse
//! step: the statement parser fills it in field by field, then exactly one
//! species matcher consumes it, either producing a permanent model object
//! or raising a diagnostic that cites the recorded evidence.
//!
//! # Evidence
//!
//! For every semantic field the parser records the exact token that
//! produced it - including fields whose value is *absent*, where the
//! evidence is the token that proved the absence (the `*` in target
//! position, or the terminator observed where a label or block could have
//! appeared). Matchers never have to guess at source locations; the
//! violated field's token is always at hand.

use meridian_core::sequence::{Activation, Entity};

use crate::tokens::PositionedToken;

/// Whether a statement used the synchronous or asynchronous arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// `->`
    Sync,
    /// `~>`
    Async,
}

/// One evidence token per semantic field of a [`MessageDescription`].
///
/// Populated eagerly at the point each field is parsed.
#[derive(Debug, Clone)]
pub struct StatementEvidence<'src> {
    /// The arrow token; doubles as the statement's primary evidence.
    pub kind: PositionedToken<'src>,
    /// The leading `*`, or the arrow token when no marker was present.
    pub from_outside: PositionedToken<'src>,
    /// The target identifier, or the `*` missing-target marker.
    pub target: PositionedToken<'src>,
    /// The label string, or the token observed where a label could have been.
    pub label: PositionedToken<'src>,
    /// The opening `{`, or the `;` that proved the block absent.
    pub block: PositionedToken<'src>,
}

/// A parsed call body, recursively containing further activations.
#[derive(Debug, Clone)]
pub struct NestedBlock<'src> {
    /// The value named by a trailing `return` statement, if any.
    pub return_value: Option<String>,
    /// Activations triggered from inside the body, in source order.
    pub activations: Vec<Activation>,
    /// The `return` keyword token, when a return value is present.
    pub return_evidence: Option<PositionedToken<'src>>,
}

/// The generic, pre-validation form of one parsed statement.
///
/// `target` holds the *resolved* entity: the parser has already checked
/// the name against the declared participant set, so matchers work with
/// model entities rather than raw identifiers.
#[derive(Debug, Clone)]
pub struct MessageDescription<'src> {
    pub kind: MessageKind,
    pub from_outside: bool,
    pub target: Option<Entity>,
    pub label: String,
    pub block: Option<NestedBlock<'src>>,
    pub evidence: StatementEvidence<'src>,
}
