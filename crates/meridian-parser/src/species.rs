//! Message species matchers.
//!
//! Each matcher is a pure function that classifies a generic
//! [`MessageDescription`] into one specific kind of message/activation,
//! with a three-way outcome:
//!
//! - [`SpeciesOutcome::NoMatch`] - the description is not this species;
//!   the next matcher in order gets to look at it
//! - [`SpeciesOutcome::Matched`] - the description was converted into a
//!   permanent model [`Activation`]
//! - [`SpeciesOutcome::Rejected`] - the description structurally belongs
//!   to this species but violates one of its constraints; this is a hard
//!   parse error and no further matcher is tried
//!
//! # Matcher Order
//!
//! [`MATCHERS`] is tried first-match-wins in this exact order:
//!
//! 1. [`match_lost`] - claims `!from_outside && target.is_none()`
//! 2. [`match_found`] - claims `from_outside`
//! 3. [`match_call`] - claims any remaining description with a target
//!
//! The order matters: the call species is a shape-superset of the lost
//! species (a lost statement whose target *is* present is an ordinary
//! call), so the narrower species must run first. A matcher must return
//! `NoMatch` for any description it does not structurally own, so
//! reordering only ever affects overlapping species.
//!
//! Every rejection cites the violated field's evidence token, never a
//! generic location.

use meridian_core::sequence::{Activation, Entity, Message, MessageStyle};

use crate::{
    description::{MessageDescription, MessageKind},
    error::{Diagnostic, ErrorCode, Result},
};

/// The three-way result of trying one species against a description.
#[derive(Debug)]
pub(crate) enum SpeciesOutcome<'src> {
    /// Not this species; the description is handed back for the next matcher.
    NoMatch(MessageDescription<'src>),
    /// Claimed and converted.
    Matched(Activation),
    /// Claimed but invalid; parsing stops here.
    Rejected(Diagnostic),
}

/// A species matcher: pure function from description (+ active entity) to outcome.
pub(crate) type Matcher =
    for<'src> fn(MessageDescription<'src>, Option<&Entity>) -> SpeciesOutcome<'src>;

/// The prioritized species list. See the module docs for why order matters.
pub(crate) const MATCHERS: &[Matcher] = &[match_lost, match_found, match_call];

/// Run a description through the ordered species list, first-match-wins.
///
/// Returns `Ok(None)` when no species claims the description; the caller
/// is expected to raise an "unrecognized statement" diagnostic citing the
/// description's primary evidence.
pub(crate) fn classify<'src>(
    description: MessageDescription<'src>,
    active: Option<&Entity>,
) -> Result<Option<Activation>> {
    let mut description = description;
    for matcher in MATCHERS {
        match matcher(description, active) {
            SpeciesOutcome::NoMatch(returned) => description = returned,
            SpeciesOutcome::Matched(activation) => return Ok(Some(activation)),
            SpeciesOutcome::Rejected(diagnostic) => return Err(diagnostic),
        }
    }
    Ok(None)
}

/// Lost messages: sent by the active entity into the void.
///
/// Claims descriptions with no boundary marker and no target. Requires a
/// synchronous arrow, a present active entity, and no nested block.
pub(crate) fn match_lost<'src>(
    description: MessageDescription<'src>,
    active: Option<&Entity>,
) -> SpeciesOutcome<'src> {
    if description.from_outside || description.target.is_some() {
        return SpeciesOutcome::NoMatch(description);
    }

    if description.kind == MessageKind::Async {
        return SpeciesOutcome::Rejected(
            Diagnostic::error("lost messages must be synchronous")
                .with_code(ErrorCode::E210)
                .with_label(description.evidence.kind.span, "asynchronous arrow")
                .with_help("use `->` instead of `~>`"),
        );
    }

    let Some(active) = active else {
        return SpeciesOutcome::Rejected(
            Diagnostic::error("no active entity to send a lost message")
                .with_code(ErrorCode::E211)
                .with_label(description.evidence.target.span, "no sender in scope")
                .with_help("lost messages are only valid inside a call body"),
        );
    };

    if description.block.is_some() {
        return SpeciesOutcome::Rejected(
            Diagnostic::error("lost messages cannot open a nested activation")
                .with_code(ErrorCode::E212)
                .with_label(description.evidence.block.span, "nested block here")
                .with_help("a message with no receiver has nothing to activate"),
        );
    }

    SpeciesOutcome::Matched(Activation::new(Message::new(
        MessageStyle::Lost,
        Some(active.id()),
        None,
        description.label,
    )))
}

/// Found messages: delivered from the void to the active entity.
///
/// Claims every description with the leading boundary marker. Mirror
/// constraints of [`match_lost`], plus: naming a target is an error,
/// since the receiver is always the active entity.
pub(crate) fn match_found<'src>(
    description: MessageDescription<'src>,
    active: Option<&Entity>,
) -> SpeciesOutcome<'src> {
    if !description.from_outside {
        return SpeciesOutcome::NoMatch(description);
    }

    if description.kind == MessageKind::Async {
        return SpeciesOutcome::Rejected(
            Diagnostic::error("found messages must be synchronous")
                .with_code(ErrorCode::E220)
                .with_label(description.evidence.kind.span, "asynchronous arrow")
                .with_help("use `->` instead of `~>`"),
        );
    }

    if description.target.is_some() {
        return SpeciesOutcome::Rejected(
            Diagnostic::error("found messages cannot name a target")
                .with_code(ErrorCode::E223)
                .with_label(description.evidence.target.span, "named target here")
                .with_help("found messages are delivered to the active entity; write `*` instead"),
        );
    }

    let Some(active) = active else {
        return SpeciesOutcome::Rejected(
            Diagnostic::error("no active entity to receive a found message")
                .with_code(ErrorCode::E221)
                .with_label(description.evidence.from_outside.span, "no receiver in scope")
                .with_help("found messages are only valid inside a call body"),
        );
    };

    if description.block.is_some() {
        return SpeciesOutcome::Rejected(
            Diagnostic::error("found messages cannot open a nested activation")
                .with_code(ErrorCode::E222)
                .with_label(description.evidence.block.span, "nested block here")
                .with_help("a message from outside the diagram has nothing to activate"),
        );
    }

    SpeciesOutcome::Matched(Activation::new(Message::new(
        MessageStyle::Found,
        None,
        Some(active.id()),
        description.label,
    )))
}

/// Call messages: the active entity (or the outside, at top level) calls a
/// named participant.
///
/// Claims every remaining description with a concrete target. A
/// synchronous call may carry a body whose parsed activations become the
/// nested activations; a trailing return value appends the final reply
/// activation. Asynchronous calls cannot carry a body.
pub(crate) fn match_call<'src>(
    mut description: MessageDescription<'src>,
    active: Option<&Entity>,
) -> SpeciesOutcome<'src> {
    let Some(target) = description.target.take() else {
        return SpeciesOutcome::NoMatch(description);
    };

    if description.kind == MessageKind::Async && description.block.is_some() {
        return SpeciesOutcome::Rejected(
            Diagnostic::error("asynchronous calls cannot open a nested activation")
                .with_code(ErrorCode::E230)
                .with_label(description.evidence.block.span, "nested block here")
                .with_help("only synchronous calls (`->`) may have a body"),
        );
    }

    let style = match description.kind {
        MessageKind::Sync => MessageStyle::Call,
        MessageKind::Async => MessageStyle::AsyncCall,
    };
    let caller = active.map(Entity::id);
    let message = Message::new(style, caller, Some(target.id()), description.label);

    let activation = match description.block {
        Some(block) => {
            let mut body = block.activations;
            if let Some(return_value) = block.return_value {
                // The reply travels back along the call edge, to the
                // caller or out of the diagram for top-level calls.
                body.push(Activation::new(Message::new(
                    MessageStyle::Return,
                    Some(target.id()),
                    caller,
                    return_value,
                )));
            }
            Activation::with_body(message, body)
        }
        None => Activation::new(message),
    };

    SpeciesOutcome::Matched(activation)
}

#[cfg(test)]
mod tests {
    use meridian_core::{
        identifier::Id,
        sequence::{EntityKind, MessageStyle},
    };

    use crate::{
        description::{NestedBlock, StatementEvidence},
        span::Span,
        tokens::{PositionedToken, Token},
    };

    use super::*;

    fn tok(token: Token<'static>, start: usize, end: usize) -> PositionedToken<'static> {
        PositionedToken::new(token, Span::new(start..end))
    }

    fn evidence() -> StatementEvidence<'static> {
        StatementEvidence {
            kind: tok(Token::Arrow, 2, 4),
            from_outside: tok(Token::Star, 0, 1),
            target: tok(Token::Star, 5, 6),
            label: tok(Token::Colon, 7, 8),
            block: tok(Token::Semicolon, 9, 10),
        }
    }

    fn entity(name: &str) -> Entity {
        Entity::new(Id::new(name), EntityKind::Component, name)
    }

    fn description(
        kind: MessageKind,
        from_outside: bool,
        target: Option<Entity>,
        block: Option<NestedBlock<'static>>,
    ) -> MessageDescription<'static> {
        MessageDescription {
            kind,
            from_outside,
            target,
            label: "ping".to_string(),
            block,
            evidence: evidence(),
        }
    }

    fn empty_block() -> NestedBlock<'static> {
        NestedBlock {
            return_value: None,
            activations: Vec::new(),
            return_evidence: None,
        }
    }

    fn rejected_code(outcome: SpeciesOutcome<'_>) -> ErrorCode {
        match outcome {
            SpeciesOutcome::Rejected(diag) => diag.code().expect("diagnostic carries a code"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_lost_success() {
        let sender = entity("server");
        let outcome = match_lost(
            description(MessageKind::Sync, false, None, None),
            Some(&sender),
        );

        let SpeciesOutcome::Matched(activation) = outcome else {
            panic!("expected Matched");
        };
        let message = activation.message();
        assert_eq!(message.style(), MessageStyle::Lost);
        assert_eq!(message.from(), Some(sender.id()));
        assert_eq!(message.to(), None);
        assert_eq!(message.label(), "ping");
        assert!(!activation.has_body());
    }

    #[test]
    fn test_lost_async_rejected() {
        let sender = entity("server");
        let outcome = match_lost(
            description(MessageKind::Async, false, None, None),
            Some(&sender),
        );
        assert_eq!(rejected_code(outcome), ErrorCode::E210);
    }

    #[test]
    fn test_lost_without_active_entity_rejected() {
        let outcome = match_lost(description(MessageKind::Sync, false, None, None), None);
        assert_eq!(rejected_code(outcome), ErrorCode::E211);
    }

    #[test]
    fn test_lost_with_block_rejected() {
        let sender = entity("server");
        let outcome = match_lost(
            description(MessageKind::Sync, false, None, Some(empty_block())),
            Some(&sender),
        );
        assert_eq!(rejected_code(outcome), ErrorCode::E212);
    }

    #[test]
    fn test_lost_with_target_falls_through_to_call() {
        // A present target exits the lost base shape; the description is
        // an ordinary call and must NOT be rejected by the lost matcher.
        let sender = entity("server");
        let target = entity("db");
        let desc = description(MessageKind::Sync, false, Some(target.clone()), None);

        assert!(matches!(
            match_lost(desc.clone(), Some(&sender)),
            SpeciesOutcome::NoMatch(_)
        ));

        let activation = classify(desc, Some(&sender))
            .expect("no diagnostic")
            .expect("claimed by the call species");
        assert_eq!(activation.message().style(), MessageStyle::Call);
        assert_eq!(activation.message().to(), Some(target.id()));
    }

    #[test]
    fn test_found_success() {
        let receiver = entity("server");
        let outcome = match_found(
            description(MessageKind::Sync, true, None, None),
            Some(&receiver),
        );

        let SpeciesOutcome::Matched(activation) = outcome else {
            panic!("expected Matched");
        };
        let message = activation.message();
        assert_eq!(message.style(), MessageStyle::Found);
        assert_eq!(message.from(), None);
        assert_eq!(message.to(), Some(receiver.id()));
        assert_eq!(message.label(), "ping");
    }

    #[test]
    fn test_found_async_rejected() {
        let receiver = entity("server");
        let outcome = match_found(
            description(MessageKind::Async, true, None, None),
            Some(&receiver),
        );
        assert_eq!(rejected_code(outcome), ErrorCode::E220);
    }

    #[test]
    fn test_found_with_target_rejected() {
        // Unlike the lost species, a named target under the boundary
        // marker is claimed AND rejected: the species owns every
        // `from_outside` description.
        let receiver = entity("server");
        let outcome = match_found(
            description(MessageKind::Sync, true, Some(entity("db")), None),
            Some(&receiver),
        );
        assert_eq!(rejected_code(outcome), ErrorCode::E223);
    }

    #[test]
    fn test_found_without_active_entity_rejected() {
        let outcome = match_found(description(MessageKind::Sync, true, None, None), None);
        assert_eq!(rejected_code(outcome), ErrorCode::E221);
    }

    #[test]
    fn test_found_with_block_rejected() {
        let receiver = entity("server");
        let outcome = match_found(
            description(MessageKind::Sync, true, None, Some(empty_block())),
            Some(&receiver),
        );
        assert_eq!(rejected_code(outcome), ErrorCode::E222);
    }

    #[test]
    fn test_call_top_level_comes_from_outside() {
        let target = entity("server");
        let activation = classify(
            description(MessageKind::Sync, false, Some(target.clone()), None),
            None,
        )
        .expect("no diagnostic")
        .expect("claimed");

        let message = activation.message();
        assert_eq!(message.style(), MessageStyle::Call);
        assert_eq!(message.from(), None, "top-level caller is outside");
        assert_eq!(message.to(), Some(target.id()));
    }

    #[test]
    fn test_call_async() {
        let caller = entity("server");
        let target = entity("logger");
        let activation = classify(
            description(MessageKind::Async, false, Some(target.clone()), None),
            Some(&caller),
        )
        .expect("no diagnostic")
        .expect("claimed");

        assert_eq!(activation.message().style(), MessageStyle::AsyncCall);
        assert_eq!(activation.message().from(), Some(caller.id()));
    }

    #[test]
    fn test_call_async_with_block_rejected() {
        let caller = entity("server");
        let outcome = match_call(
            description(
                MessageKind::Async,
                false,
                Some(entity("logger")),
                Some(empty_block()),
            ),
            Some(&caller),
        );
        assert_eq!(rejected_code(outcome), ErrorCode::E230);
    }

    #[test]
    fn test_call_block_with_return_appends_reply() {
        let caller = entity("client");
        let target = entity("server");
        let block = NestedBlock {
            return_value: Some("ok".to_string()),
            activations: vec![Activation::new(Message::new(
                MessageStyle::Lost,
                Some(target.id()),
                None,
                "audit",
            ))],
            return_evidence: Some(tok(Token::Return, 20, 26)),
        };

        let activation = classify(
            description(MessageKind::Sync, false, Some(target.clone()), Some(block)),
            Some(&caller),
        )
        .expect("no diagnostic")
        .expect("claimed");

        assert!(activation.has_body());
        let body = activation.nested_activations();
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].message().style(), MessageStyle::Lost);

        let reply = body[1].message();
        assert_eq!(reply.style(), MessageStyle::Return);
        assert_eq!(reply.from(), Some(target.id()));
        assert_eq!(reply.to(), Some(caller.id()));
        assert_eq!(reply.label(), "ok");
    }

    #[test]
    fn test_call_empty_block_keeps_body() {
        let target = entity("server");
        let activation = classify(
            description(MessageKind::Sync, false, Some(target), Some(empty_block())),
            None,
        )
        .expect("no diagnostic")
        .expect("claimed");

        assert!(activation.has_body());
        assert!(activation.nested_activations().is_empty());
    }
}
