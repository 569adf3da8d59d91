//! The sequence model: participants, messages, and the activation tree.
//!
//! This module holds the validated in-memory representation of a parsed
//! interaction sequence. The key abstractions are:
//!
//! - [`Entity`]: a participant (actor or component), rendered as a lifeline
//! - [`Message`]: a single exchange between participants, where an absent
//!   endpoint means the message enters or leaves the visible diagram
//! - [`Activation`]: a period during which an entity processes a received
//!   message, potentially sending further nested messages
//! - [`Sequence`]: the aggregate owning all entities and root activations
//!
//! # Architecture
//!
//! Sequence diagrams maintain a strict temporal ordering. Entities are kept
//! in first-declaration order and activations in source order; downstream
//! layout and rendering rely on both orderings and never re-sort.
//!
//! All invariants (participant resolution, tree shape) are established by
//! the parser before values reach this model; the model itself is passive
//! and never rejects a value once placed into it.

use indexmap::IndexMap;
use log::debug;

use crate::identifier::Id;

/// The kind of a participant, which selects its head shape when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A human participant, conventionally drawn as a stick figure.
    Actor,
    /// A system participant, conventionally drawn as a rectangle.
    Component,
}

/// A participant in the sequence.
///
/// Entities are created once per declaration during parsing and are
/// immutable afterwards. The [`Sequence`] owns them and guarantees id
/// uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    id: Id,
    kind: EntityKind,
    name: String,
}

impl Entity {
    /// Creates a new entity with the given identifier, kind, and display name.
    pub fn new(id: Id, kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
        }
    }

    /// Returns the unique identifier of this entity.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the kind of this entity.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the display name of this entity.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The style of a message, which determines its arrow rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    /// A synchronous call.
    Call,
    /// An asynchronous call.
    AsyncCall,
    /// A reply carrying a call's return value back to the caller.
    Return,
    /// A message sent into the void: the sender is visible, the receiver
    /// is outside the diagram.
    Lost,
    /// A message from the void: the sender is outside the diagram, the
    /// receiver is visible.
    Found,
}

/// A single message exchange.
///
/// `from`/`to` are optional on purpose: an absent endpoint means the
/// message crosses the diagram boundary (a top-level call arriving from
/// outside, a lost message leaving the diagram, a found message entering
/// it). Absence is meaningful and must be preserved, never defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    style: MessageStyle,
    from: Option<Id>,
    to: Option<Id>,
    label: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(
        style: MessageStyle,
        from: Option<Id>,
        to: Option<Id>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            style,
            from,
            to,
            label: label.into(),
        }
    }

    /// Returns the style of this message.
    pub fn style(&self) -> MessageStyle {
        self.style
    }

    /// Returns the sending entity, or `None` if the message originates
    /// outside the diagram.
    pub fn from(&self) -> Option<Id> {
        self.from
    }

    /// Returns the receiving entity, or `None` if the message leaves the
    /// diagram.
    pub fn to(&self) -> Option<Id> {
        self.to
    }

    /// Returns the message label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// One node of the activation tree.
///
/// An activation spans from the moment its triggering message is sent
/// until its (possibly absent) return is processed. A synchronous call
/// with a body owns the activations of the messages sent from inside
/// that body, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    message: Message,
    body: Option<Vec<Activation>>,
}

impl Activation {
    /// Creates an activation for a message that opened no nested block.
    pub fn new(message: Message) -> Self {
        Self {
            message,
            body: None,
        }
    }

    /// Creates an activation for a synchronous call with a body.
    ///
    /// An empty `body` is still a body: the call opened a block, even if
    /// nothing was sent from inside it.
    pub fn with_body(message: Message, body: Vec<Activation>) -> Self {
        Self {
            message,
            body: Some(body),
        }
    }

    /// Returns the message that triggered this activation.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Returns the nested activations, in source order.
    ///
    /// Empty both for bodiless activations and for calls with an empty
    /// block; use [`Activation::has_body`] to distinguish the two.
    pub fn nested_activations(&self) -> &[Activation] {
        self.body.as_deref().unwrap_or_default()
    }

    /// Returns `true` if this activation's statement opened a nested block.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

/// The validated aggregate for one parsed interaction sequence.
///
/// Owns all entities (unique by id, in first-declaration order) and the
/// root activations (in source order). A `Sequence` only exists once every
/// statement has been claimed by a species matcher with no pending
/// diagnostics; partial sequences are never produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    entities: IndexMap<Id, Entity>,
    activations: Vec<Activation>,
}

impl Sequence {
    /// Creates a sequence from its parts.
    ///
    /// The parser is responsible for the entity-set invariant: every id
    /// referenced by any message must be a key of `entities`.
    pub fn new(entities: IndexMap<Id, Entity>, activations: Vec<Activation>) -> Self {
        debug!(
            entities_len = entities.len(),
            activations_len = activations.len();
            "Sequence assembled",
        );
        Self {
            entities,
            activations,
        }
    }

    /// Returns an iterator over all entities in first-declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Returns an iterator over all entity ids in first-declaration order.
    pub fn entity_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.entities.keys().copied()
    }

    /// Looks up an entity by id.
    pub fn entity(&self, id: Id) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns the number of distinct participants.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the root activations in source order.
    pub fn activations(&self) -> &[Activation] {
        &self.activations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str) -> Entity {
        Entity::new(Id::new(name), EntityKind::Component, name)
    }

    #[test]
    fn test_entity_ordering_preserved() {
        // Insert in a NON-ALPHABETICAL order to catch accidental sorting
        let names = ["zeta", "alpha", "mike", "bravo", "echo"];
        let entities: IndexMap<Id, Entity> = names
            .iter()
            .map(|name| (Id::new(name), entity(name)))
            .collect();

        let sequence = Sequence::new(entities, Vec::new());

        assert_eq!(sequence.entity_count(), 5);
        let ids: Vec<Id> = sequence.entity_ids().collect();
        for (id, name) in ids.iter().zip(names) {
            assert_eq!(*id, name);
        }
    }

    #[test]
    fn test_entity_lookup() {
        let a = entity("a");
        let entities: IndexMap<Id, Entity> = [(a.id(), a.clone())].into_iter().collect();
        let sequence = Sequence::new(entities, Vec::new());

        assert_eq!(sequence.entity(Id::new("a")), Some(&a));
        assert_eq!(sequence.entity(Id::new("missing")), None);
    }

    #[test]
    fn test_message_endpoints_preserve_absence() {
        let lost = Message::new(MessageStyle::Lost, Some(Id::new("a")), None, "gone");
        assert_eq!(lost.from(), Some(Id::new("a")));
        assert_eq!(lost.to(), None);

        let found = Message::new(MessageStyle::Found, None, Some(Id::new("a")), "tick");
        assert_eq!(found.from(), None);
        assert_eq!(found.to(), Some(Id::new("a")));
    }

    #[test]
    fn test_activation_body_distinction() {
        let message = Message::new(MessageStyle::Call, None, Some(Id::new("a")), "go");

        let bodiless = Activation::new(message.clone());
        assert!(!bodiless.has_body());
        assert!(bodiless.nested_activations().is_empty());

        let empty_body = Activation::with_body(message.clone(), Vec::new());
        assert!(empty_body.has_body());
        assert!(empty_body.nested_activations().is_empty());

        let nested = Activation::with_body(message.clone(), vec![Activation::new(message)]);
        assert_eq!(nested.nested_activations().len(), 1);
    }
}
