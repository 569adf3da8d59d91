//! Diagram builder and activation walker.
//!
//! This module flattens a validated [`Sequence`] into renderer-agnostic
//! diagram parts:
//!
//! - [`EntityPart`] - one per participant, in first-declaration order
//! - [`MessagePart`] - one per message, in depth-first pre-order
//! - [`ActivationBarPart`] - one per synchronous call with a body
//!
//! The emission order is exactly the depth-first pre-order traversal of
//! the activation tree; downstream layout and rendering depend on it for
//! later vertical positioning.
//!
//! # Two-Phase Discipline
//!
//! A [`Diagram`] goes through two strictly separated phases: all layout
//! fields are written during one [`Diagram::layout`] call, all reads
//! happen during subsequent [`Diagram::draw`] calls. Drawing (or reading
//! the computed size) before layout is a usage error and fails
//! immediately rather than producing zero-sized output.
//!
//! Vertical positioning is not designed yet: vertical extents are filled
//! with fixed placeholder values during layout, while horizontal
//! positions come from the row constraint solver.

use std::collections::HashSet;

use log::debug;
use thiserror::Error;

use meridian_core::{
    geometry::{Point, Size},
    identifier::Id,
    sequence::{Activation, Entity, Message, Sequence},
};

use crate::{
    layout::{LayoutError, RowLayout, RowOptions, RowPlacement},
    render::{HeadAttributes, HeadMeasurer, Renderer},
};

/// Vertical placeholders used until a vertical layout algorithm exists.
const HEAD_TOP_Y: f32 = 10.0;
const MESSAGE_Y: f32 = 120.0;
const BAR_TOP_Y: f32 = 100.0;
const BAR_END_Y: f32 = 240.0;
const LIFELINE_END_Y: f32 = 260.0;

/// Usage and sequencing errors for the diagram phases.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagramError {
    /// `draw()` (or a size read) happened before `layout()`.
    #[error("diagram drawn before layout() was called")]
    NotLaidOut,

    /// `layout()` was invoked a second time.
    #[error("layout() called more than once on the same diagram")]
    LayoutRepeated,

    /// The row solver rejected an operation.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// A participant head plus its lifeline, with write-once layout fields.
#[derive(Debug)]
pub struct EntityPart<'a> {
    entity: &'a Entity,
    head_size: Option<Size>,
    top_center: Option<Point>,
    lifeline_end_y: Option<f32>,
}

impl<'a> EntityPart<'a> {
    fn new(entity: &'a Entity) -> Self {
        Self {
            entity,
            head_size: None,
            top_center: None,
            lifeline_end_y: None,
        }
    }

    /// The wrapped entity.
    pub fn entity(&self) -> &'a Entity {
        self.entity
    }

    /// The measured head size; `None` before layout.
    pub fn head_size(&self) -> Option<Size> {
        self.head_size
    }

    /// The computed top-center position; `None` before layout.
    pub fn top_center(&self) -> Option<Point> {
        self.top_center
    }

    /// The attributes handed to measurers and renderers.
    pub fn attributes(&self) -> HeadAttributes<'_> {
        HeadAttributes {
            name: self.entity.name(),
            kind: self.entity.kind(),
        }
    }

    fn draw(&self, renderer: &mut dyn Renderer) -> Result<(), DiagramError> {
        let size = self.head_size.ok_or(DiagramError::NotLaidOut)?;
        let top_center = self.top_center.ok_or(DiagramError::NotLaidOut)?;
        let end_y = self.lifeline_end_y.ok_or(DiagramError::NotLaidOut)?;

        renderer.head(&self.attributes(), top_center, size);
        renderer.lifeline(top_center.x(), top_center.y() + size.height(), end_y);
        Ok(())
    }
}

/// An activation bar on the callee's lifeline, covering a call body.
#[derive(Debug)]
pub struct ActivationBarPart<'a> {
    activation: &'a Activation,
    owner: Id,
    x: Option<f32>,
    y_span: Option<(f32, f32)>,
}

impl<'a> ActivationBarPart<'a> {
    fn new(activation: &'a Activation, owner: Id) -> Self {
        Self {
            activation,
            owner,
            x: None,
            y_span: None,
        }
    }

    /// The wrapped activation.
    pub fn activation(&self) -> &'a Activation {
        self.activation
    }

    /// The entity whose lifeline carries this bar.
    pub fn owner(&self) -> Id {
        self.owner
    }

    fn draw(&self, renderer: &mut dyn Renderer) -> Result<(), DiagramError> {
        let x = self.x.ok_or(DiagramError::NotLaidOut)?;
        let (top_y, end_y) = self.y_span.ok_or(DiagramError::NotLaidOut)?;

        renderer.activation_bar(x, top_y, end_y);
        Ok(())
    }
}

/// A message arrow with resolved horizontal endpoints.
#[derive(Debug)]
pub struct MessagePart<'a> {
    message: &'a Message,
    endpoints: Option<(Option<f32>, Option<f32>)>,
    y: Option<f32>,
}

impl<'a> MessagePart<'a> {
    fn new(message: &'a Message) -> Self {
        Self {
            message,
            endpoints: None,
            y: None,
        }
    }

    /// The wrapped message.
    pub fn message(&self) -> &'a Message {
        self.message
    }

    fn draw(&self, renderer: &mut dyn Renderer) -> Result<(), DiagramError> {
        let (from_x, to_x) = self.endpoints.ok_or(DiagramError::NotLaidOut)?;
        let y = self.y.ok_or(DiagramError::NotLaidOut)?;

        renderer.message(self.message.style(), self.message.label(), from_x, to_x, y);
        Ok(())
    }
}

/// Single-use accumulator that flattens a sequence into diagram parts.
///
/// The builder is consumed by [`DiagramBuilder::build`], so reuse is a
/// compile error rather than a runtime flag check.
#[derive(Debug, Default)]
pub struct DiagramBuilder<'a> {
    entities: Vec<EntityPart<'a>>,
    seen: HashSet<Id>,
    bars: Vec<ActivationBarPart<'a>>,
    messages: Vec<MessagePart<'a>>,
}

impl<'a> DiagramBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity, producing its [`EntityPart`].
    ///
    /// # Panics
    ///
    /// Panics on a duplicate id. The [`Sequence`] already guarantees
    /// uniqueness, so a duplicate here is a programming error, not a
    /// user-facing diagnostic.
    pub fn add_entity(&mut self, entity: &'a Entity) {
        assert!(
            self.seen.insert(entity.id()),
            "entity `{}` added to the diagram twice",
            entity.id()
        );
        self.entities.push(EntityPart::new(entity));
    }

    /// Walk one activation depth-first, pre-order.
    ///
    /// Emits the activation's message part, then (for a call with a body)
    /// its activation bar, then recurses into the nested activations in
    /// order. Output collections preserve exactly this order.
    pub fn walk_activation(&mut self, activation: &'a Activation) {
        self.messages.push(MessagePart::new(activation.message()));

        if activation.has_body() {
            if let Some(owner) = activation.message().to() {
                self.bars.push(ActivationBarPart::new(activation, owner));
            }
        }

        for nested in activation.nested_activations() {
            self.walk_activation(nested);
        }
    }

    /// Freeze the accumulated parts into a [`Diagram`], consuming the
    /// builder.
    pub fn build(self) -> Diagram<'a> {
        debug!(
            entities_len = self.entities.len(),
            bars_len = self.bars.len(),
            messages_len = self.messages.len();
            "Diagram built",
        );
        Diagram {
            entities: self.entities,
            bars: self.bars,
            messages: self.messages,
            placement: None,
        }
    }
}

/// The flat, render-ordered collection of diagram parts.
#[derive(Debug)]
pub struct Diagram<'a> {
    entities: Vec<EntityPart<'a>>,
    bars: Vec<ActivationBarPart<'a>>,
    messages: Vec<MessagePart<'a>>,
    placement: Option<RowPlacement<Id>>,
}

impl<'a> Diagram<'a> {
    /// Build a diagram from a validated sequence.
    ///
    /// Entities are registered in first-declaration order, then each root
    /// activation is walked depth-first.
    pub fn from_sequence(sequence: &'a Sequence) -> Self {
        let mut builder = DiagramBuilder::new();
        for entity in sequence.entities() {
            builder.add_entity(entity);
        }
        for activation in sequence.activations() {
            builder.walk_activation(activation);
        }
        builder.build()
    }

    /// The entity parts, in first-declaration order.
    pub fn entity_parts(&self) -> &[EntityPart<'a>] {
        &self.entities
    }

    /// The activation bars, in walk order.
    pub fn activation_bars(&self) -> &[ActivationBarPart<'a>] {
        &self.bars
    }

    /// The message parts, in walk order.
    pub fn message_parts(&self) -> &[MessagePart<'a>] {
        &self.messages
    }

    /// The overall diagram size.
    ///
    /// # Errors
    ///
    /// Fails with [`DiagramError::NotLaidOut`] before [`Diagram::layout`];
    /// a zero-sized default is never silently reported.
    pub fn size(&self) -> Result<Size, DiagramError> {
        let placement = self.placement.as_ref().ok_or(DiagramError::NotLaidOut)?;
        Ok(Size::new(placement.total(), LIFELINE_END_Y))
    }

    /// Measure every head and compute all layout positions.
    ///
    /// This is the single write phase: every part's layout fields are set
    /// here and only here. Horizontal positions come from the row
    /// constraint solver; vertical extents are placeholders.
    ///
    /// # Errors
    ///
    /// Fails with [`DiagramError::LayoutRepeated`] when called twice.
    pub fn layout(
        &mut self,
        measurer: &dyn HeadMeasurer,
        options: RowOptions,
    ) -> Result<(), DiagramError> {
        if self.placement.is_some() {
            return Err(DiagramError::LayoutRepeated);
        }

        let mut solver = RowLayout::new(
            self.entities.iter().map(|part| part.entity.id()),
            options,
        );
        for part in &mut self.entities {
            let size = measurer.measure_head(&part.attributes());
            part.head_size = Some(size);
            solver.apply_dimension(part.entity.id(), size.width())?;
        }

        let placement = solver.compute();

        for part in &mut self.entities {
            let extent = placement
                .extent(&part.entity.id())
                .expect("every entity id was given to the solver");
            part.top_center = Some(Point::new(extent.center, HEAD_TOP_Y));
            part.lifeline_end_y = Some(LIFELINE_END_Y);
        }

        for bar in &mut self.bars {
            let extent = placement
                .extent(&bar.owner)
                .expect("bar owners are declared entities");
            bar.x = Some(extent.center);
            bar.y_span = Some((BAR_TOP_Y, BAR_END_Y));
        }

        for part in &mut self.messages {
            let center_of = |id: Id| placement.extent(&id).map(|extent| extent.center);
            let from_x = part.message.from().and_then(center_of);
            let to_x = part.message.to().and_then(center_of);
            part.endpoints = Some((from_x, to_x));
            part.y = Some(MESSAGE_Y);
        }

        self.placement = Some(placement);
        Ok(())
    }

    /// Draw every part to the renderer, heads and lifelines first.
    ///
    /// # Errors
    ///
    /// Fails with [`DiagramError::NotLaidOut`] before [`Diagram::layout`].
    pub fn draw(&self, renderer: &mut dyn Renderer) -> Result<(), DiagramError> {
        if self.placement.is_none() {
            return Err(DiagramError::NotLaidOut);
        }

        for part in &self.entities {
            part.draw(renderer)?;
        }
        for bar in &self.bars {
            bar.draw(renderer)?;
        }
        for message in &self.messages {
            message.draw(renderer)?;
        }
        Ok(())
    }
}
