//! The measurement and rendering boundary.
//!
//! The diagram pipeline does not measure text or draw shapes itself; both
//! concerns live behind the traits in this module. A [`HeadMeasurer`]
//! supplies the size of each participant head before layout, and a
//! [`Renderer`] is the opaque sink that diagram parts describe themselves
//! to during drawing.

use meridian_core::{
    geometry::{Point, Size},
    sequence::{EntityKind, MessageStyle},
};

/// Everything a measurer or renderer may know about a participant head.
#[derive(Debug, Clone, Copy)]
pub struct HeadAttributes<'a> {
    /// The display name shown in the head.
    pub name: &'a str,
    /// The participant kind, selecting the head shape.
    pub kind: EntityKind,
}

/// Measures participant heads ahead of layout.
///
/// Called exactly once per entity during [`crate::diagram::Diagram::layout`];
/// the returned width feeds the row constraint solver.
pub trait HeadMeasurer {
    fn measure_head(&self, attributes: &HeadAttributes<'_>) -> Size;
}

/// The opaque drawing sink.
///
/// Diagram parts call these primitives during a draw pass, each part at
/// most once, and only after layout. Implementations decide what the
/// primitives mean (SVG elements, canvas calls, test recordings).
pub trait Renderer {
    /// Draw a participant head centered horizontally on `top_center`.
    fn head(&mut self, attributes: &HeadAttributes<'_>, top_center: Point, size: Size);

    /// Draw a lifeline: the vertical line under a participant head.
    fn lifeline(&mut self, x: f32, top_y: f32, end_y: f32);

    /// Draw an activation bar on the lifeline at `x`.
    fn activation_bar(&mut self, x: f32, top_y: f32, end_y: f32);

    /// Draw a message arrow at height `y`.
    ///
    /// An absent endpoint means the message crosses the diagram boundary
    /// on that side (lost/found messages, top-level calls and returns).
    fn message(
        &mut self,
        style: MessageStyle,
        label: &str,
        from_x: Option<f32>,
        to_x: Option<f32>,
        y: f32,
    );
}
