//! SVG rendering backend.
//!
//! Implements the pipeline's [`Renderer`] boundary on top of the `svg`
//! crate. Each drawing primitive becomes one or two SVG elements; the
//! accumulated elements are folded into a document by
//! [`SvgRenderer::into_document`].

use svg::Document;
use svg::node::element as svg_element;

use meridian::{HeadAttributes, Renderer};
use meridian_core::{
    geometry::{Point, Size},
    sequence::{EntityKind, MessageStyle},
};

const FONT_SIZE: f32 = 14.0;
const BAR_WIDTH: f32 = 8.0;
/// Length of the visible stub for messages that cross the diagram boundary.
const BOUNDARY_STUB: f32 = 40.0;

/// A [`Renderer`] that accumulates SVG elements.
pub struct SvgRenderer {
    nodes: Vec<Box<dyn svg::Node>>,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Fold the accumulated elements into a complete document.
    pub fn into_document(self, size: Size) -> Document {
        let document = Document::new()
            .set("width", size.width())
            .set("height", size.height())
            .set("viewBox", (0.0, 0.0, size.width(), size.height()));

        self.nodes.into_iter().fold(document, Document::add)
    }

    fn push(&mut self, node: impl svg::Node + 'static) {
        self.nodes.push(Box::new(node));
    }

    fn push_label(&mut self, text: &str, x: f32, y: f32) {
        if text.is_empty() {
            return;
        }
        let label = svg_element::Text::new(text)
            .set("x", x)
            .set("y", y)
            .set("font-size", FONT_SIZE)
            .set("font-family", "sans-serif")
            .set("text-anchor", "middle");
        self.push(label);
    }
}

impl Renderer for SvgRenderer {
    fn head(&mut self, attributes: &HeadAttributes<'_>, top_center: Point, size: Size) {
        let rect = svg_element::Rectangle::new()
            .set("x", top_center.x() - size.width() / 2.0)
            .set("y", top_center.y())
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", "white")
            .set("stroke", "black")
            .set("stroke-width", 1.0);
        // Actors get rounded corners to stand apart from components
        let rect = match attributes.kind {
            EntityKind::Actor => rect.set("rx", 12.0),
            EntityKind::Component => rect,
        };
        self.push(rect);

        self.push_label(
            attributes.name,
            top_center.x(),
            top_center.y() + size.height() / 2.0 + FONT_SIZE / 2.0 - 2.0,
        );
    }

    fn lifeline(&mut self, x: f32, top_y: f32, end_y: f32) {
        let line = svg_element::Line::new()
            .set("x1", x)
            .set("y1", top_y)
            .set("x2", x)
            .set("y2", end_y)
            .set("stroke", "black")
            .set("stroke-width", 1.0)
            .set("stroke-dasharray", "4,4");
        self.push(line);
    }

    fn activation_bar(&mut self, x: f32, top_y: f32, end_y: f32) {
        let bar = svg_element::Rectangle::new()
            .set("x", x - BAR_WIDTH / 2.0)
            .set("y", top_y)
            .set("width", BAR_WIDTH)
            .set("height", (end_y - top_y).max(0.0))
            .set("fill", "white")
            .set("stroke", "black")
            .set("stroke-width", 1.0);
        self.push(bar);
    }

    fn message(
        &mut self,
        style: MessageStyle,
        label: &str,
        from_x: Option<f32>,
        to_x: Option<f32>,
        y: f32,
    ) {
        // A missing endpoint becomes a short stub toward the boundary,
        // capped with a dot (the lost/found rendering convention).
        let (x1, x2, dot) = match (from_x, to_x) {
            (Some(from), Some(to)) => (from, to, None),
            (Some(from), None) => (from, from + BOUNDARY_STUB, Some(from + BOUNDARY_STUB)),
            (None, Some(to)) => (to - BOUNDARY_STUB, to, Some(to - BOUNDARY_STUB)),
            (None, None) => return,
        };

        let line = svg_element::Line::new()
            .set("x1", x1)
            .set("y1", y)
            .set("x2", x2)
            .set("y2", y)
            .set("stroke", "black")
            .set("stroke-width", 1.0);
        let line = match style {
            MessageStyle::AsyncCall | MessageStyle::Return => {
                line.set("stroke-dasharray", "6,3")
            }
            _ => line,
        };
        self.push(line);

        if let Some(x) = dot {
            let cap = svg_element::Circle::new()
                .set("cx", x)
                .set("cy", y)
                .set("r", 3.0)
                .set("fill", "black");
            self.push(cap);
        }

        self.push_label(label, (x1 + x2) / 2.0, y - 4.0);
    }
}
