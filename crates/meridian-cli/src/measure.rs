//! Head measurement backed by cosmic-text.
//!
//! Implements the pipeline's [`HeadMeasurer`] boundary with real font
//! metrics and shaping, so head widths account for the actual rendered
//! text rather than a character-count estimate.

use std::cell::RefCell;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use meridian::{HeadAttributes, HeadMeasurer};
use meridian_core::geometry::Size;

const FONT_SIZE: usize = 14;
const HEAD_PADDING: f32 = 12.0;
const MIN_HEAD_WIDTH: f32 = 60.0;
const MIN_HEAD_HEIGHT: f32 = 30.0;

/// Text measurer holding a reusable [`FontSystem`].
///
/// Creating a `FontSystem` scans the installed fonts and is expensive, so
/// one instance is kept for the whole run. The pipeline is single-threaded
/// (measurement happens during one `layout()` call), so interior
/// mutability via `RefCell` is sufficient.
pub struct TextMeasurer {
    font_system: RefCell<FontSystem>,
}

impl Default for TextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer {
    /// Create a new measurer with a freshly loaded font system.
    pub fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: RefCell::new(FontSystem::new()),
        }
    }

    /// Calculate the rendered size of `text` in pixels.
    fn measure_text(&self, text: &str, font_size: usize) -> Size {
        let mut font_system = self.font_system.borrow_mut();

        // Convert font size from points to pixels (roughly 1.33x multiplier
        // for standard DPI)
        let font_size_px = font_size as f32 * 1.33;
        let line_height = font_size_px * 1.2;
        let metrics = Metrics::new(font_size_px, line_height);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::SansSerif);

        // Unlimited buffer size so the text flows naturally on one line
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if layout_runs.is_empty() {
            // Fallback estimate when shaping produced nothing
            max_width = text.len() as f32 * (font_size_px * 0.6);
            total_height = metrics.line_height;
        } else {
            for run in &layout_runs {
                if let Some(last) = run.glyphs.last() {
                    max_width = max_width.max(last.x + last.w);
                }
                total_height += metrics.line_height;
            }
        }

        Size::new(max_width, total_height)
    }
}

impl HeadMeasurer for TextMeasurer {
    fn measure_head(&self, attributes: &HeadAttributes<'_>) -> Size {
        self.measure_text(attributes.name, FONT_SIZE)
            .add_padding(HEAD_PADDING)
            .max(Size::new(MIN_HEAD_WIDTH, MIN_HEAD_HEIGHT))
    }
}

#[cfg(test)]
mod tests {
    use meridian_core::sequence::EntityKind;

    use super::*;

    #[test]
    fn test_longer_names_measure_wider() {
        let measurer = TextMeasurer::new();
        let short = measurer.measure_head(&HeadAttributes {
            name: "db",
            kind: EntityKind::Component,
        });
        let long = measurer.measure_head(&HeadAttributes {
            name: "authentication gateway service",
            kind: EntityKind::Component,
        });

        assert!(long.width() > short.width());
    }

    #[test]
    fn test_minimum_head_size() {
        let measurer = TextMeasurer::new();
        let size = measurer.measure_head(&HeadAttributes {
            name: "",
            kind: EntityKind::Actor,
        });

        assert!(size.width() >= MIN_HEAD_WIDTH);
        assert!(size.height() >= MIN_HEAD_HEIGHT);
    }
}
