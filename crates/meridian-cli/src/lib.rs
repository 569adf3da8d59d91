//! Meridian CLI library
//!
//! This crate is the outer collaborator of the Meridian pipeline: it reads
//! source files, supplies the text-measurement and SVG-rendering
//! implementations behind the core's boundary traits, and renders
//! diagnostics with miette.

pub mod error_adapter;

mod args;
mod measure;
mod svg_renderer;

pub use args::Args;

use std::fs;

use log::info;

use meridian::{Diagram, MeridianError, RowOptions, compile};

/// Run the Meridian CLI application.
///
/// Processes the input file through the full pipeline and writes the
/// resulting SVG to the output file.
///
/// # Errors
///
/// Returns [`MeridianError`] for file I/O errors, parse errors, layout
/// errors, and diagram usage errors.
pub fn run(args: &Args) -> Result<(), MeridianError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing sequence diagram"
    );

    let source = fs::read_to_string(&args.input)?;

    let sequence = compile(&source)?;
    info!(entities_len = sequence.entity_count(); "Parsed sequence");

    let mut diagram = Diagram::from_sequence(&sequence);
    let measurer = measure::TextMeasurer::new();
    diagram.layout(&measurer, RowOptions::default())?;

    let mut renderer = svg_renderer::SvgRenderer::new();
    diagram.draw(&mut renderer)?;
    let document = renderer.into_document(diagram.size()?);

    svg::save(&args.output, &document)?;

    info!(output_file = args.output; "SVG exported successfully");
    Ok(())
}
