//! End-to-end pipeline tests: source text through parse, build, layout,
//! and draw against a recording renderer.

use meridian::{
    Diagram, HeadAttributes, HeadMeasurer, Renderer, RowOptions, compile,
};
use meridian_core::{
    geometry::{Point, Size},
    sequence::MessageStyle,
};

/// Estimates head width from the name length, no font stack involved.
struct CharCountMeasurer;

impl HeadMeasurer for CharCountMeasurer {
    fn measure_head(&self, attributes: &HeadAttributes<'_>) -> Size {
        Size::new(attributes.name.len() as f32 * 8.0 + 16.0, 30.0)
    }
}

#[derive(Default)]
struct RecordingRenderer {
    heads: Vec<(String, f32)>,
    messages: Vec<(MessageStyle, Option<f32>, Option<f32>)>,
    bars: usize,
}

impl Renderer for RecordingRenderer {
    fn head(&mut self, attributes: &HeadAttributes<'_>, top_center: Point, _size: Size) {
        self.heads
            .push((attributes.name.to_string(), top_center.x()));
    }

    fn lifeline(&mut self, _x: f32, _top_y: f32, _end_y: f32) {}

    fn activation_bar(&mut self, _x: f32, _top_y: f32, _end_y: f32) {
        self.bars += 1;
    }

    fn message(
        &mut self,
        style: MessageStyle,
        _label: &str,
        from_x: Option<f32>,
        to_x: Option<f32>,
        _y: f32,
    ) {
        self.messages.push((style, from_x, to_x));
    }
}

#[test]
fn test_source_to_drawn_diagram() {
    let source = r#"
        actor user "User";
        component api "API";
        component db "Database";

        -> api : "request" {
            -> db : "query" {
                return "rows";
            };
            ~> user : "notification";
            -> * : "metrics";
            return "response";
        };
    "#;

    let sequence = compile(source).expect("valid source");
    let mut diagram = Diagram::from_sequence(&sequence);
    diagram
        .layout(&CharCountMeasurer, RowOptions::default())
        .expect("first layout succeeds");

    let mut renderer = RecordingRenderer::default();
    diagram.draw(&mut renderer).expect("laid out");

    // Heads appear in declaration order, left to right
    let names: Vec<_> = renderer.heads.iter().map(|(name, _)| name.clone()).collect();
    assert_eq!(names, ["User", "API", "Database"]);
    let xs: Vec<_> = renderer.heads.iter().map(|(_, x)| *x).collect();
    assert!(xs[0] < xs[1] && xs[1] < xs[2]);

    // Two call bodies produce two activation bars
    assert_eq!(renderer.bars, 2);

    // Messages arrive in depth-first pre-order
    let styles: Vec<_> = renderer.messages.iter().map(|(style, ..)| *style).collect();
    assert_eq!(
        styles,
        [
            MessageStyle::Call,      // -> api
            MessageStyle::Call,      // api -> db
            MessageStyle::Return,    // "rows"
            MessageStyle::AsyncCall, // ~> user
            MessageStyle::Lost,      // -> *
            MessageStyle::Return,    // "response"
        ]
    );

    // The root call comes from outside: no sender endpoint
    let (_, root_from, root_to) = renderer.messages[0];
    assert!(root_from.is_none());
    assert!(root_to.is_some());

    // The lost message has a sender but no receiver endpoint
    let (_, lost_from, lost_to) = renderer.messages[4];
    assert!(lost_from.is_some());
    assert!(lost_to.is_none());
}

#[test]
fn test_compile_error_keeps_source_for_spans() {
    let source = "-> ghost;";
    let err = compile(source).expect_err("undeclared participant");

    match err {
        meridian::MeridianError::Parse { err, src } => {
            assert_eq!(src, source);
            let span = err.diagnostics()[0].labels()[0].span();
            assert_eq!(&source[span.start()..span.end()], "ghost");
        }
        other => panic!("expected a parse error, got {other}"),
    }
}
