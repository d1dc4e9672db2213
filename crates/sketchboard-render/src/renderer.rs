//! Backend trait and the frame renderer.

use kurbo::{Affine, BezPath, Point, Rect, Size};
use peniko::Color;
use sketchboard_core::camera::Camera;
use sketchboard_core::config::EditorConfig;
use sketchboard_core::editor::Editor;
use sketchboard_core::measure::TextMeasure;
use sketchboard_core::scene::Scene;
use sketchboard_core::selection::{Selection, corner_handles};
use sketchboard_core::shapes::{Shape, ShapeStyle, Text};
use sketchboard_core::text_edit::{TextEditState, caret_geometry, selection_rects};

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid (plain background).
    None,
    /// Full grid lines.
    #[default]
    Lines,
    /// Only corner dots (.).
    Dots,
}

/// Grid spacing in canvas units.
pub const GRID_SIZE: f64 = 20.0;

/// Paint for screen-space UI overlays.
#[derive(Debug, Clone, Copy)]
pub struct OverlayStyle {
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
    pub width: f64,
    pub dashed: bool,
}

impl OverlayStyle {
    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            fill: None,
            width,
            dashed: false,
        }
    }

    pub fn fill(color: Color) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
            width: 0.0,
            dashed: false,
        }
    }
}

/// Drawing target for a frame.
///
/// Shape calls receive canvas-space geometry plus the canvas-to-screen
/// transform; the backend owns the hand-drawn look. Overlay calls are
/// already in screen space and are drawn crisp.
pub trait RenderBackend {
    fn clear(&mut self, viewport: Size, background: Color);

    fn rough_rectangle(&mut self, rect: Rect, style: &ShapeStyle, transform: Affine);

    fn rough_circle(&mut self, center: Point, radius: f64, style: &ShapeStyle, transform: Affine);

    fn rough_line(&mut self, start: Point, end: Point, style: &ShapeStyle, transform: Affine);

    fn rough_path(&mut self, path: &BezPath, style: &ShapeStyle, transform: Affine);

    /// Draw a text shape. Lines are stacked `line_height` apart from the
    /// shape's top-left position.
    fn text(&mut self, text: &Text, line_height: f64, transform: Affine);

    fn overlay_rect(&mut self, rect: Rect, style: OverlayStyle);

    fn overlay_line(&mut self, start: Point, end: Point, color: Color, width: f64);
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub measure: &'a dyn TextMeasure,
    /// Viewport size in screen pixels.
    pub viewport_size: Size,
    pub selection: Option<&'a Selection>,
    /// Shape being drawn, in canvas space.
    pub preview: Option<Shape>,
    pub text_edit: Option<&'a TextEditState>,
    /// Host time, drives the caret blink.
    pub now_ms: u64,
    pub background_color: Color,
    pub grid_style: GridStyle,
    pub selection_color: Color,
    pub bbox_padding: f64,
    pub handle_size: f64,
    pub caret_blink_ms: u64,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(
        scene: &'a Scene,
        camera: &'a Camera,
        measure: &'a dyn TextMeasure,
        viewport_size: Size,
    ) -> Self {
        let config = EditorConfig::default();
        Self {
            scene,
            camera,
            measure,
            viewport_size,
            selection: None,
            preview: None,
            text_edit: None,
            now_ms: 0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            grid_style: GridStyle::Lines,
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            bbox_padding: config.bbox_padding,
            handle_size: config.handle_size,
            caret_blink_ms: config.caret_blink_ms,
        }
    }

    /// Everything the editor currently shows.
    pub fn from_editor(editor: &'a Editor, now_ms: u64) -> Self {
        Self::new(
            editor.scene(),
            editor.camera(),
            editor.measure(),
            editor.viewport(),
        )
        .with_config(editor.config())
        .with_selection(editor.selection())
        .with_preview(editor.drawing_preview())
        .with_text_edit(editor.text_edit())
        .with_time(now_ms)
    }

    /// Take padding, handle size and blink rate from `config`.
    pub fn with_config(mut self, config: &EditorConfig) -> Self {
        self.bbox_padding = config.bbox_padding;
        self.handle_size = config.handle_size;
        self.caret_blink_ms = config.caret_blink_ms;
        self
    }

    pub fn with_selection(mut self, selection: &'a Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_preview(mut self, preview: Option<Shape>) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_text_edit(mut self, text_edit: Option<&'a TextEditState>) -> Self {
        self.text_edit = text_edit;
        self
    }

    pub fn with_time(mut self, now_ms: u64) -> Self {
        self.now_ms = now_ms;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }
}

/// Draw one frame. Output depends only on `ctx`.
pub fn render_frame(ctx: &RenderContext, backend: &mut dyn RenderBackend) {
    let transform = ctx.camera.transform();
    backend.clear(ctx.viewport_size, ctx.background_color);
    render_grid(ctx, backend);

    for shape in ctx.scene.iter() {
        render_shape(shape, ctx.measure, transform, backend);
    }
    if let Some(preview) = &ctx.preview {
        render_shape(preview, ctx.measure, transform, backend);
    }

    render_selection(ctx, backend);
    render_text_edit(ctx, backend);

    if let Some(marquee) = ctx.selection.and_then(Selection::marquee) {
        let style = OverlayStyle {
            stroke: Some(ctx.selection_color),
            fill: Some(ctx.selection_color.with_alpha(0.1)),
            width: 1.0,
            dashed: true,
        };
        backend.overlay_rect(marquee.rect(), style);
    }
}

/// Draw one shape through the backend.
pub fn render_shape(
    shape: &Shape,
    measure: &dyn TextMeasure,
    transform: Affine,
    backend: &mut dyn RenderBackend,
) {
    match shape {
        Shape::Rectangle(r) => backend.rough_rectangle(r.as_rect(), &r.style, transform),
        Shape::Circle(c) => backend.rough_circle(c.center, c.radius, &c.style, transform),
        Shape::Line(l) => backend.rough_line(l.start, l.end, &l.style, transform),
        Shape::Arrow(a) => {
            backend.rough_line(a.start, a.end, &a.style, transform);
            let (left, right) = a.head_points();
            backend.rough_line(a.end, left, &a.style, transform);
            backend.rough_line(a.end, right, &a.style, transform);
        }
        Shape::Pencil(p) if shape.is_drawable() => {
            backend.rough_path(&p.to_path(), &p.style, transform)
        }
        Shape::Pencil(_) => {}
        Shape::Text(t) => backend.text(t, t.line_height(measure), transform),
    }
}

fn render_grid(ctx: &RenderContext, backend: &mut dyn RenderBackend) {
    if ctx.grid_style == GridStyle::None {
        return;
    }
    let visible = ctx.camera.visible_canvas_rect(ctx.viewport_size);
    let start_x = (visible.x0 / GRID_SIZE).floor() * GRID_SIZE;
    let start_y = (visible.y0 / GRID_SIZE).floor() * GRID_SIZE;
    let color = Color::from_rgba8(200, 200, 200, 100);
    let to_screen = |p: Point| ctx.camera.canvas_to_screen(p);

    match ctx.grid_style {
        GridStyle::None => {}
        GridStyle::Lines => {
            let mut x = start_x;
            while x <= visible.x1 {
                let top = to_screen(Point::new(x, visible.y0));
                let bottom = to_screen(Point::new(x, visible.y1));
                backend.overlay_line(top, bottom, color, 0.5);
                x += GRID_SIZE;
            }
            let mut y = start_y;
            while y <= visible.y1 {
                let left = to_screen(Point::new(visible.x0, y));
                let right = to_screen(Point::new(visible.x1, y));
                backend.overlay_line(left, right, color, 0.5);
                y += GRID_SIZE;
            }
        }
        GridStyle::Dots => {
            let dot = 1.5;
            let mut x = start_x;
            while x <= visible.x1 {
                let mut y = start_y;
                while y <= visible.y1 {
                    let p = to_screen(Point::new(x, y));
                    let rect = Rect::new(p.x - dot, p.y - dot, p.x + dot, p.y + dot);
                    backend.overlay_rect(rect, OverlayStyle::fill(color));
                    y += GRID_SIZE;
                }
                x += GRID_SIZE;
            }
        }
    }
}

/// Padded boxes around selected shapes, plus corner handles when the sole
/// selection is a text shape that is not being edited.
fn render_selection(ctx: &RenderContext, backend: &mut dyn RenderBackend) {
    let Some(selection) = ctx.selection else {
        return;
    };
    let outline = OverlayStyle::stroke(ctx.selection_color, 1.0);
    for shape in ctx.scene.iter().filter(|s| selection.contains(s.id())) {
        let bounds = shape.padded_bounds(ctx.bbox_padding, ctx.measure);
        backend.overlay_rect(ctx.camera.transform().transform_rect_bbox(bounds), outline);
    }

    let handle_target = selection
        .sole()
        .and_then(|id| ctx.scene.get(id))
        .filter(|s| s.as_text().is_some_and(|t| !t.is_editing));
    if let Some(shape) = handle_target {
        let bounds = shape.padded_bounds(ctx.bbox_padding, ctx.measure);
        let half = ctx.handle_size / 2.0;
        let handle = OverlayStyle {
            stroke: Some(ctx.selection_color),
            fill: Some(Color::WHITE),
            width: 1.5,
            dashed: false,
        };
        for (_, corner) in corner_handles(bounds) {
            let p = ctx.camera.canvas_to_screen(corner);
            backend.overlay_rect(Rect::new(p.x - half, p.y - half, p.x + half, p.y + half), handle);
        }
    }
}

/// Selection highlight and caret of the text being edited.
fn render_text_edit(ctx: &RenderContext, backend: &mut dyn RenderBackend) {
    let Some(state) = ctx.text_edit else {
        return;
    };
    let Some(text) = ctx.scene.get(state.shape_id).and_then(Shape::as_text) else {
        return;
    };
    let transform = ctx.camera.transform();

    if let Some(range) = state.selection_range() {
        let highlight = OverlayStyle::fill(ctx.selection_color.with_alpha(0.3));
        for rect in selection_rects(text, range, ctx.measure) {
            backend.overlay_rect(transform.transform_rect_bbox(rect), highlight);
        }
    }

    if state.caret_visible(ctx.now_ms, ctx.caret_blink_ms) {
        let (top, height) = caret_geometry(text, state.cursor(), ctx.measure);
        let bottom = Point::new(top.x, top.y + height);
        backend.overlay_line(
            ctx.camera.canvas_to_screen(top),
            ctx.camera.canvas_to_screen(bottom),
            text.style.stroke(),
            1.5,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::{CommandRecorder, DrawCommand};
    use sketchboard_core::input::{Key, KeyEvent, PointerEvent};
    use sketchboard_core::measure::MonospaceMeasure;
    use sketchboard_core::drawing::ToolKind;
    use sketchboard_core::shapes::{Arrow, Rectangle};

    fn editor() -> Editor {
        Editor::with_measure(
            EditorConfig::default(),
            Box::new(MonospaceMeasure { advance: 10.0 }),
        )
    }

    fn record(ctx: &RenderContext) -> Vec<DrawCommand> {
        let mut recorder = CommandRecorder::new();
        render_frame(ctx, &mut recorder);
        recorder.take()
    }

    fn overlay_rects(commands: &[DrawCommand]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::OverlayRect { .. }))
            .count()
    }

    #[test]
    fn test_shapes_in_paint_order() {
        let mut scene = Scene::new();
        scene.add(Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0)));
        scene.add(Shape::Arrow(Arrow::new(Point::ZERO, Point::new(50.0, 0.0))));
        let camera = Camera::default();
        let measure = MonospaceMeasure { advance: 10.0 };
        let ctx = RenderContext::new(&scene, &camera, &measure, Size::new(100.0, 100.0))
            .with_grid(GridStyle::None);

        let commands = record(&ctx);
        assert!(matches!(commands[0], DrawCommand::Clear { .. }));
        let shapes: Vec<_> = commands.iter().filter(|c| c.is_shape()).collect();
        // Rectangle, then the arrow shaft and both head strokes.
        assert_eq!(shapes.len(), 4);
        assert!(matches!(shapes[0], DrawCommand::Rectangle { .. }));
        assert!(shapes[1..].iter().all(|c| matches!(c, DrawCommand::Line { .. })));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Rectangle);
        editor.pointer_down(PointerEvent::left(Point::new(10.0, 10.0), 0));
        editor.pointer_move(Point::new(60.0, 60.0));
        let ctx = RenderContext::from_editor(&editor, 0);
        assert_eq!(record(&ctx), record(&ctx));
        // The preview is drawn on top of the (empty) scene.
        assert_eq!(record(&ctx).iter().filter(|c| c.is_shape()).count(), 1);
    }

    #[test]
    fn test_grid_lines_follow_viewport() {
        let scene = Scene::new();
        let camera = Camera::default();
        let measure = MonospaceMeasure { advance: 10.0 };
        let ctx = RenderContext::new(&scene, &camera, &measure, Size::new(100.0, 40.0));
        let lines = record(&ctx)
            .iter()
            .filter(|c| matches!(c, DrawCommand::OverlayLine { .. }))
            .count();
        // x = 0..=100 and y = 0..=40 in steps of 20.
        assert_eq!(lines, 6 + 3);
    }

    #[test]
    fn test_text_handles_only_when_not_editing() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Text);
        editor.pointer_down(PointerEvent::left(Point::new(100.0, 100.0), 0));
        editor.pointer_up(Point::new(100.0, 100.0));
        editor.key_down(KeyEvent::plain(Key::Char('a')));

        // Editing: one selection box, no handles, caret visible at t = 0.
        let ctx = RenderContext::from_editor(&editor, 0).with_grid(GridStyle::None);
        let commands = record(&ctx);
        assert_eq!(overlay_rects(&commands), 1);
        let caret = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::OverlayLine { start, end, .. } => Some((*start, *end)),
                _ => None,
            })
            .expect("caret drawn");
        assert_eq!(caret.0, Point::new(110.0, 100.0));
        assert_eq!(caret.1, Point::new(110.0, 124.0));

        // Blink phase two hides the caret.
        let hidden = RenderContext::from_editor(&editor, 600).with_grid(GridStyle::None);
        assert!(!record(&hidden).iter().any(|c| matches!(c, DrawCommand::OverlayLine { .. })));

        // After editing the sole selected text shows four handles.
        editor.finish_text_edit();
        let ctx = RenderContext::from_editor(&editor, 0).with_grid(GridStyle::None);
        assert_eq!(overlay_rects(&record(&ctx)), 1 + 4);
    }

    #[test]
    fn test_text_selection_highlight() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Text);
        editor.pointer_down(PointerEvent::left(Point::new(0.0, 0.0), 0));
        editor.pointer_up(Point::new(0.0, 0.0));
        for c in "ab\ncd".chars() {
            let key = if c == '\n' { Key::Enter } else { Key::Char(c) };
            editor.key_down(KeyEvent::plain(key));
        }
        editor.key_down(KeyEvent::new(
            Key::Char('a'),
            sketchboard_core::input::Modifiers::CTRL,
            0,
        ));
        let ctx = RenderContext::from_editor(&editor, 0).with_grid(GridStyle::None);
        // Selection box plus one highlight per line.
        assert_eq!(overlay_rects(&record(&ctx)), 1 + 2);
    }

    #[test]
    fn test_marquee_is_drawn_in_screen_space() {
        let mut editor = editor();
        editor.camera_mut().scale = 2.0;
        editor.pointer_down(PointerEvent::left(Point::new(10.0, 10.0), 0));
        editor.pointer_move(Point::new(50.0, 30.0));
        let ctx = RenderContext::from_editor(&editor, 0).with_grid(GridStyle::None);
        let marquee = record(&ctx)
            .into_iter()
            .find_map(|c| match c {
                DrawCommand::OverlayRect { rect, dashed: true, .. } => Some(rect),
                _ => None,
            })
            .expect("marquee drawn");
        assert_eq!(marquee, Rect::new(10.0, 10.0, 50.0, 30.0));
    }
}
