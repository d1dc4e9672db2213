//! End-to-end interaction tests driving the editor with synthetic events.

use kurbo::{Point, Size};
use sketchboard_core::{
    Editor, EditorConfig, Gesture, ImportMode, Key, KeyEvent, Modifiers, MonospaceMeasure,
    PointerEvent, Shape, SvgElement, SvgElementKind, ToolKind,
};

use sketchboard_core::shapes::ShapeTrait;

fn editor() -> Editor {
    Editor::with_measure(
        EditorConfig::default(),
        Box::new(MonospaceMeasure { advance: 10.0 }),
    )
}

fn press(editor: &mut Editor, x: f64, y: f64, time_ms: u64) {
    editor.pointer_down(PointerEvent::left(Point::new(x, y), time_ms));
}

fn click(editor: &mut Editor, x: f64, y: f64, time_ms: u64) {
    press(editor, x, y, time_ms);
    editor.pointer_up(Point::new(x, y));
}

fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
    press(editor, from.0, from.1, 0);
    editor.pointer_move(Point::new(to.0, to.1));
    editor.pointer_up(Point::new(to.0, to.1));
}

fn key(editor: &mut Editor, key: Key) {
    editor.key_down(KeyEvent::plain(key));
}

fn ctrl(editor: &mut Editor, c: char) {
    editor.key_down(KeyEvent::new(Key::Char(c), Modifiers::CTRL, 0));
}

fn draw_rect(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
    editor.set_tool(ToolKind::Rectangle);
    drag(editor, from, to);
}

/// An editor holding one committed "hello" at (100, 100), 20px font.
/// With a 10px monospace advance it spans (100, 100)-(150, 124).
fn editor_with_text() -> Editor {
    let mut editor = editor();
    let json = r#"{"version": "1", "objects": [
        {"type": "text", "x": 100, "y": 100, "text": "hello", "fontSize": 20}
    ]}"#;
    editor.import_json(json, ImportMode::Strict).unwrap();
    editor
}

fn sole_text(editor: &Editor) -> sketchboard_core::shapes::Text {
    editor.scene().shapes()[0].as_text().cloned().unwrap()
}

#[test]
fn test_wheel_zoom_keeps_point_under_cursor() {
    let mut editor = editor();
    let anchor = Point::new(321.0, 123.0);
    let before = editor.camera().screen_to_canvas(anchor);
    for delta in [-1.0, -1.0, -1.0, 1.0, -1.0] {
        editor.wheel(anchor, delta);
        let after = editor.camera().screen_to_canvas(anchor);
        assert!((after.x - before.x).abs() < 1e-9);
        assert!((after.y - before.y).abs() < 1e-9);
    }
}

#[test]
fn test_inverted_zoom_bounds_fall_back_to_defaults() {
    let config = EditorConfig {
        min_scale: 5.0,
        max_scale: 1.0,
        ..EditorConfig::default()
    };
    let mut editor = Editor::with_measure(config, Box::new(MonospaceMeasure { advance: 10.0 }));
    assert!(editor.config().validate().is_ok());

    for _ in 0..100 {
        editor.wheel(Point::new(10.0, 10.0), -1.0);
    }
    assert!((editor.camera().scale - 30.0).abs() < 1e-9);
}

#[test]
fn test_undo_redo_over_commits() {
    let mut editor = editor();
    for i in 0..3 {
        let x = i as f64 * 100.0;
        draw_rect(&mut editor, (x, 0.0), (x + 50.0, 50.0));
    }
    let final_scene = editor.scene().clone();
    assert_eq!(final_scene.len(), 3);

    for expected in (0..3).rev() {
        ctrl(&mut editor, 'z');
        assert_eq!(editor.scene().len(), expected);
    }
    ctrl(&mut editor, 'z');
    assert!(editor.scene().is_empty());

    for _ in 0..3 {
        ctrl(&mut editor, 'y');
    }
    ctrl(&mut editor, 'y');
    assert_eq!(editor.scene(), &final_scene);
}

#[test]
fn test_pencil_click_is_discarded() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Pencil);
    click(&mut editor, 100.0, 100.0, 0);
    assert!(editor.scene().is_empty());
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.tool(), ToolKind::Pencil);

    drag(&mut editor, (100.0, 100.0), (140.0, 120.0));
    assert_eq!(editor.scene().len(), 1);
    assert_eq!(editor.history().len(), 2);
    assert_eq!(editor.tool(), ToolKind::Select);
}

#[test]
fn test_topmost_shape_wins() {
    let mut editor = editor();
    draw_rect(&mut editor, (0.0, 0.0), (100.0, 100.0));
    draw_rect(&mut editor, (50.0, 50.0), (150.0, 150.0));
    let top = editor.scene().shapes()[1].id();

    click(&mut editor, 75.0, 75.0, 0);
    assert_eq!(editor.selection().sole(), Some(top));
}

#[test]
fn test_marquee_selects_fully_contained_only() {
    let mut editor = editor();
    let json = r#"{"version": "1", "objects": [
        {"type": "rectangle", "x": 20, "y": 20, "width": 20, "height": 20},
        {"type": "circle", "x": 95, "y": 50, "radius": 10}
    ]}"#;
    editor.import_json(json, ImportMode::Strict).unwrap();
    let inside = editor.scene().shapes()[0].id();

    drag(&mut editor, (0.0, 0.0), (90.0, 90.0));
    assert_eq!(editor.selection().len(), 1);
    assert!(editor.selection().contains(inside));
    assert!(editor.selection().marquee().is_none());

    // A tiny drag is a click on empty canvas.
    drag(&mut editor, (300.0, 300.0), (303.0, 302.0));
    assert!(editor.selection().is_empty());
}

#[test]
fn test_double_click_window() {
    let mut editor = editor_with_text();
    click(&mut editor, 120.0, 110.0, 1_000);
    click(&mut editor, 120.0, 110.0, 1_500);
    assert!(editor.text_edit().is_none());

    let mut editor = editor_with_text();
    click(&mut editor, 120.0, 110.0, 1_000);
    click(&mut editor, 120.0, 110.0, 1_300);
    let state = editor.text_edit().expect("double-click enters editing");
    assert!(!state.is_new);
    assert_eq!(state.cursor(), 2);
    assert!(sole_text(&editor).is_editing);
}

#[test]
fn test_text_edit_commits_once_on_exit() {
    let mut editor = editor_with_text();
    let commits = editor.history().len();
    click(&mut editor, 120.0, 110.0, 0);
    click(&mut editor, 120.0, 110.0, 100);

    key(&mut editor, Key::End);
    for c in "!!".chars() {
        key(&mut editor, Key::Char(c));
    }
    key(&mut editor, Key::Enter);
    key(&mut editor, Key::Char('x'));
    assert_eq!(editor.history().len(), commits);

    key(&mut editor, Key::Escape);
    assert_eq!(editor.history().len(), commits + 1);
    let text = sole_text(&editor);
    assert_eq!(text.content, "hello!!\nx");
    assert!(!text.is_editing);

    ctrl(&mut editor, 'z');
    assert_eq!(sole_text(&editor).content, "hello");
}

#[test]
fn test_unchanged_edit_does_not_commit() {
    let mut editor = editor_with_text();
    let commits = editor.history().len();
    click(&mut editor, 120.0, 110.0, 0);
    click(&mut editor, 120.0, 110.0, 100);
    key(&mut editor, Key::ArrowLeft);
    key(&mut editor, Key::Escape);
    assert_eq!(editor.history().len(), commits);
}

#[test]
fn test_emptied_text_is_removed() {
    let mut editor = editor_with_text();
    let commits = editor.history().len();
    click(&mut editor, 120.0, 110.0, 0);
    click(&mut editor, 120.0, 110.0, 100);
    ctrl(&mut editor, 'a');
    key(&mut editor, Key::Backspace);

    // Clicking elsewhere ends the edit.
    click(&mut editor, 500.0, 500.0, 5_000);
    assert!(editor.scene().is_empty());
    assert_eq!(editor.history().len(), commits + 1);

    ctrl(&mut editor, 'z');
    assert_eq!(sole_text(&editor).content, "hello");
}

#[test]
fn test_drag_move_commits_once() {
    let mut editor = editor();
    draw_rect(&mut editor, (10.0, 10.0), (50.0, 50.0));
    let commits = editor.history().len();

    press(&mut editor, 30.0, 30.0, 0);
    editor.pointer_move(Point::new(40.0, 35.0));
    editor.pointer_move(Point::new(60.0, 50.0));
    assert_eq!(editor.history().len(), commits);
    editor.pointer_up(Point::new(60.0, 50.0));

    assert_eq!(editor.history().len(), commits + 1);
    match &editor.scene().shapes()[0] {
        Shape::Rectangle(r) => assert_eq!(r.position, Point::new(40.0, 30.0)),
        other => panic!("expected rectangle, got {other:?}"),
    }

    // A click without movement is not an edit.
    click(&mut editor, 50.0, 40.0, 10_000);
    assert_eq!(editor.history().len(), commits + 1);
}

#[test]
fn test_pointer_leave_restores_moved_shapes() {
    let mut editor = editor();
    draw_rect(&mut editor, (10.0, 10.0), (50.0, 50.0));
    let before = editor.scene().clone();
    let commits = editor.history().len();

    press(&mut editor, 30.0, 30.0, 0);
    editor.pointer_move(Point::new(200.0, 200.0));
    assert_ne!(editor.scene(), &before);
    editor.pointer_leave();

    assert_eq!(editor.scene(), &before);
    assert_eq!(editor.history().len(), commits);
    assert!(editor.gesture().is_none());
}

#[test]
fn test_text_resize_from_corner_handle() {
    let mut editor = editor_with_text();
    let commits = editor.history().len();
    click(&mut editor, 120.0, 110.0, 0);
    assert!(editor.selection().sole().is_some());

    // Bottom-right corner of the padded box is (155, 129).
    press(&mut editor, 155.0, 129.0, 5_000);
    assert!(matches!(editor.gesture(), Some(Gesture::Resize(_))));
    editor.pointer_move(Point::new(185.0, 159.0));
    editor.pointer_up(Point::new(185.0, 159.0));

    let text = sole_text(&editor);
    assert!((text.font_size - 32.0).abs() < f64::EPSILON);
    // The opposite corner stays put.
    assert_eq!(text.position, Point::new(100.0, 100.0));
    assert_eq!(editor.history().len(), commits + 1);
}

#[test]
fn test_text_resize_is_clamped() {
    let mut editor = editor_with_text();
    click(&mut editor, 120.0, 110.0, 0);
    press(&mut editor, 155.0, 129.0, 5_000);
    editor.pointer_move(Point::new(-500.0, -500.0));
    editor.pointer_up(Point::new(-500.0, -500.0));
    // 20 * 0.2 = 4, then clamped to the minimum font size.
    assert!((sole_text(&editor).font_size - 8.0).abs() < f64::EPSILON);
}

#[test]
fn test_escape_resets_tool_and_selection() {
    let mut editor = editor();
    draw_rect(&mut editor, (10.0, 10.0), (50.0, 50.0));
    click(&mut editor, 30.0, 30.0, 0);
    editor.set_tool(ToolKind::Pencil);
    key(&mut editor, Key::Escape);
    assert_eq!(editor.tool(), ToolKind::Select);
    assert!(editor.selection().is_empty());
}

#[test]
fn test_pan_does_not_end_text_edit() {
    let mut editor = editor_with_text();
    click(&mut editor, 120.0, 110.0, 0);
    click(&mut editor, 120.0, 110.0, 100);
    assert!(editor.text_edit().is_some());

    let middle = PointerEvent::left(Point::new(400.0, 400.0), 200)
        .with_button(sketchboard_core::MouseButton::Middle);
    editor.pointer_down(middle);
    editor.pointer_move(Point::new(420.0, 400.0));
    editor.pointer_up(Point::new(420.0, 400.0));
    assert!(editor.text_edit().is_some());
    assert!((editor.camera().offset.x - 20.0).abs() < 1e-9);
}

#[test]
fn test_svg_import_fits_and_selects() {
    let mut editor = editor();
    editor.set_viewport(Size::new(800.0, 600.0));
    let elements = vec![
        SvgElement::new(SvgElementKind::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 2000.0,
            y2: 0.0,
        }),
        SvgElement::new(SvgElementKind::Circle {
            cx: 1000.0,
            cy: 100.0,
            r: 50.0,
        }),
    ];
    assert_eq!(editor.import_svg(&elements), 2);
    assert_eq!(editor.selection().len(), 2);

    let bounds = editor.scene().bounds(editor.measure()).unwrap();
    assert!((bounds.width() - 640.0).abs() < 1e-6);
    assert!((bounds.center().x - 400.0).abs() < 1e-6);
    assert!((bounds.center().y - 300.0).abs() < 1e-6);

    ctrl(&mut editor, 'z');
    assert!(editor.scene().is_empty());
}

#[test]
fn test_json_round_trip_through_editor() {
    let mut editor = editor();
    draw_rect(&mut editor, (10.0, 10.0), (50.0, 50.0));
    editor.set_tool(ToolKind::Arrow);
    drag(&mut editor, (100.0, 100.0), (200.0, 150.0));
    editor.set_tool(ToolKind::Text);
    click(&mut editor, 300.0, 300.0, 0);
    for c in "label".chars() {
        key(&mut editor, Key::Char(c));
    }
    key(&mut editor, Key::Escape);

    let json = editor.export_json().unwrap();
    let mut other = self::editor();
    assert_eq!(other.import_json(&json, ImportMode::Strict).unwrap(), 3);
    assert_eq!(other.scene(), editor.scene());
}
