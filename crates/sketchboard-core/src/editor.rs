//! The interaction controller.
//!
//! [`Editor`] owns the scene and every piece of transient UI state, and turns
//! pointer and keyboard events into edits. Each finished edit is exactly one
//! history commit.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::drawing::{DrawingSession, ToolKind};
use crate::format::{self, ImportError, ImportMode};
use crate::history::History;
use crate::input::{ClickTracker, KeyEvent, MouseButton, PointerEvent};
use crate::measure::{ApproximateMeasure, TextMeasure};
use crate::scene::Scene;
use crate::selection::{ManipulationState, MultiMoveState, Selection, hit_test_handles};
use crate::shapes::{Shape, ShapeId, ShapeStyle, Text};
use crate::shortcuts::Command;
use crate::svg_import::{self, SvgElement};
use crate::text_edit::{TextEditResult, TextEditState, caret_from_point};
use kurbo::{Point, Size};

/// The one pointer interaction in progress.
#[derive(Debug, Clone)]
pub enum Gesture {
    Pan,
    Draw,
    Marquee,
    Move(MultiMoveState),
    Resize(ManipulationState),
}

/// Editor state and event handling.
pub struct Editor {
    scene: Scene,
    history: History,
    selection: Selection,
    camera: Camera,
    drawing: DrawingSession,
    text_edit: Option<TextEditState>,
    tool: ToolKind,
    gesture: Option<Gesture>,
    clicks: ClickTracker,
    config: EditorConfig,
    measure: Box<dyn TextMeasure>,
    viewport: Size,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor that measures text with [`ApproximateMeasure`].
    pub fn new(config: EditorConfig) -> Self {
        Self::with_measure(config, Box::new(ApproximateMeasure))
    }

    /// Create an editor with a host text measure. Invalid settings in
    /// `config` fall back to their defaults.
    pub fn with_measure(config: EditorConfig, measure: Box<dyn TextMeasure>) -> Self {
        let config = config.sanitized();
        let scene = Scene::new();
        Self {
            history: History::new(scene.clone(), config.history_cap),
            scene,
            selection: Selection::new(),
            camera: Camera::from_config(&config),
            drawing: DrawingSession::new(),
            text_edit: None,
            tool: ToolKind::default(),
            gesture: None,
            clicks: ClickTracker::new(),
            config,
            measure,
            viewport: Size::new(800.0, 600.0),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn text_edit(&self) -> Option<&TextEditState> {
        self.text_edit.as_ref()
    }

    /// The text shape open in the editor, if any.
    pub fn editing_text(&self) -> Option<&Text> {
        let state = self.text_edit.as_ref()?;
        self.scene.get(state.shape_id)?.as_text()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Host canvas size in screen pixels.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Style given to new shapes.
    pub fn current_style(&self) -> &ShapeStyle {
        &self.drawing.current_style
    }

    pub fn set_current_style(&mut self, style: ShapeStyle) {
        self.drawing.current_style = style;
    }

    /// Switch tools. Any text edit is finished and gestures are cancelled.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.finish_text_edit();
        self.cancel_gesture();
        self.tool = tool;
    }

    /// The shape being drawn, for rendering.
    pub fn drawing_preview(&self) -> Option<Shape> {
        matches!(self.gesture, Some(Gesture::Draw))
            .then(|| self.drawing.preview(&self.camera))
            .flatten()
    }

    fn hit_tolerance(&self) -> f64 {
        self.config.canvas_hit_threshold(self.camera.scale)
    }

    fn commit(&mut self) {
        self.history.commit(&self.scene);
    }

    // --- Pointer events ---

    pub fn pointer_down(&mut self, event: PointerEvent) {
        let screen = event.position;
        let canvas = self.camera.screen_to_canvas(screen);

        if event.modifiers.alt || event.button == MouseButton::Middle {
            self.camera.start_pan(screen);
            self.gesture = Some(Gesture::Pan);
            log::debug!("pan started");
            return;
        }
        if event.button != MouseButton::Left {
            return;
        }

        if let Some(edit_id) = self.text_edit.as_ref().map(|s| s.shape_id) {
            let hit = self
                .scene
                .shape_at_canvas_point(canvas, self.hit_tolerance(), self.measure.as_ref());
            if hit == Some(edit_id) {
                self.move_caret_to(canvas, event.time_ms);
                return;
            }
            self.finish_text_edit();
        }

        if self.try_start_resize(canvas) {
            return;
        }

        match self.tool {
            tool if tool.is_draw_tool() => {
                self.drawing.start(tool, screen, &self.camera);
                self.gesture = Some(Gesture::Draw);
            }
            ToolKind::Text => self.place_text(canvas, event.time_ms),
            _ => self.select_at(event, canvas),
        }
    }

    pub fn pointer_move(&mut self, screen: Point) {
        let canvas = self.camera.screen_to_canvas(screen);
        match self.gesture.as_mut() {
            Some(Gesture::Pan) => self.camera.update_pan(screen),
            Some(Gesture::Draw) => self.drawing.update(screen, &self.camera),
            Some(Gesture::Marquee) => self.selection.update_marquee(screen),
            Some(Gesture::Move(state)) => {
                state.current_point = canvas;
                for shape in state.moved_shapes() {
                    self.scene.replace(shape);
                }
            }
            Some(Gesture::Resize(state)) => {
                state.current_point = canvas;
                let resized = state.resized(&self.config, self.measure.as_ref());
                self.scene.replace(Shape::Text(resized));
            }
            None => {}
        }
    }

    pub fn pointer_up(&mut self, screen: Point) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        match gesture {
            Gesture::Pan => self.camera.end_pan(),
            Gesture::Draw => {
                self.drawing.update(screen, &self.camera);
                if let Some(shape) = self.drawing.finish(&self.camera, &self.config) {
                    log::debug!("added {}", shape.kind().name());
                    self.scene.add(shape);
                    self.commit();
                    self.tool = ToolKind::Select;
                }
            }
            Gesture::Marquee => {
                self.selection.update_marquee(screen);
                self.selection.finish_marquee(
                    &self.scene,
                    &self.camera,
                    &self.config,
                    self.measure.as_ref(),
                );
            }
            Gesture::Move(state) => {
                if state.has_moved() {
                    log::debug!("moved {} shapes", state.original_shapes.len());
                    self.commit();
                }
            }
            Gesture::Resize(state) => {
                let changed = self
                    .scene
                    .get(state.shape_id)
                    .is_some_and(|s| s.as_text() != Some(&state.original));
                if changed {
                    log::debug!("resized text {}", state.shape_id);
                    self.commit();
                }
            }
        }
    }

    /// Pointer left the canvas: drop in-progress work without committing.
    pub fn pointer_leave(&mut self) {
        self.cancel_gesture();
    }

    /// Zoom around the pointer. Negative `delta_y` (wheel up) zooms in.
    pub fn wheel(&mut self, screen: Point, delta_y: f64) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y < 0.0 {
            self.config.zoom_step
        } else {
            1.0 / self.config.zoom_step
        };
        self.camera.zoom_at(screen, factor);
    }

    fn move_caret_to(&mut self, canvas: Point, now_ms: u64) {
        let Some(state) = self.text_edit.as_mut() else {
            return;
        };
        if let Some(text) = self.scene.get(state.shape_id).and_then(Shape::as_text) {
            let caret = caret_from_point(text, canvas, self.measure.as_ref());
            state.set_cursor(caret, &text.content);
            state.reset_blink(now_ms);
        }
    }

    /// Start a resize when the click lands on a handle of the sole selected
    /// text shape.
    fn try_start_resize(&mut self, canvas: Point) -> bool {
        let Some(text) = self
            .selection
            .sole()
            .and_then(|id| self.scene.get(id))
            .and_then(Shape::as_text)
            .filter(|t| !t.is_editing)
        else {
            return false;
        };

        let padding = self.config.bbox_padding;
        let bounds = Shape::Text(text.clone()).padded_bounds(padding, self.measure.as_ref());
        let tolerance = self.config.handle_size / self.camera.scale;
        let Some(corner) = hit_test_handles(bounds, canvas, tolerance) else {
            return false;
        };
        let state = ManipulationState::new(
            text.clone(),
            corner,
            canvas,
            padding,
            self.measure.as_ref(),
        );
        log::debug!("resize started on {:?} handle", corner);
        self.gesture = Some(Gesture::Resize(state));
        true
    }

    fn place_text(&mut self, canvas: Point, now_ms: u64) {
        let text = Text::new(canvas, String::new())
            .with_font_size(self.config.default_font_size);
        let shape = Shape::Text(text).with_style(self.drawing.current_style.reseeded());
        let id = shape.id();
        self.scene.add(shape);
        self.enter_text_edit(id, 0, true, now_ms);
        self.tool = ToolKind::Select;
    }

    fn select_at(&mut self, event: PointerEvent, canvas: Point) {
        let hit = self
            .scene
            .shape_at_canvas_point(canvas, self.hit_tolerance(), self.measure.as_ref());
        let Some(id) = hit else {
            self.clicks.reset();
            self.selection.clear();
            self.selection.start_marquee(event.position);
            self.gesture = Some(Gesture::Marquee);
            return;
        };

        if event.modifiers.shift {
            self.clicks.reset();
            self.selection.toggle(id);
            return;
        }

        let is_text = self.scene.get(id).is_some_and(Shape::is_text);
        if is_text && self.clicks.register(id, event.time_ms, self.config.double_click_ms) {
            let caret = self
                .scene
                .get(id)
                .and_then(Shape::as_text)
                .map_or(0, |t| caret_from_point(t, canvas, self.measure.as_ref()));
            self.enter_text_edit(id, caret, false, event.time_ms);
            return;
        }
        if !is_text {
            self.clicks.reset();
        }

        if !self.selection.contains(id) {
            self.selection.select(id);
        }
        let originals: Vec<Shape> = self
            .scene
            .iter()
            .filter(|s| self.selection.contains(s.id()))
            .cloned()
            .collect();
        self.gesture = Some(Gesture::Move(MultiMoveState::new(canvas, originals)));
    }

    /// Abandon the active gesture, restoring any previewed shapes.
    fn cancel_gesture(&mut self) {
        match self.gesture.take() {
            Some(Gesture::Pan) => self.camera.end_pan(),
            Some(Gesture::Draw) => self.drawing.cancel(),
            Some(Gesture::Marquee) => self.selection.cancel_marquee(),
            Some(Gesture::Move(state)) => {
                for shape in state.original_shapes {
                    self.scene.replace(shape);
                }
            }
            Some(Gesture::Resize(state)) => {
                self.scene.replace(Shape::Text(state.original));
            }
            None => {}
        }
    }

    // --- Text editing ---

    fn enter_text_edit(&mut self, id: ShapeId, caret: usize, is_new: bool, now_ms: u64) {
        let Some(text) = self.scene.get(id).and_then(Shape::as_text) else {
            return;
        };
        let mut state = TextEditState::new(id, 0, is_new, now_ms);
        state.set_cursor(caret, &text.content);
        let editing = Shape::Text(text.with_editing(true));
        self.scene.replace(editing);
        self.selection.select(id);
        self.clicks.reset();
        self.text_edit = Some(state);
        log::debug!("editing text {id}");
    }

    /// Close the text editor.
    ///
    /// Text that is empty after trimming is removed; a shape created by this
    /// edit then leaves no trace in the history. Anything else is committed
    /// once, and only if it differs from the last snapshot.
    pub fn finish_text_edit(&mut self) {
        let Some(state) = self.text_edit.take() else {
            return;
        };
        let Some(text) = self.scene.get(state.shape_id).and_then(Shape::as_text) else {
            return;
        };

        if text.content.trim().is_empty() {
            self.scene.remove(state.shape_id);
            self.selection.retain_existing(&self.scene);
            if state.is_new {
                log::debug!("discarded empty new text");
            } else {
                log::debug!("removed text emptied while editing");
                self.commit();
            }
            return;
        }

        let finished = Shape::Text(text.with_editing(false));
        let changed = self.history.current().get(state.shape_id) != Some(&finished);
        self.scene.replace(finished);
        if changed {
            log::debug!("committed text {}", state.shape_id);
            self.commit();
        }
    }

    // --- Keyboard ---

    /// Handle a key press. Returns true when the key was consumed.
    pub fn key_down(&mut self, event: KeyEvent) -> bool {
        if let Some(handled) = self.text_key(&event) {
            return handled;
        }
        let Some(command) = Command::from_key(&event) else {
            return false;
        };
        match command {
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::SelectAll => self.select_all(),
            Command::DeleteSelection => {
                self.delete_selected();
            }
            Command::ResetZoom => self.reset_zoom(),
            Command::Cancel => self.escape(),
        }
        true
    }

    /// Route a key to the text editor. `None` lets the key fall through to
    /// the shortcuts.
    fn text_key(&mut self, event: &KeyEvent) -> Option<bool> {
        let state = self.text_edit.as_mut()?;
        let text = self.scene.get(state.shape_id)?.as_text()?;
        match state.handle_key(event, &text.content, self.config.tab_width) {
            TextEditResult::Handled => Some(true),
            TextEditResult::Changed(content) => {
                let updated = Shape::Text(text.with_content(content));
                self.scene.replace(updated);
                Some(true)
            }
            TextEditResult::ExitEdit => {
                self.escape();
                Some(true)
            }
            TextEditResult::NotHandled => None,
        }
    }

    /// Finish any text edit, cancel gestures, clear the selection and return
    /// to the select tool.
    pub fn escape(&mut self) {
        self.finish_text_edit();
        self.cancel_gesture();
        self.selection.clear();
        self.tool = ToolKind::Select;
    }

    // --- Commands ---

    pub fn undo(&mut self) {
        self.finish_text_edit();
        self.cancel_gesture();
        if let Some(scene) = self.history.undo() {
            self.scene = scene.clone();
            self.selection.retain_existing(&self.scene);
            log::debug!("undo to snapshot {}", self.history.index());
        }
    }

    pub fn redo(&mut self) {
        self.finish_text_edit();
        self.cancel_gesture();
        if let Some(scene) = self.history.redo() {
            self.scene = scene.clone();
            self.selection.retain_existing(&self.scene);
            log::debug!("redo to snapshot {}", self.history.index());
        }
    }

    pub fn select_all(&mut self) {
        self.finish_text_edit();
        self.selection.select_all(&self.scene);
    }

    /// Delete the selected shapes as one commit. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        self.finish_text_edit();
        self.cancel_gesture();
        let ids: Vec<ShapeId> = self.selection.ids().collect();
        let removed = self.scene.remove_all(&ids);
        self.selection.clear();
        if removed > 0 {
            log::debug!("deleted {removed} shapes");
            self.commit();
        }
        removed
    }

    pub fn reset_zoom(&mut self) {
        self.camera.reset_zoom();
    }

    // --- Import / export ---

    /// Replace the scene with a persisted document. The live scene is left
    /// alone when parsing fails. Returns the number of imported shapes.
    pub fn import_json(&mut self, json: &str, mode: ImportMode) -> Result<usize, ImportError> {
        let imported = format::parse_scene(json, mode)?;
        self.finish_text_edit();
        self.cancel_gesture();
        self.scene = imported.scene;
        self.selection.retain_existing(&self.scene);
        self.commit();
        Ok(self.scene.len())
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        format::scene_to_json(&self.scene)
    }

    /// Add parsed SVG elements fitted to the visible canvas, then select them.
    pub fn import_svg(&mut self, elements: &[SvgElement]) -> usize {
        self.finish_text_edit();
        self.cancel_gesture();
        let visible = self.camera.visible_canvas_rect(self.viewport);
        let shapes = svg_import::import_elements(elements, visible, self.measure.as_ref());
        if shapes.is_empty() {
            return 0;
        }
        let ids: Vec<ShapeId> = shapes.iter().map(Shape::id).collect();
        for shape in shapes {
            self.scene.add(shape);
        }
        self.selection.set(ids.iter().copied());
        self.commit();
        log::info!("imported {} shapes from svg", ids.len());
        ids.len()
    }
}
