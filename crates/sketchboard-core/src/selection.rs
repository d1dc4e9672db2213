//! Selection set, marquee selection and the text resize handles.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::measure::TextMeasure;
use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId, ShapeTrait, Text};
use kurbo::{Point, Rect, Vec2};
use std::collections::HashSet;

/// Set of selected shape ids plus an optional in-progress marquee.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: HashSet<ShapeId>,
    marquee: Option<Marquee>,
}

/// A drag rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub start: Point,
    pub current: Point,
}

impl Marquee {
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }

    /// True when the drag exceeds `threshold` on at least one axis.
    pub fn is_drag(&self, threshold: f64) -> bool {
        let delta = self.current - self.start;
        delta.x.abs() > threshold || delta.y.abs() > threshold
    }
}

/// Result of releasing a marquee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueeOutcome {
    /// The marquee replaced the selection with this many shapes.
    Selected(usize),
    /// The drag was too small; treated as a click on empty canvas.
    Cleared,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `{id}`.
    pub fn select(&mut self, id: ShapeId) {
        self.ids.clear();
        self.ids.insert(id);
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: ShapeId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn select_all(&mut self, scene: &Scene) {
        self.ids = scene.iter().map(Shape::id).collect();
    }

    pub fn set(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.ids = ids.into_iter().collect();
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.ids.iter().copied()
    }

    /// The selected id when exactly one shape is selected.
    pub fn sole(&self) -> Option<ShapeId> {
        if self.ids.len() == 1 {
            self.ids.iter().next().copied()
        } else {
            None
        }
    }

    /// Drop ids that no longer exist in `scene`.
    pub fn retain_existing(&mut self, scene: &Scene) {
        self.ids.retain(|id| scene.contains(*id));
    }

    pub fn start_marquee(&mut self, screen_point: Point) {
        self.marquee = Some(Marquee {
            start: screen_point,
            current: screen_point,
        });
    }

    pub fn update_marquee(&mut self, screen_point: Point) {
        if let Some(marquee) = self.marquee.as_mut() {
            marquee.current = screen_point;
        }
    }

    pub fn marquee(&self) -> Option<&Marquee> {
        self.marquee.as_ref()
    }

    pub fn cancel_marquee(&mut self) {
        self.marquee = None;
    }

    /// Finish the marquee drag.
    ///
    /// A real drag selects every shape whose padded bounding box lies fully
    /// inside the marquee (converted to canvas space). A drag below the
    /// threshold clears the selection. Returns `None` when no marquee was
    /// active.
    pub fn finish_marquee(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        config: &EditorConfig,
        measure: &dyn TextMeasure,
    ) -> Option<MarqueeOutcome> {
        let marquee = self.marquee.take()?;
        if !marquee.is_drag(config.marquee_threshold) {
            self.clear();
            return Some(MarqueeOutcome::Cleared);
        }

        let canvas_rect = camera.screen_rect_to_canvas(marquee.rect());
        let ids = scene.shapes_within(canvas_rect, config.bbox_padding, measure);
        let count = ids.len();
        self.set(ids);
        log::debug!("marquee selected {count} shapes");
        Some(MarqueeOutcome::Selected(count))
    }
}

/// Corner positions of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn position(&self, rect: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(rect.x0, rect.y0),
            Corner::TopRight => Point::new(rect.x1, rect.y0),
            Corner::BottomLeft => Point::new(rect.x0, rect.y1),
            Corner::BottomRight => Point::new(rect.x1, rect.y1),
        }
    }

    pub fn opposite(&self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Sign of the corner on each axis: -1 for the min side, +1 for the max side.
    fn signs(&self) -> Vec2 {
        match self {
            Corner::TopLeft => Vec2::new(-1.0, -1.0),
            Corner::TopRight => Vec2::new(1.0, -1.0),
            Corner::BottomLeft => Vec2::new(-1.0, 1.0),
            Corner::BottomRight => Vec2::new(1.0, 1.0),
        }
    }
}

/// Corner handles of a box, in canvas space.
pub fn corner_handles(bounds: Rect) -> [(Corner, Point); 4] {
    Corner::ALL.map(|corner| (corner, corner.position(bounds)))
}

/// Find which corner handle (if any) is within `tolerance` of `point`.
pub fn hit_test_handles(bounds: Rect, point: Point, tolerance: f64) -> Option<Corner> {
    corner_handles(bounds)
        .into_iter()
        .find(|(_, pos)| pos.distance(point) <= tolerance)
        .map(|(corner, _)| corner)
}

/// State of an active text resize drag.
#[derive(Debug, Clone)]
pub struct ManipulationState {
    pub shape_id: ShapeId,
    pub corner: Corner,
    /// Drag start in canvas space.
    pub start_point: Point,
    pub current_point: Point,
    /// Shape as it was when the drag started.
    pub original: Text,
    /// Padded bounding box at drag start.
    pub original_bounds: Rect,
}

impl ManipulationState {
    pub fn new(
        original: Text,
        corner: Corner,
        start_point: Point,
        padding: f64,
        measure: &dyn TextMeasure,
    ) -> Self {
        let original_bounds = original.bounds(measure).inflate(padding, padding);
        Self {
            shape_id: original.id(),
            corner,
            start_point,
            current_point: start_point,
            original,
            original_bounds,
        }
    }

    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Scale factor from the drag projected onto the handle's outward diagonal.
    ///
    /// Dragging away from the opposite corner grows the text, dragging toward
    /// it shrinks it.
    pub fn scale_factor(&self, config: &EditorConfig) -> f64 {
        let handle = self.corner.position(self.original_bounds);
        let anchor = self.corner.opposite().position(self.original_bounds);
        let diagonal = handle - anchor;
        let diag_len = diagonal.hypot();
        if diag_len < f64::EPSILON {
            return 1.0;
        }
        let proj = self.delta().dot(diagonal / diag_len);
        ((diag_len + proj) / diag_len).clamp(config.min_resize_factor, config.max_resize_factor)
    }

    /// The resized text. The corner opposite the dragged handle stays put.
    pub fn resized(&self, config: &EditorConfig, measure: &dyn TextMeasure) -> Text {
        let factor = self.scale_factor(config);
        let font_size = (self.original.font_size * factor)
            .clamp(config.min_font_size, config.max_font_size)
            .round();
        let resized = self.original.with_font_size(font_size);

        let padding = config.bbox_padding;
        let anchor = self.corner.opposite().position(self.original_bounds);
        let size = resized.bounds(measure).size();
        let signs = self.corner.signs();
        // On each axis the anchor is the far side from the handle.
        let x = if signs.x < 0.0 {
            anchor.x - padding - size.width
        } else {
            anchor.x + padding
        };
        let y = if signs.y < 0.0 {
            anchor.y - padding - size.height
        } else {
            anchor.y + padding
        };
        resized.with_position(Point::new(x, y))
    }
}

/// State for moving the selected shapes at once.
#[derive(Debug, Clone)]
pub struct MultiMoveState {
    /// Drag start in canvas space.
    pub start_point: Point,
    pub current_point: Point,
    /// Shapes as they were when the drag started.
    pub original_shapes: Vec<Shape>,
}

impl MultiMoveState {
    pub fn new(start_point: Point, original_shapes: Vec<Shape>) -> Self {
        Self {
            start_point,
            current_point: start_point,
            original_shapes,
        }
    }

    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    pub fn has_moved(&self) -> bool {
        self.delta().hypot2() > 0.0
    }

    /// Original shapes translated by the current delta.
    pub fn moved_shapes(&self) -> impl Iterator<Item = Shape> + '_ {
        let delta = self.delta();
        self.original_shapes.iter().map(move |s| s.translated(delta))
    }

    pub fn shape_ids(&self) -> Vec<ShapeId> {
        self.original_shapes.iter().map(Shape::id).collect()
    }
}
