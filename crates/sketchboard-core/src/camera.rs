//! Camera module for pan/zoom transforms.

use crate::config::EditorConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Camera maps canvas coordinates to screen pixels.
///
/// `screen = canvas * scale + offset`. The camera is transient UI state and is
/// never stored in the history.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Translation in screen pixels, applied after scaling.
    pub offset: Vec2,
    /// Current zoom scale (1.0 = 100%).
    pub scale: f64,
    /// Minimum allowed scale.
    pub min_scale: f64,
    /// Maximum allowed scale.
    pub max_scale: f64,
    /// Last screen point seen while panning.
    pan_anchor: Option<Point>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl Camera {
    /// Create a camera with the zoom bounds from `config`.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            pan_anchor: None,
        }
    }

    /// Canvas to screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Screen to canvas transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Convert a screen-space rectangle to canvas space.
    pub fn screen_rect_to_canvas(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.screen_to_canvas(Point::new(rect.x0, rect.y0)),
            self.screen_to_canvas(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Canvas area currently visible in a viewport of the given size.
    pub fn visible_canvas_rect(&self, viewport: Size) -> Rect {
        self.screen_rect_to_canvas(Rect::from_origin_size(Point::ZERO, viewport))
    }

    /// Zoom by `factor`, keeping the canvas point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let new_scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }

        let ratio = new_scale / self.scale;
        let anchor = anchor.to_vec2();
        self.offset = anchor - (anchor - self.offset) * ratio;
        self.scale = new_scale;
    }

    /// Begin a pan gesture at a screen point.
    pub fn start_pan(&mut self, screen_point: Point) {
        self.pan_anchor = Some(screen_point);
    }

    /// Move the pan gesture to a new screen point.
    ///
    /// The offset moves by the delta since the previous call, so many small
    /// moves accumulate without drift.
    pub fn update_pan(&mut self, screen_point: Point) {
        if let Some(last) = self.pan_anchor {
            self.offset += screen_point - last;
            self.pan_anchor = Some(screen_point);
        }
    }

    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Reset to 100% with no offset.
    pub fn reset_zoom(&mut self) {
        self.offset = Vec2::ZERO;
        self.scale = 1.0;
    }
}
