//! Arrow shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::{normalize_or, point_to_segment_dist};
use crate::measure::TextMeasure;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An arrow shape (line with arrowhead at `end`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point (where the arrowhead points).
    pub end: Point,
    /// Size of the arrowhead.
    pub head_size: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Arrow {
    pub const DEFAULT_HEAD_SIZE: f64 = 15.0;

    /// Create a new arrow.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            head_size: Self::DEFAULT_HEAD_SIZE,
            style: ShapeStyle::default(),
        }
    }

    pub(crate) fn reconstruct(
        id: ShapeId,
        start: Point,
        end: Point,
        head_size: f64,
        style: ShapeStyle,
    ) -> Self {
        Self {
            id,
            start,
            end,
            head_size,
            style,
        }
    }

    /// Get the direction vector (normalized). Zero-length arrows point right.
    pub fn direction(&self) -> Vec2 {
        normalize_or(self.end - self.start, Vec2::new(1.0, 0.0))
    }

    /// Get the length of the arrow shaft.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// The two barb endpoints of the arrowhead, left then right.
    pub fn head_points(&self) -> (Point, Point) {
        let dir = self.direction();
        let perp = Vec2::new(-dir.y, dir.x);
        let back = self.end - dir * self.head_size;
        let half = self.head_size * 0.5;
        (back + perp * half, back - perp * half)
    }
}

impl ShapeTrait for Arrow {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        let (left, right) = self.head_points();
        Rect::from_points(self.start, self.end)
            .union_pt(left)
            .union_pt(right)
    }

    fn hit_test(&self, point: Point, tolerance: f64, _measure: &dyn TextMeasure) -> bool {
        point_to_segment_dist(point, self.start, self.end) <= tolerance
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn translated(&self, delta: Vec2) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
            ..self.clone()
        }
    }

    fn with_style(&self, style: ShapeStyle) -> Self {
        Self {
            style,
            ..self.clone()
        }
    }
}
