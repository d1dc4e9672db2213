//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::rect_contains_point;
use crate::measure::TextMeasure;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle. Negative sizes are clamped to zero.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: width.max(0.0),
            height: height.max(0.0),
            style: ShapeStyle::default(),
        }
    }

    /// Reconstruct a rectangle with a specific ID (for import).
    pub(crate) fn reconstruct(
        id: ShapeId,
        position: Point,
        width: f64,
        height: f64,
        style: ShapeStyle,
    ) -> Self {
        Self {
            id,
            position,
            width: width.max(0.0),
            height: height.max(0.0),
            style,
        }
    }

    /// Create a rectangle from two arbitrary drag corners.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();

        Self::new(Point::new(min_x, min_y), width, height)
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, _tolerance: f64, _measure: &dyn TextMeasure) -> bool {
        rect_contains_point(self.as_rect(), point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn translated(&self, delta: Vec2) -> Self {
        Self {
            position: self.position + delta,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::ApproximateMeasure;

    #[test]
    fn test_from_corners() {
        let rect = Rectangle::from_corners(Point::new(10.0, 10.0), Point::new(50.0, 30.0));
        assert_eq!(rect.position, Point::new(10.0, 10.0));
        assert!((rect.width - 40.0).abs() < f64::EPSILON);
        assert!((rect.height - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_corners_reversed_drag() {
        let forward = Rectangle::from_corners(Point::new(10.0, 10.0), Point::new(50.0, 30.0));
        let reversed = Rectangle::from_corners(Point::new(50.0, 30.0), Point::new(10.0, 10.0));
        assert_eq!(forward.as_rect(), reversed.as_rect());
    }

    #[test]
    fn test_hit_test_inclusive_edges() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let m = ApproximateMeasure;
        assert!(rect.hit_test(Point::new(50.0, 50.0), 0.0, &m));
        assert!(rect.hit_test(Point::new(100.0, 100.0), 0.0, &m));
        assert!(!rect.hit_test(Point::new(150.0, 50.0), 0.0, &m));
    }

    #[test]
    fn test_negative_size_clamped() {
        let rect = Rectangle::new(Point::ZERO, -5.0, 10.0);
        assert!(rect.width.abs() < f64::EPSILON);
    }
}
