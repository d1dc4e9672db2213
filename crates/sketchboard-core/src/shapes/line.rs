//! Line shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::point_to_segment_dist;
use crate::measure::TextMeasure;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    pub start: Point,
    pub end: Point,
    pub style: ShapeStyle,
}

impl Line {
    /// Create a new line. Zero-length lines are allowed.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style: ShapeStyle::default(),
        }
    }

    pub(crate) fn reconstruct(id: ShapeId, start: Point, end: Point, style: ShapeStyle) -> Self {
        Self {
            id,
            start,
            end,
            style,
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        Rect::from_points(self.start, self.end)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::ApproximateMeasure;

    #[test]
    fn test_line_hit_within_tolerance() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let m = ApproximateMeasure;
        assert!(line.hit_test(Point::new(50.0, 4.0), 5.0, &m));
        assert!(line.hit_test(Point::new(50.0, 5.0), 5.0, &m));
        assert!(!line.hit_test(Point::new(50.0, 6.0), 5.0, &m));
        // Past the end, distance is measured to the endpoint.
        assert!(!line.hit_test(Point::new(104.0, 4.0), 5.0, &m));
    }

    #[test]
    fn test_zero_length_line() {
        let line = Line::new(Point::new(10.0, 10.0), Point::new(10.0, 10.0));
        let m = ApproximateMeasure;
        assert!(line.length().abs() < f64::EPSILON);
        assert!(line.hit_test(Point::new(13.0, 14.0), 5.0, &m));
        assert_eq!(line.bounds(&m), Rect::new(10.0, 10.0, 10.0, 10.0));
    }

    #[test]
    fn test_bounds_reversed() {
        let line = Line::new(Point::new(50.0, 60.0), Point::new(10.0, 20.0));
        assert_eq!(
            line.bounds(&ApproximateMeasure),
            Rect::new(10.0, 20.0, 50.0, 60.0)
        );
    }
}
