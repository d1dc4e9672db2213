//! Circle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::measure::TextMeasure;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle given by center and radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    pub center: Point,
    pub radius: f64,
    pub style: ShapeStyle,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius: radius.max(0.0),
            style: ShapeStyle::default(),
        }
    }

    pub(crate) fn reconstruct(id: ShapeId, center: Point, radius: f64, style: ShapeStyle) -> Self {
        Self {
            id,
            center,
            radius: radius.max(0.0),
            style,
        }
    }

    /// Create a circle whose diameter is the drag segment `p1`→`p2`.
    pub fn from_diameter(p1: Point, p2: Point) -> Self {
        Self::new(p1.midpoint(p2), p1.distance(p2) / 2.0)
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    fn hit_test(&self, point: Point, _tolerance: f64, _measure: &dyn TextMeasure) -> bool {
        point.distance(self.center) <= self.radius
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn translated(&self, delta: Vec2) -> Self {
        Self {
            center: self.center + delta,
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
    fn test_from_diameter() {
        let circle = Circle::from_diameter(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert_eq!(circle.center, Point::new(5.0, 0.0));
        assert!((circle.radius - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let circle = Circle::new(Point::new(0.0, 0.0), 10.0);
        let m = ApproximateMeasure;
        assert!(circle.hit_test(Point::new(10.0, 0.0), 0.0, &m));
        assert!(circle.hit_test(Point::new(6.0, 6.0), 0.0, &m));
        assert!(!circle.hit_test(Point::new(8.0, 8.0), 0.0, &m));
    }
}
