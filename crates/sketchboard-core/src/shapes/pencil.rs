//! Freehand pencil stroke.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::{point_to_polyline_dist, points_bounds};
use crate::measure::TextMeasure;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke made of sampled points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pencil {
    pub(crate) id: ShapeId,
    pub points: Vec<Point>,
    pub style: ShapeStyle,
}

impl Pencil {
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: ShapeStyle::default(),
        }
    }

    pub(crate) fn reconstruct(id: ShapeId, points: Vec<Point>, style: ShapeStyle) -> Self {
        Self { id, points, style }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Open polyline through the sampled points.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((first, rest)) = self.points.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
        }
        path
    }
}

impl ShapeTrait for Pencil {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        points_bounds(&self.points).unwrap_or(Rect::ZERO)
    }

    fn hit_test(&self, point: Point, tolerance: f64, _measure: &dyn TextMeasure) -> bool {
        match self.points.as_slice() {
            [] => false,
            [only] => point.distance(*only) <= tolerance,
            points => point_to_polyline_dist(point, points) <= tolerance,
        }
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn translated(&self, delta: Vec2) -> Self {
        Self {
            points: self.points.iter().map(|p| *p + delta).collect(),
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
    fn test_bounds() {
        let pencil = Pencil::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(50.0, 100.0),
        ]);
        assert_eq!(
            pencil.bounds(&ApproximateMeasure),
            Rect::new(0.0, 0.0, 100.0, 100.0)
        );
    }

    #[test]
    fn test_hit_any_segment() {
        let pencil = Pencil::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]);
        let m = ApproximateMeasure;
        assert!(pencil.hit_test(Point::new(5.0, 2.0), 5.0, &m));
        assert!(pencil.hit_test(Point::new(14.0, 8.0), 5.0, &m));
        assert!(!pencil.hit_test(Point::new(30.0, 30.0), 5.0, &m));
    }

    #[test]
    fn test_single_point_and_empty() {
        let m = ApproximateMeasure;
        let dot = Pencil::from_points(vec![Point::new(10.0, 10.0)]);
        assert!(dot.hit_test(Point::new(13.0, 10.0), 5.0, &m));
        assert!(!dot.hit_test(Point::new(20.0, 10.0), 5.0, &m));

        let empty = Pencil::from_points(Vec::new());
        assert!(empty.is_empty());
        assert!(!empty.hit_test(Point::ZERO, 5.0, &m));
        assert_eq!(empty.bounds(&m), Rect::ZERO);
    }
}
