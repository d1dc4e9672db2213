//! Geometric predicates shared by hit testing and selection.

use kurbo::{Point, Rect, Vec2};

/// Distance from a point to the finite segment `a`→`b`.
///
/// The point is projected onto the supporting line and the projection
/// parameter clamped to `[0, 1]`, so the foot always lies on the segment.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let foot = a + seg * t;
    (point - foot).hypot()
}

/// Minimum distance from a point to a polyline.
///
/// Returns infinity for fewer than two points.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Inclusive point-in-rectangle test.
///
/// `kurbo::Rect::contains` excludes the far edges; hit testing here treats
/// all four edges as inside.
pub fn rect_contains_point(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// True if `inner` lies entirely within `outer` (edges may touch).
pub fn rect_contains_rect(outer: Rect, inner: Rect) -> bool {
    let outer = outer.abs();
    let inner = inner.abs();
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// Bounding box of a point set, `None` when empty.
pub fn points_bounds(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p)),
    )
}

/// Union of several rectangles, `None` when the iterator is empty.
pub fn union_all(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|acc, r| acc.union(r))
}

/// Unit vector in the direction of `v`, or `fallback` for a zero vector.
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.hypot();
    if len < f64::EPSILON { fallback } else { v / len }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_distance_perpendicular() {
        let d = point_to_segment_dist(Point::new(5.0, 3.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_distance_clamps_to_endpoints() {
        let d = point_to_segment_dist(Point::new(13.0, 4.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
        let d = point_to_segment_dist(Point::new(-3.0, -4.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_segment() {
        let d = point_to_segment_dist(Point::new(3.0, 4.0), Point::ZERO, Point::ZERO);
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_polyline_distance() {
        let pts = [Point::ZERO, Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        let d = point_to_polyline_dist(Point::new(12.0, 5.0), &pts);
        assert!((d - 2.0).abs() < 1e-12);
        assert!(point_to_polyline_dist(Point::ZERO, &pts[..1]).is_infinite());
    }

    #[test]
    fn test_inclusive_rect_contains() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_contains_point(rect, Point::new(10.0, 10.0)));
        assert!(rect_contains_point(rect, Point::new(0.0, 5.0)));
        assert!(!rect_contains_point(rect, Point::new(10.01, 5.0)));
    }

    #[test]
    fn test_rect_containment() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(rect_contains_rect(outer, Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(rect_contains_rect(outer, outer));
        assert!(!rect_contains_rect(outer, Rect::new(90.0, 90.0, 110.0, 95.0)));
    }

    #[test]
    fn test_points_bounds() {
        assert!(points_bounds(&[]).is_none());
        let b = points_bounds(&[Point::new(3.0, -1.0), Point::new(-2.0, 4.0)]).unwrap();
        assert_eq!(b, Rect::new(-2.0, -1.0, 3.0, 4.0));
    }
}
