//! Ordered shape list.

use crate::camera::Camera;
use crate::geometry::{rect_contains_rect, union_all};
use crate::measure::TextMeasure;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// The current drawing.
///
/// Order is paint order: later shapes draw on top, and hit testing walks the
/// list back to front so the topmost shape wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scene {
    shapes: Vec<Shape>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    /// Append a shape on top of everything else.
    pub fn add(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Swap in a new value for the shape with the same id, keeping its slot.
    /// Returns false if no such shape exists.
    pub fn replace(&mut self, shape: Shape) -> bool {
        let id = shape.id();
        match self.shapes.iter_mut().find(|s| s.id() == id) {
            Some(slot) => {
                *slot = shape;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        Some(self.shapes.remove(index))
    }

    /// Remove every shape whose id is in `ids`. Returns how many were removed.
    pub fn remove_all(&mut self, ids: &[ShapeId]) -> usize {
        let before = self.shapes.len();
        self.shapes.retain(|s| !ids.contains(&s.id()));
        before - self.shapes.len()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    /// Shapes back to front.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn ids(&self) -> Vec<ShapeId> {
        self.shapes.iter().map(Shape::id).collect()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Topmost shape under a canvas-space point.
    pub fn shape_at_canvas_point(
        &self,
        point: Point,
        tolerance: f64,
        measure: &dyn TextMeasure,
    ) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.hit_test(point, tolerance, measure))
            .map(Shape::id)
    }

    /// Topmost shape under a screen-space point.
    ///
    /// The point is converted to canvas space once; `tolerance` is already in
    /// canvas units.
    pub fn find_shape_at_point(
        &self,
        screen_point: Point,
        camera: &Camera,
        tolerance: f64,
        measure: &dyn TextMeasure,
    ) -> Option<ShapeId> {
        self.shape_at_canvas_point(camera.screen_to_canvas(screen_point), tolerance, measure)
    }

    /// Shapes whose padded bounding box lies entirely inside `rect` (canvas
    /// space), in paint order.
    pub fn shapes_within(
        &self,
        rect: Rect,
        padding: f64,
        measure: &dyn TextMeasure,
    ) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| rect_contains_rect(rect, s.padded_bounds(padding, measure)))
            .map(Shape::id)
            .collect()
    }

    /// Bounding box of every shape, `None` for an empty scene.
    pub fn bounds(&self, measure: &dyn TextMeasure) -> Option<Rect> {
        union_all(self.shapes.iter().map(|s| s.bounds(measure)))
    }
}

impl FromIterator<Shape> for Scene {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        Self::from_shapes(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::ApproximateMeasure;
    use crate::shapes::{Circle, Line, Rectangle};
    use kurbo::Vec2;

    #[test]
    fn test_topmost_wins() {
        let bottom = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let top = Rectangle::new(Point::new(50.0, 50.0), 100.0, 100.0);
        let top_id = top.id;
        let bottom_id = bottom.id;
        let scene = Scene::from_shapes(vec![Shape::Rectangle(bottom), Shape::Rectangle(top)]);
        let camera = Camera::default();
        let m = ApproximateMeasure;

        assert_eq!(
            scene.find_shape_at_point(Point::new(75.0, 75.0), &camera, 5.0, &m),
            Some(top_id)
        );
        assert_eq!(
            scene.find_shape_at_point(Point::new(10.0, 10.0), &camera, 5.0, &m),
            Some(bottom_id)
        );
        assert_eq!(
            scene.find_shape_at_point(Point::new(500.0, 500.0), &camera, 5.0, &m),
            None
        );
    }

    #[test]
    fn test_find_converts_screen_point() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let id = line.id;
        let scene = Scene::from_shapes(vec![Shape::Line(line)]);
        let mut camera = Camera::default();
        camera.scale = 2.0;
        camera.offset = Vec2::new(10.0, 10.0);
        let m = ApproximateMeasure;

        // Screen (110, 16) is canvas (50, 3).
        assert_eq!(
            scene.find_shape_at_point(Point::new(110.0, 16.0), &camera, 5.0, &m),
            Some(id)
        );
        // Screen (110, 24) is canvas (50, 7).
        assert_eq!(
            scene.find_shape_at_point(Point::new(110.0, 24.0), &camera, 5.0, &m),
            None
        );
    }

    #[test]
    fn test_replace_keeps_order() {
        let a = Circle::new(Point::new(0.0, 0.0), 5.0);
        let b = Circle::new(Point::new(20.0, 0.0), 5.0);
        let a_id = a.id;
        let mut scene = Scene::from_shapes(vec![Shape::Circle(a.clone()), Shape::Circle(b)]);

        let moved = Shape::Circle(a).translated(Vec2::new(1.0, 1.0));
        assert!(scene.replace(moved));
        assert_eq!(scene.index_of(a_id), Some(0));

        let stranger = Shape::Circle(Circle::new(Point::ZERO, 1.0));
        assert!(!scene.replace(stranger));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_shapes_within_full_containment() {
        let inside = Rectangle::new(Point::new(20.0, 20.0), 10.0, 10.0);
        let straddling = Rectangle::new(Point::new(80.0, 80.0), 40.0, 40.0);
        let inside_id = inside.id;
        let scene = Scene::from_shapes(vec![
            Shape::Rectangle(inside),
            Shape::Rectangle(straddling),
        ]);
        let ids = scene.shapes_within(Rect::new(0.0, 0.0, 100.0, 100.0), 5.0, &ApproximateMeasure);
        assert_eq!(ids, vec![inside_id]);
    }

    #[test]
    fn test_remove_all() {
        let a = Shape::Circle(Circle::new(Point::ZERO, 1.0));
        let b = Shape::Circle(Circle::new(Point::ZERO, 2.0));
        let c = Shape::Circle(Circle::new(Point::ZERO, 3.0));
        let keep = b.id();
        let mut scene = Scene::from_shapes(vec![a.clone(), b, c.clone()]);
        assert_eq!(scene.remove_all(&[a.id(), c.id()]), 2);
        assert_eq!(scene.ids(), vec![keep]);
    }
}
