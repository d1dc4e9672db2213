//! Turning parsed SVG elements into shapes.
//!
//! Markup parsing happens elsewhere; this module receives one [`SvgElement`]
//! per `path`, `rect`, `circle`, `ellipse`, `line`, `polygon` or `polyline`
//! with its `translate`/`rotate` transforms already split out. The imported
//! group is then scaled uniformly and centered to fill 80% of the visible
//! canvas.

use crate::geometry::union_all;
use crate::measure::TextMeasure;
use crate::shapes::{
    Circle, Line, Pencil, Rectangle, SerializableColor, Shape, ShapeStyle, ShapeTrait,
};
use kurbo::{Affine, BezPath, PathEl, Point, Rect, Shape as _, Vec2};
use serde::{Deserialize, Serialize};

/// Fraction of the visible canvas an imported group may cover.
pub const FIT_FRACTION: f64 = 0.8;

/// Tolerance used when flattening curves into pencil points.
const FLATTEN_TOLERANCE: f64 = 0.5;

/// A transform from an element's `transform` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SvgTransform {
    Translate { x: f64, y: f64 },
    /// Degrees, around `(cx, cy)`.
    Rotate { angle: f64, cx: f64, cy: f64 },
}

impl SvgTransform {
    fn affine(&self) -> Affine {
        match *self {
            SvgTransform::Translate { x, y } => Affine::translate((x, y)),
            SvgTransform::Rotate { angle, cx, cy } => {
                Affine::rotate_about(angle.to_radians(), Point::new(cx, cy))
            }
        }
    }

    /// Parse a `transform` attribute, keeping only `translate` and `rotate`.
    pub fn parse_list(attr: &str) -> Vec<SvgTransform> {
        let mut out = Vec::new();
        for item in attr.split(')') {
            let Some((name, args)) = item.split_once('(') else {
                continue;
            };
            let nums = parse_numbers(args);
            match (name.trim(), nums.as_slice()) {
                ("translate", [x]) => out.push(SvgTransform::Translate { x: *x, y: 0.0 }),
                ("translate", [x, y, ..]) => out.push(SvgTransform::Translate { x: *x, y: *y }),
                ("rotate", [angle]) => out.push(SvgTransform::Rotate {
                    angle: *angle,
                    cx: 0.0,
                    cy: 0.0,
                }),
                ("rotate", [angle, cx, cy, ..]) => out.push(SvgTransform::Rotate {
                    angle: *angle,
                    cx: *cx,
                    cy: *cy,
                }),
                (other, _) => log::debug!("ignoring svg transform `{other}`"),
            }
        }
        out
    }
}

/// Geometry of a supported SVG element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SvgElementKind {
    Path { d: String },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Polygon { points: Vec<Point> },
    Polyline { points: Vec<Point> },
}

/// One element produced by the markup parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgElement {
    pub kind: SvgElementKind,
    #[serde(default)]
    pub transforms: Vec<SvgTransform>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
}

impl SvgElement {
    pub fn new(kind: SvgElementKind) -> Self {
        Self {
            kind,
            transforms: Vec::new(),
            stroke: None,
            fill: None,
            stroke_width: None,
        }
    }

    pub fn with_transforms(self, transforms: Vec<SvgTransform>) -> Self {
        Self { transforms, ..self }
    }

    fn affine(&self) -> Affine {
        self.transforms
            .iter()
            .fold(Affine::IDENTITY, |acc, t| acc * t.affine())
    }

    fn style(&self) -> ShapeStyle {
        let stroke_color = self
            .stroke
            .as_deref()
            .and_then(SerializableColor::from_css)
            .unwrap_or_else(SerializableColor::black);
        let fill_color = self
            .fill
            .as_deref()
            .and_then(SerializableColor::from_css)
            .filter(|c| !c.is_transparent());
        ShapeStyle {
            stroke_color,
            stroke_width: self.stroke_width.filter(|w| w.is_finite() && *w >= 0.0).unwrap_or(1.0),
            fill_color,
            ..ShapeStyle::default()
        }
    }

    /// Shapes for this element. A path with several subpaths yields one
    /// pencil stroke per subpath.
    pub fn to_shapes(&self) -> Vec<Shape> {
        let affine = self.affine();
        let has_rotation = self
            .transforms
            .iter()
            .any(|t| matches!(t, SvgTransform::Rotate { angle, .. } if *angle != 0.0));
        let style = self.style();

        let shapes = match &self.kind {
            SvgElementKind::Path { d } => match BezPath::from_svg(d) {
                Ok(path) => flatten_to_polylines(&path)
                    .into_iter()
                    .map(|pts| pencil(transform_all(affine, &pts)))
                    .collect(),
                Err(err) => {
                    log::warn!("skipping svg path with bad data: {err}");
                    Vec::new()
                }
            },
            SvgElementKind::Rect {
                x,
                y,
                width,
                height,
            } => {
                let rect = Rect::new(*x, *y, x + width.max(0.0), y + height.max(0.0));
                if has_rotation {
                    let corners = [
                        Point::new(rect.x0, rect.y0),
                        Point::new(rect.x1, rect.y0),
                        Point::new(rect.x1, rect.y1),
                        Point::new(rect.x0, rect.y1),
                        Point::new(rect.x0, rect.y0),
                    ];
                    vec![pencil(transform_all(affine, &corners))]
                } else {
                    let origin = affine * rect.origin();
                    vec![Shape::Rectangle(Rectangle::new(origin, rect.width(), rect.height()))]
                }
            }
            SvgElementKind::Circle { cx, cy, r } => {
                vec![Shape::Circle(Circle::new(affine * Point::new(*cx, *cy), *r))]
            }
            SvgElementKind::Ellipse { cx, cy, rx, ry } => {
                let center = Point::new(*cx, *cy);
                if (rx - ry).abs() < f64::EPSILON {
                    vec![Shape::Circle(Circle::new(affine * center, *rx))]
                } else {
                    let ellipse = kurbo::Ellipse::new(center, Vec2::new(*rx, *ry), 0.0);
                    flatten_to_polylines(&ellipse.to_path(FLATTEN_TOLERANCE))
                        .into_iter()
                        .map(|pts| pencil(transform_all(affine, &pts)))
                        .collect()
                }
            }
            SvgElementKind::Line { x1, y1, x2, y2 } => vec![Shape::Line(Line::new(
                affine * Point::new(*x1, *y1),
                affine * Point::new(*x2, *y2),
            ))],
            SvgElementKind::Polygon { points } => {
                let mut closed = points.clone();
                if let Some(first) = points.first() {
                    closed.push(*first);
                }
                vec![pencil(transform_all(affine, &closed))]
            }
            SvgElementKind::Polyline { points } => vec![pencil(transform_all(affine, points))],
        };

        shapes
            .into_iter()
            .filter(Shape::is_drawable)
            .map(|s| s.with_style(style.reseeded()))
            .collect()
    }
}

fn pencil(points: Vec<Point>) -> Shape {
    Shape::Pencil(Pencil::from_points(points))
}

fn transform_all(affine: Affine, points: &[Point]) -> Vec<Point> {
    points.iter().map(|p| affine * *p).collect()
}

/// Split a path into flattened polylines, one per subpath.
fn flatten_to_polylines(path: &BezPath) -> Vec<Vec<Point>> {
    let mut polylines: Vec<Vec<Point>> = Vec::new();
    kurbo::flatten(path, FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => polylines.push(vec![p]),
        PathEl::LineTo(p) => match polylines.last_mut() {
            Some(current) => current.push(p),
            None => polylines.push(vec![p]),
        },
        PathEl::ClosePath => {
            if let Some(current) = polylines.last_mut() {
                if let Some(first) = current.first().copied() {
                    current.push(first);
                }
            }
        }
        // flatten only emits moves, lines and closes
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    polylines
}

/// Split a `points` attribute into coordinate pairs.
pub fn parse_points(attr: &str) -> Vec<Point> {
    parse_numbers(attr)
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}

fn parse_numbers(s: &str) -> Vec<f64> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse().ok())
        .collect()
}

/// Uniform scale and offset that fits `group` into `FIT_FRACTION` of
/// `visible`, centered.
pub fn fit_transform(group: Rect, visible: Rect) -> (f64, Affine) {
    let avail_w = visible.width() * FIT_FRACTION;
    let avail_h = visible.height() * FIT_FRACTION;
    let scale = match (group.width() > f64::EPSILON, group.height() > f64::EPSILON) {
        (true, true) => (avail_w / group.width()).min(avail_h / group.height()),
        (true, false) => avail_w / group.width(),
        (false, true) => avail_h / group.height(),
        (false, false) => 1.0,
    };
    let affine = Affine::translate(visible.center().to_vec2())
        * Affine::scale(scale)
        * Affine::translate(-group.center().to_vec2());
    (scale, affine)
}

/// Apply a uniform scale-and-translate to a shape.
fn place(shape: &Shape, scale: f64, affine: Affine) -> Shape {
    match shape {
        Shape::Rectangle(r) => {
            let mut r = r.clone();
            r.position = affine * r.position;
            r.width *= scale;
            r.height *= scale;
            Shape::Rectangle(r)
        }
        Shape::Circle(c) => {
            let mut c = c.clone();
            c.center = affine * c.center;
            c.radius *= scale;
            Shape::Circle(c)
        }
        Shape::Line(l) => {
            let mut l = l.clone();
            l.start = affine * l.start;
            l.end = affine * l.end;
            Shape::Line(l)
        }
        Shape::Arrow(a) => {
            let mut a = a.clone();
            a.start = affine * a.start;
            a.end = affine * a.end;
            Shape::Arrow(a)
        }
        Shape::Pencil(p) => {
            let mut p = p.clone();
            p.points = transform_all(affine, &p.points);
            Shape::Pencil(p)
        }
        Shape::Text(t) => Shape::Text(
            t.with_position(affine * t.position)
                .with_font_size(t.font_size * scale),
        ),
    }
}

/// Convert elements to shapes and fit the group into the visible canvas.
pub fn import_elements(
    elements: &[SvgElement],
    visible: Rect,
    measure: &dyn TextMeasure,
) -> Vec<Shape> {
    let shapes: Vec<Shape> = elements.iter().flat_map(SvgElement::to_shapes).collect();
    let Some(group) = union_all(shapes.iter().map(|s| s.bounds(measure))) else {
        return shapes;
    };
    let (scale, affine) = fit_transform(group, visible);
    log::debug!("fitting {} imported svg shapes at scale {scale:.3}", shapes.len());
    shapes.iter().map(|s| place(s, scale, affine)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rect_contains_rect;
    use crate::measure::ApproximateMeasure;

    #[test]
    fn test_parse_transform_list() {
        let list = SvgTransform::parse_list("translate(10, 20) scale(2) rotate(45 5 5)");
        assert_eq!(
            list,
            vec![
                SvgTransform::Translate { x: 10.0, y: 20.0 },
                SvgTransform::Rotate {
                    angle: 45.0,
                    cx: 5.0,
                    cy: 5.0
                },
            ]
        );
        assert_eq!(parse_points("0,0 10,0 10 10"), vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0)
        ]);
    }

    #[test]
    fn test_translated_rect_stays_rectangle() {
        let el = SvgElement::new(SvgElementKind::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 5.0,
        })
        .with_transforms(vec![SvgTransform::Translate { x: 3.0, y: 4.0 }]);
        match el.to_shapes().as_slice() {
            [Shape::Rectangle(r)] => assert_eq!(r.as_rect(), Rect::new(3.0, 4.0, 13.0, 9.0)),
            other => panic!("expected one rectangle, got {other:?}"),
        }
    }

    #[test]
    fn test_rotated_rect_becomes_closed_stroke() {
        let el = SvgElement::new(SvgElementKind::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        })
        .with_transforms(vec![SvgTransform::Rotate {
            angle: 45.0,
            cx: 0.0,
            cy: 0.0,
        }]);
        match el.to_shapes().as_slice() {
            [Shape::Pencil(p)] => {
                assert_eq!(p.len(), 5);
                assert_eq!(p.points.first(), p.points.last());
            }
            other => panic!("expected one pencil, got {other:?}"),
        }
    }

    #[test]
    fn test_path_subpaths_and_bad_data() {
        let el = SvgElement::new(SvgElementKind::Path {
            d: "M0 0 L10 0 L10 10 Z M20 20 L30 30".to_string(),
        });
        assert_eq!(el.to_shapes().len(), 2);

        let bad = SvgElement::new(SvgElementKind::Path {
            d: "M0 0 Q".to_string(),
        });
        assert!(bad.to_shapes().is_empty());
    }

    #[test]
    fn test_ellipse_variants() {
        let round = SvgElement::new(SvgElementKind::Ellipse {
            cx: 0.0,
            cy: 0.0,
            rx: 5.0,
            ry: 5.0,
        });
        assert!(matches!(round.to_shapes().as_slice(), [Shape::Circle(_)]));

        let oval = SvgElement::new(SvgElementKind::Ellipse {
            cx: 0.0,
            cy: 0.0,
            rx: 10.0,
            ry: 5.0,
        });
        assert!(matches!(oval.to_shapes().as_slice(), [Shape::Pencil(_)]));
    }

    #[test]
    fn test_group_fits_visible_canvas() {
        let elements = vec![
            SvgElement::new(SvgElementKind::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 1000.0,
                y2: 0.0,
            }),
            SvgElement::new(SvgElementKind::Polygon {
                points: vec![Point::new(0.0, 0.0), Point::new(500.0, 500.0), Point::new(0.0, 500.0)],
            }),
        ];
        let visible = Rect::new(-100.0, -100.0, 300.0, 200.0);
        let m = ApproximateMeasure;
        let shapes = import_elements(&elements, visible, &m);
        assert_eq!(shapes.len(), 2);

        let group = union_all(shapes.iter().map(|s| s.bounds(&m))).unwrap();
        assert!(rect_contains_rect(visible, group));
        // Limited by width: 80% of 400.
        assert!((group.width() - 320.0).abs() < 1e-6);
        assert!((group.center().x - visible.center().x).abs() < 1e-6);
        assert!((group.center().y - visible.center().y).abs() < 1e-6);
    }

    #[test]
    fn test_style_from_attributes() {
        let mut el = SvgElement::new(SvgElementKind::Circle {
            cx: 0.0,
            cy: 0.0,
            r: 3.0,
        });
        el.stroke = Some("#ff0000".to_string());
        el.fill = Some("none".to_string());
        el.stroke_width = Some(3.0);
        let shapes = el.to_shapes();
        let style = shapes[0].style();
        assert_eq!(style.stroke_color, SerializableColor::new(255, 0, 0, 255));
        assert!(style.fill_color.is_none());
        assert!((style.stroke_width - 3.0).abs() < f64::EPSILON);
    }
}
