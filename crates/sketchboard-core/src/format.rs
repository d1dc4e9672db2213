//! Persisted scene format.
//!
//! ```json
//! { "version": "1", "objects": [ { "type": "rectangle", "x": 0, ... } ] }
//! ```
//!
//! Every descriptor carries the shape's geometry plus `stroke`, `fill`,
//! `strokeWidth`, `scaleX`, `scaleY` and `angle` (degrees). Missing optional
//! fields take documented defaults. Scale and rotation are baked into the
//! geometry on import; export always writes identity transforms.

use crate::geometry::points_bounds;
use crate::scene::Scene;
use crate::shapes::{
    Arrow, Circle, FontFamily, Line, Pencil, Rectangle, SerializableColor, Shape, ShapeId,
    ShapeStyle, Sloppiness, Text, generate_seed,
};
use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Current document version.
pub const FORMAT_VERSION: &str = "1";

const KNOWN_TYPES: &[&str] = &["rectangle", "circle", "line", "arrow", "pencil", "text"];

/// Import errors.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported document version: {0}")]
    UnsupportedVersion(String),
    #[error("Missing field `{0}`")]
    MissingField(&'static str),
    #[error("Object {index}: unknown shape type `{kind}`")]
    UnknownType { index: usize, kind: String },
    #[error("Object {index}: {message}")]
    InvalidObject { index: usize, message: String },
    #[error("Object {index}: invalid value for `{field}`")]
    InvalidValue { index: usize, field: &'static str },
}

/// How an import treats objects it cannot use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Any bad object rejects the whole document.
    #[default]
    Strict,
    /// Bad objects are dropped with a warning; the rest are imported.
    Lenient,
}

/// Result of a successful import.
#[derive(Debug, Clone)]
pub struct Imported {
    pub scene: Scene,
    /// Objects dropped in lenient mode.
    pub skipped: usize,
}

/// Top-level document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub version: String,
    pub objects: Vec<ShapeDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointDescriptor {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for PointDescriptor {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PointDescriptor> for Point {
    fn from(p: PointDescriptor) -> Self {
        Point::new(p.x, p.y)
    }
}

/// Variant-specific fields, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeometryDescriptor {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Arrow {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        #[serde(rename = "headSize", default = "default_head_size")]
        head_size: f64,
    },
    Pencil {
        points: Vec<PointDescriptor>,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        #[serde(rename = "fontSize", default = "default_font_size")]
        font_size: f64,
        #[serde(rename = "fontFamily", default)]
        font_family: FontFamily,
    },
}

/// One persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDescriptor {
    #[serde(flatten)]
    pub geometry: GeometryDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_fill")]
    pub fill: String,
    #[serde(default = "default_one")]
    pub stroke_width: f64,
    #[serde(default = "default_one")]
    pub scale_x: f64,
    #[serde(default = "default_one")]
    pub scale_y: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub sloppiness: Sloppiness,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

fn default_stroke() -> String {
    "#000000".to_string()
}

fn default_fill() -> String {
    "transparent".to_string()
}

fn default_one() -> f64 {
    1.0
}

fn default_head_size() -> f64 {
    Arrow::DEFAULT_HEAD_SIZE
}

fn default_font_size() -> f64 {
    Text::DEFAULT_FONT_SIZE
}

impl ShapeDescriptor {
    /// Descriptor for a shape, with identity transform fields.
    pub fn from_shape(shape: &Shape) -> Self {
        let style = shape.style();
        let geometry = match shape {
            Shape::Rectangle(r) => GeometryDescriptor::Rectangle {
                x: r.position.x,
                y: r.position.y,
                width: r.width,
                height: r.height,
            },
            Shape::Circle(c) => GeometryDescriptor::Circle {
                x: c.center.x,
                y: c.center.y,
                radius: c.radius,
            },
            Shape::Line(l) => GeometryDescriptor::Line {
                x1: l.start.x,
                y1: l.start.y,
                x2: l.end.x,
                y2: l.end.y,
            },
            Shape::Arrow(a) => GeometryDescriptor::Arrow {
                x1: a.start.x,
                y1: a.start.y,
                x2: a.end.x,
                y2: a.end.y,
                head_size: a.head_size,
            },
            Shape::Pencil(p) => GeometryDescriptor::Pencil {
                points: p.points.iter().copied().map(Into::into).collect(),
            },
            Shape::Text(t) => GeometryDescriptor::Text {
                x: t.position.x,
                y: t.position.y,
                text: t.content.clone(),
                font_size: t.font_size,
                font_family: t.font_family,
            },
        };
        Self {
            geometry,
            id: Some(shape.id().to_string()),
            stroke: style.stroke_color.to_css(),
            fill: style
                .fill_color
                .map_or_else(default_fill, |c| c.to_css()),
            stroke_width: style.stroke_width,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            sloppiness: style.sloppiness,
            seed: Some(style.seed),
        }
    }

    /// Build a shape, baking scale and rotation into the geometry.
    fn to_shape(&self, index: usize, used_ids: &mut HashSet<ShapeId>) -> Result<Shape, ImportError> {
        let invalid = |field: &'static str| ImportError::InvalidValue { index, field };
        let finite = |v: f64, field: &'static str| if v.is_finite() { Ok(v) } else { Err(invalid(field)) };
        let non_negative = |v: f64, field: &'static str| {
            if v.is_finite() && v >= 0.0 { Ok(v) } else { Err(invalid(field)) }
        };
        let positive = |v: f64, field: &'static str| {
            if v.is_finite() && v > 0.0 { Ok(v) } else { Err(invalid(field)) }
        };

        let scale_x = positive(self.scale_x, "scaleX")?;
        let scale_y = positive(self.scale_y, "scaleY")?;
        let angle = finite(self.angle, "angle")?;
        let stroke_color = SerializableColor::from_css(&self.stroke).ok_or_else(|| invalid("stroke"))?;
        let fill = SerializableColor::from_css(&self.fill).ok_or_else(|| invalid("fill"))?;
        let style = ShapeStyle {
            stroke_color,
            stroke_width: non_negative(self.stroke_width, "strokeWidth")?,
            fill_color: (!fill.is_transparent()).then_some(fill),
            sloppiness: self.sloppiness,
            seed: self.seed.unwrap_or_else(generate_seed),
        };
        let id = self.claim_id(used_ids);

        let shape = match &self.geometry {
            GeometryDescriptor::Rectangle {
                x,
                y,
                width,
                height,
            } => {
                self.note_dropped_rotation("rectangle");
                Shape::Rectangle(Rectangle::reconstruct(
                    id,
                    Point::new(finite(*x, "x")?, finite(*y, "y")?),
                    non_negative(*width, "width")? * scale_x,
                    non_negative(*height, "height")? * scale_y,
                    style,
                ))
            }
            GeometryDescriptor::Circle { x, y, radius } => Shape::Circle(Circle::reconstruct(
                id,
                Point::new(finite(*x, "x")?, finite(*y, "y")?),
                non_negative(*radius, "radius")? * (scale_x + scale_y) / 2.0,
                style,
            )),
            GeometryDescriptor::Line { x1, y1, x2, y2 } => {
                let pts = self.transform_points(&[
                    Point::new(finite(*x1, "x1")?, finite(*y1, "y1")?),
                    Point::new(finite(*x2, "x2")?, finite(*y2, "y2")?),
                ]);
                Shape::Line(Line::reconstruct(id, pts[0], pts[1], ShapeStyle { fill_color: None, ..style }))
            }
            GeometryDescriptor::Arrow {
                x1,
                y1,
                x2,
                y2,
                head_size,
            } => {
                let pts = self.transform_points(&[
                    Point::new(finite(*x1, "x1")?, finite(*y1, "y1")?),
                    Point::new(finite(*x2, "x2")?, finite(*y2, "y2")?),
                ]);
                Shape::Arrow(Arrow::reconstruct(
                    id,
                    pts[0],
                    pts[1],
                    non_negative(*head_size, "headSize")?,
                    ShapeStyle { fill_color: None, ..style },
                ))
            }
            GeometryDescriptor::Pencil { points } => {
                let raw = points
                    .iter()
                    .map(|p| Ok(Point::new(finite(p.x, "points")?, finite(p.y, "points")?)))
                    .collect::<Result<Vec<_>, ImportError>>()?;
                Shape::Pencil(Pencil::reconstruct(
                    id,
                    self.transform_points(&raw),
                    ShapeStyle { fill_color: None, ..style },
                ))
            }
            GeometryDescriptor::Text {
                x,
                y,
                text,
                font_size,
                font_family,
            } => {
                self.note_dropped_rotation("text");
                Shape::Text(Text::reconstruct(
                    id,
                    Point::new(finite(*x, "x")?, finite(*y, "y")?),
                    text.clone(),
                    positive(*font_size, "fontSize")? * scale_y,
                    *font_family,
                    ShapeStyle { fill_color: None, ..style },
                ))
            }
        };
        Ok(shape)
    }

    /// Reuse the stored id when it is a valid, unused uuid.
    fn claim_id(&self, used_ids: &mut HashSet<ShapeId>) -> ShapeId {
        let stored = self
            .id
            .as_deref()
            .and_then(|s| Uuid::parse_str(s).ok())
            .filter(|id| !used_ids.contains(id));
        let id = stored.unwrap_or_else(Uuid::new_v4);
        used_ids.insert(id);
        id
    }

    /// Apply scale then rotation about the center of the points' bounds.
    fn transform_points(&self, points: &[Point]) -> Vec<Point> {
        let identity = self.angle == 0.0 && self.scale_x == 1.0 && self.scale_y == 1.0;
        if identity {
            return points.to_vec();
        }
        let Some(bounds) = points_bounds(points) else {
            return Vec::new();
        };
        let center = bounds.center().to_vec2();
        let affine = Affine::translate(center)
            * Affine::rotate(self.angle.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
            * Affine::translate(-center);
        points.iter().map(|p| affine * *p).collect()
    }

    fn note_dropped_rotation(&self, kind: &str) {
        if self.angle.abs() > f64::EPSILON {
            log::debug!("ignoring {}° rotation on imported {kind}", self.angle);
        }
    }
}

/// Parse a persisted document into a scene.
///
/// Nothing is mutated on failure: the caller swaps in the returned scene
/// only when this succeeds.
pub fn parse_scene(json: &str, mode: ImportMode) -> Result<Imported, ImportError> {
    let doc: serde_json::Value = serde_json::from_str(json)?;

    let version = match doc.get("version") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(other) => return Err(ImportError::UnsupportedVersion(other.to_string())),
        None => return Err(ImportError::MissingField("version")),
    };
    if version != FORMAT_VERSION {
        return Err(ImportError::UnsupportedVersion(version));
    }

    let objects = doc
        .get("objects")
        .and_then(|o| o.as_array())
        .ok_or(ImportError::MissingField("objects"))?;

    let mut used_ids = HashSet::new();
    let mut shapes = Vec::with_capacity(objects.len());
    let mut skipped = 0;
    for (index, value) in objects.iter().enumerate() {
        match object_to_shape(index, value, &mut used_ids) {
            Ok(shape) => shapes.push(shape),
            Err(err) => match mode {
                ImportMode::Strict => return Err(err),
                ImportMode::Lenient => {
                    log::warn!("dropping imported object: {err}");
                    skipped += 1;
                }
            },
        }
    }

    log::info!("imported {} shapes ({} skipped)", shapes.len(), skipped);
    Ok(Imported {
        scene: Scene::from_shapes(shapes),
        skipped,
    })
}

fn object_to_shape(
    index: usize,
    value: &serde_json::Value,
    used_ids: &mut HashSet<ShapeId>,
) -> Result<Shape, ImportError> {
    let kind = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| ImportError::InvalidObject {
            index,
            message: "missing field `type`".to_string(),
        })?;
    if !KNOWN_TYPES.contains(&kind) {
        return Err(ImportError::UnknownType {
            index,
            kind: kind.to_string(),
        });
    }
    let descriptor: ShapeDescriptor =
        serde_json::from_value(value.clone()).map_err(|e| ImportError::InvalidObject {
            index,
            message: e.to_string(),
        })?;
    descriptor.to_shape(index, used_ids)
}

/// Serialize a scene as a persisted document.
pub fn scene_to_document(scene: &Scene) -> SceneDocument {
    SceneDocument {
        version: FORMAT_VERSION.to_string(),
        objects: scene.iter().map(ShapeDescriptor::from_shape).collect(),
    }
}

pub fn scene_to_json(scene: &Scene) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&scene_to_document(scene))
}
