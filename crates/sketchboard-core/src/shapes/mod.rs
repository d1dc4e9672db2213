//! Shape definitions for the canvas.
//!
//! Shapes are values: every edit produces a new value that replaces the old
//! one in the scene. Nothing mutates a shape once it has been placed, which is
//! what lets the history keep plain snapshots.

mod arrow;
mod circle;
mod line;
mod pencil;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use circle::Circle;
pub use line::Line;
pub use pencil::Pencil;
pub use rectangle::Rectangle;
pub use text::{FontFamily, Text};

use crate::measure::TextMeasure;
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse a CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa` or `transparent`.
    pub fn from_css(color: &str) -> Option<Self> {
        let color = color.trim();
        if color.eq_ignore_ascii_case("transparent") || color.eq_ignore_ascii_case("none") {
            return Some(Self::transparent());
        }

        let hex = color.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as a CSS color string.
    pub fn to_css(&self) -> String {
        if self.is_transparent() {
            "transparent".to_string()
        } else if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Sloppiness level for the hand-drawn effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sloppiness {
    /// Clean, precise lines.
    Architect,
    /// Slight hand-drawn feel.
    #[default]
    Artist,
    /// Very sketchy strokes.
    Cartoonist,
}

impl Sloppiness {
    /// Roughness value handed to the rendering backend.
    pub fn roughness(&self) -> f64 {
        match self {
            Sloppiness::Architect => 0.0,
            Sloppiness::Artist => 1.0,
            Sloppiness::Cartoonist => 2.0,
        }
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    /// Fill color (None = no fill). Only closed shapes use it.
    pub fill_color: Option<SerializableColor>,
    pub sloppiness: Sloppiness,
    /// Seed for the hand-drawn effect, stable for the life of the shape.
    #[serde(default = "generate_seed")]
    pub seed: u32,
}

/// Generate a seed for a new shape.
///
/// Counter mixed through a splitmix-style hash; works the same on every
/// platform including wasm.
pub fn generate_seed() -> u32 {
    use std::sync::atomic::{AtomicU32, Ordering};

    static SEED_COUNTER: AtomicU32 = AtomicU32::new(1);

    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut x = counter.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

impl ShapeStyle {
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }

    /// Copy of this style with a fresh seed.
    pub fn reseeded(&self) -> Self {
        Self {
            seed: generate_seed(),
            ..self.clone()
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            sloppiness: Sloppiness::default(),
            seed: generate_seed(),
        }
    }
}

/// Behaviour every shape variant provides.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Tight bounding box in canvas coordinates.
    fn bounds(&self, measure: &dyn TextMeasure) -> Rect;

    /// Check if a canvas-space point hits this shape.
    ///
    /// `tolerance` applies to stroked shapes (lines, arrows, pencil strokes);
    /// box-like shapes use exact inclusive containment.
    fn hit_test(&self, point: Point, tolerance: f64, measure: &dyn TextMeasure) -> bool;

    fn style(&self) -> &ShapeStyle;

    /// Copy of this shape moved by `delta`.
    fn translated(&self, delta: Vec2) -> Self
    where
        Self: Sized;

    /// Copy of this shape with a different style.
    fn with_style(&self, style: ShapeStyle) -> Self
    where
        Self: Sized;
}

/// Variant tag for shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
    Arrow,
    Pencil,
    Text,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Pencil => "pencil",
            ShapeKind::Text => "text",
        }
    }
}

/// Closed set of shape variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Line(Line),
    Arrow(Arrow),
    Pencil(Pencil),
    Text(Text),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Circle(s) => s.id(),
            Shape::Line(s) => s.id(),
            Shape::Arrow(s) => s.id(),
            Shape::Pencil(s) => s.id(),
            Shape::Text(s) => s.id(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Arrow(_) => ShapeKind::Arrow,
            Shape::Pencil(_) => ShapeKind::Pencil,
            Shape::Text(_) => ShapeKind::Text,
        }
    }

    pub fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(measure),
            Shape::Circle(s) => s.bounds(measure),
            Shape::Line(s) => s.bounds(measure),
            Shape::Arrow(s) => s.bounds(measure),
            Shape::Pencil(s) => s.bounds(measure),
            Shape::Text(s) => s.bounds(measure),
        }
    }

    /// Bounding box inflated by `padding` on every side.
    ///
    /// Used for selection indicators and marquee containment.
    pub fn padded_bounds(&self, padding: f64, measure: &dyn TextMeasure) -> Rect {
        self.bounds(measure).inflate(padding, padding)
    }

    pub fn hit_test(&self, point: Point, tolerance: f64, measure: &dyn TextMeasure) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, tolerance, measure),
            Shape::Circle(s) => s.hit_test(point, tolerance, measure),
            Shape::Line(s) => s.hit_test(point, tolerance, measure),
            Shape::Arrow(s) => s.hit_test(point, tolerance, measure),
            Shape::Pencil(s) => s.hit_test(point, tolerance, measure),
            Shape::Text(s) => s.hit_test(point, tolerance, measure),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Circle(s) => s.style(),
            Shape::Line(s) => s.style(),
            Shape::Arrow(s) => s.style(),
            Shape::Pencil(s) => s.style(),
            Shape::Text(s) => s.style(),
        }
    }

    pub fn translated(&self, delta: Vec2) -> Shape {
        match self {
            Shape::Rectangle(s) => Shape::Rectangle(s.translated(delta)),
            Shape::Circle(s) => Shape::Circle(s.translated(delta)),
            Shape::Line(s) => Shape::Line(s.translated(delta)),
            Shape::Arrow(s) => Shape::Arrow(s.translated(delta)),
            Shape::Pencil(s) => Shape::Pencil(s.translated(delta)),
            Shape::Text(s) => Shape::Text(s.translated(delta)),
        }
    }

    pub fn with_style(&self, style: ShapeStyle) -> Shape {
        match self {
            Shape::Rectangle(s) => Shape::Rectangle(s.with_style(style)),
            Shape::Circle(s) => Shape::Circle(s.with_style(style)),
            Shape::Line(s) => Shape::Line(s.with_style(style)),
            Shape::Arrow(s) => Shape::Arrow(s.with_style(style)),
            Shape::Pencil(s) => Shape::Pencil(s.with_style(style)),
            Shape::Text(s) => Shape::Text(s.with_style(style)),
        }
    }

    /// The same shape under another id.
    pub(crate) fn with_id(mut self, id: ShapeId) -> Shape {
        match &mut self {
            Shape::Rectangle(s) => s.id = id,
            Shape::Circle(s) => s.id = id,
            Shape::Line(s) => s.id = id,
            Shape::Arrow(s) => s.id = id,
            Shape::Pencil(s) => s.id = id,
            Shape::Text(s) => s.id = id,
        }
        self
    }

    /// Whether the shape has enough geometry to be drawn.
    pub fn is_drawable(&self) -> bool {
        match self {
            Shape::Pencil(p) => p.points.len() >= 2,
            _ => true,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Shape::Text(_))
    }
}
