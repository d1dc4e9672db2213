//! Text shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::rect_contains_point;
use crate::measure::TextMeasure;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    /// Hand-drawn style font (default).
    #[default]
    HandDrawn,
    SansSerif,
    Serif,
    Monospace,
}

impl FontFamily {
    /// Get the font family name as used by the renderer.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::HandDrawn => "Virgil, Segoe Print, cursive",
            FontFamily::SansSerif => "Helvetica, Arial, sans-serif",
            FontFamily::Serif => "Georgia, serif",
            FontFamily::Monospace => "Menlo, Consolas, monospace",
        }
    }
}

/// A text shape.
///
/// `content` may span several lines separated by `\n`. Layout is top-left
/// anchored: line `i` starts at `position.y + i * line_height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Position (top-left corner of text bounding box).
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    pub font_family: FontFamily,
    /// Set while the text is open in the editor.
    #[serde(default)]
    pub is_editing: bool,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Text {
    /// Default font size (M = Medium).
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Create a new text shape.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            is_editing: false,
            style: ShapeStyle::default(),
        }
    }

    pub(crate) fn reconstruct(
        id: ShapeId,
        position: Point,
        content: String,
        font_size: f64,
        font_family: FontFamily,
        style: ShapeStyle,
    ) -> Self {
        Self {
            id,
            position,
            content,
            font_size,
            font_family,
            is_editing: false,
            style,
        }
    }

    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }

    pub fn with_font_size(&self, font_size: f64) -> Self {
        Self {
            font_size,
            ..self.clone()
        }
    }

    pub fn with_position(&self, position: Point) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    pub fn with_editing(&self, is_editing: bool) -> Self {
        Self {
            is_editing,
            ..self.clone()
        }
    }

    /// Lines of the content. An empty string is one empty line.
    pub fn lines(&self) -> Vec<&str> {
        self.content.split('\n').collect()
    }

    /// Number of chars in the content (the caret range is `0..=char_count`).
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn line_height(&self, measure: &dyn TextMeasure) -> f64 {
        measure.line_height(self.font_size)
    }

    /// Measured width of the widest line.
    pub fn measured_width(&self, measure: &dyn TextMeasure) -> f64 {
        self.lines()
            .iter()
            .map(|line| measure.width(line, self.font_size, self.font_family))
            .fold(0.0, f64::max)
    }

    pub fn measured_height(&self, measure: &dyn TextMeasure) -> f64 {
        self.lines().len() as f64 * self.line_height(measure)
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.measured_width(measure),
            self.position.y + self.measured_height(measure),
        )
    }

    fn hit_test(&self, point: Point, _tolerance: f64, measure: &dyn TextMeasure) -> bool {
        rect_contains_point(self.bounds(measure), point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn translated(&self, delta: Vec2) -> Self {
        self.with_position(self.position + delta)
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
    use crate::measure::MonospaceMeasure;

    #[test]
    fn test_multiline_bounds() {
        let text = Text::new(Point::new(10.0, 20.0), "abc\nlonger\nx".to_string());
        let m = MonospaceMeasure { advance: 10.0 };
        let bounds = text.bounds(&m);
        assert!((bounds.width() - 60.0).abs() < 1e-9);
        // 3 lines * 20 * 1.2
        assert!((bounds.height() - 72.0).abs() < 1e-9);
        assert_eq!(bounds.origin(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_empty_text_is_one_line() {
        let text = Text::new(Point::ZERO, String::new());
        assert_eq!(text.lines(), vec![""]);
        let bounds = text.bounds(&MonospaceMeasure { advance: 10.0 });
        assert!(bounds.width().abs() < f64::EPSILON);
        assert!((bounds.height() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_uses_measured_box() {
        let text = Text::new(Point::ZERO, "hello".to_string());
        let m = MonospaceMeasure { advance: 10.0 };
        assert!(text.hit_test(Point::new(50.0, 24.0), 0.0, &m));
        assert!(!text.hit_test(Point::new(51.0, 10.0), 0.0, &m));
    }

    #[test]
    fn test_builders_keep_id() {
        let text = Text::new(Point::ZERO, "a".to_string());
        let edited = text.with_content("ab").with_font_size(30.0).with_editing(true);
        assert_eq!(edited.id, text.id);
        assert_eq!(edited.content, "ab");
        assert!(edited.is_editing);
        assert_eq!(text.content, "a");
    }
}
