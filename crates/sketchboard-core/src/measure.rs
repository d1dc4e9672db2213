//! Text measurement capability.
//!
//! The real glyph metrics belong to whatever font stack the host renders with.
//! Hit testing, caret placement and bounding boxes only need the advance width
//! of a string, which is what [`TextMeasure`] provides.

use crate::shapes::FontFamily;

/// Ratio between line height and font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Measures rendered text.
pub trait TextMeasure {
    /// Advance width of a single line of `text`.
    fn width(&self, text: &str, font_size: f64, family: FontFamily) -> f64;

    /// Height of one line of text.
    fn line_height(&self, font_size: f64) -> f64 {
        font_size * LINE_HEIGHT_FACTOR
    }
}

/// Measurement from per-family average glyph widths.
///
/// Used when no font stack is available (tests, headless export).
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasure;

impl ApproximateMeasure {
    fn char_width_factor(family: FontFamily) -> f64 {
        match family {
            FontFamily::HandDrawn => 0.55,
            FontFamily::SansSerif => 0.52,
            FontFamily::Serif => 0.5,
            FontFamily::Monospace => 0.6,
        }
    }
}

impl TextMeasure for ApproximateMeasure {
    fn width(&self, text: &str, font_size: f64, family: FontFamily) -> f64 {
        text.chars().count() as f64 * font_size * Self::char_width_factor(family)
    }
}

/// Fixed advance per character; handy when exact caret positions matter.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    pub advance: f64,
}

impl TextMeasure for MonospaceMeasure {
    fn width(&self, text: &str, _font_size: f64, _family: FontFamily) -> f64 {
        text.chars().count() as f64 * self.advance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approximate_width_counts_chars() {
        let m = ApproximateMeasure;
        let w = m.width("héllo", 20.0, FontFamily::Monospace);
        assert!((w - 60.0).abs() < 1e-9);
        assert!((m.line_height(20.0) - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_monospace_measure() {
        let m = MonospaceMeasure { advance: 10.0 };
        assert!((m.width("abc", 99.0, FontFamily::Serif) - 30.0).abs() < 1e-9);
    }
}
