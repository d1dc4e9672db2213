//! SVG markup backend.

use crate::renderer::{OverlayStyle, RenderBackend};
use crate::rough::roughen;
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape as _, Size};
use peniko::Color;
use sketchboard_core::shapes::{SerializableColor, ShapeStyle, Text};
use std::fmt::{self, Write};

/// Writes every draw call as an SVG element.
///
/// Shapes are transformed to screen space before the hand-drawn distortion
/// so the wobble has the same size at every zoom level.
#[derive(Debug, Default)]
pub struct SvgBackend {
    size: Size,
    body: String,
    error: Option<fmt::Error>,
}

impl SvgBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the recorded elements in an `<svg>` root.
    pub fn finish(self) -> Result<String, fmt::Error> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.2} {:.2}">"#,
            self.size.width, self.size.height, self.size.width, self.size.height
        )?;
        svg.push_str(&self.body);
        writeln!(svg, "</svg>")?;
        Ok(svg)
    }

    fn emit(&mut self, args: fmt::Arguments) {
        if self.error.is_none() {
            if let Err(err) = self.body.write_fmt(args) {
                self.error = Some(err);
            }
        }
    }

    fn stroke_path(&mut self, path: &BezPath, style: &ShapeStyle, transform: Affine) {
        let screen_path = transform * path.clone();
        let zoom = transform_scale(transform);
        let roughness = style.sloppiness.roughness();
        let width = style.stroke_width * zoom;

        if let Some(fill) = style.fill() {
            let fill_path = roughen(&screen_path, roughness * 0.3, zoom, style.seed, 0);
            self.emit(format_args!(
                "  <path d=\"{}\" fill=\"{}\" stroke=\"none\"/>\n",
                fill_path.to_svg(),
                paint(fill)
            ));
        }

        // Rough styles draw the doubled sketch line.
        let passes = if roughness > 0.0 { 2 } else { 1 };
        for pass in 0..passes {
            let stroked = roughen(&screen_path, roughness, zoom, style.seed, pass);
            self.emit(format_args!(
                "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n",
                stroked.to_svg(),
                paint(style.stroke()),
                width
            ));
        }
    }
}

/// Uniform scale of a camera transform.
fn transform_scale(transform: Affine) -> f64 {
    transform.determinant().abs().sqrt()
}

fn paint(color: Color) -> String {
    let css = SerializableColor::from(color);
    if css.is_transparent() {
        "none".to_string()
    } else {
        css.to_css()
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

impl RenderBackend for SvgBackend {
    fn clear(&mut self, viewport: Size, background: Color) {
        self.size = viewport;
        self.body.clear();
        self.error = None;
        if !SerializableColor::from(background).is_transparent() {
            self.emit(format_args!(
                "  <rect x=\"0\" y=\"0\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>\n",
                viewport.width,
                viewport.height,
                paint(background)
            ));
        }
    }

    fn rough_rectangle(&mut self, rect: Rect, style: &ShapeStyle, transform: Affine) {
        self.stroke_path(&rect.to_path(0.1), style, transform);
    }

    fn rough_circle(&mut self, center: Point, radius: f64, style: &ShapeStyle, transform: Affine) {
        self.stroke_path(&Circle::new(center, radius).to_path(0.1), style, transform);
    }

    fn rough_line(&mut self, start: Point, end: Point, style: &ShapeStyle, transform: Affine) {
        let mut path = BezPath::new();
        path.move_to(start);
        path.line_to(end);
        self.stroke_path(&path, style, transform);
    }

    fn rough_path(&mut self, path: &BezPath, style: &ShapeStyle, transform: Affine) {
        self.stroke_path(path, style, transform);
    }

    fn text(&mut self, text: &Text, line_height: f64, transform: Affine) {
        if text.content.is_empty() {
            return;
        }
        let zoom = transform_scale(transform);
        let origin = transform * text.position;
        let font_size = text.font_size * zoom;
        let step = line_height * zoom;
        self.emit(format_args!(
            "  <text font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\" dominant-baseline=\"text-before-edge\">\n",
            escape_xml(text.font_family.name()),
            font_size,
            paint(text.style.stroke())
        ));
        for (i, line) in text.lines().iter().enumerate() {
            self.emit(format_args!(
                "    <tspan x=\"{:.2}\" y=\"{:.2}\">{}</tspan>\n",
                origin.x,
                origin.y + i as f64 * step,
                escape_xml(line)
            ));
        }
        self.emit(format_args!("  </text>\n"));
    }

    fn overlay_rect(&mut self, rect: Rect, style: OverlayStyle) {
        let fill = style.fill.map_or_else(|| "none".to_string(), paint);
        let stroke = style.stroke.map_or_else(|| "none".to_string(), paint);
        let dash = if style.dashed {
            " stroke-dasharray=\"4 4\""
        } else {
            ""
        };
        self.emit(format_args!(
            "  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.2}\"{}/>\n",
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
            fill,
            stroke,
            style.width,
            dash
        ));
    }

    fn overlay_line(&mut self, start: Point, end: Point, color: Color, width: f64) {
        self.emit(format_args!(
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{:.2}\"/>\n",
            start.x,
            start.y,
            end.x,
            end.y,
            paint(color),
            width
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchboard_core::shapes::Sloppiness;

    fn clean_style() -> ShapeStyle {
        ShapeStyle {
            sloppiness: Sloppiness::Architect,
            ..ShapeStyle::default()
        }
    }

    #[test]
    fn test_empty_document() {
        let mut svg = SvgBackend::new();
        svg.clear(Size::new(100.0, 50.0), Color::TRANSPARENT);
        let out = svg.finish().unwrap();
        assert!(out.starts_with("<svg"));
        assert!(out.contains(r#"viewBox="0 0 100.00 50.00""#));
        assert!(!out.contains("<rect"));
        assert!(out.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_clean_line_is_single_stroke() {
        let mut svg = SvgBackend::new();
        svg.clear(Size::new(100.0, 100.0), Color::WHITE);
        svg.rough_line(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            &clean_style(),
            Affine::scale(2.0),
        );
        let out = svg.finish().unwrap();
        assert_eq!(out.matches("<path").count(), 1);
        assert!(out.contains("M0,0"));
        assert!(out.contains("L20,0"));
        assert!(out.contains(r#"stroke-width="4.00""#));
    }

    #[test]
    fn test_rough_stroke_draws_twice() {
        let mut svg = SvgBackend::new();
        svg.clear(Size::new(100.0, 100.0), Color::WHITE);
        let style = ShapeStyle {
            fill_color: Some(SerializableColor::new(255, 0, 0, 255)),
            sloppiness: Sloppiness::Artist,
            ..ShapeStyle::default()
        };
        svg.rough_rectangle(Rect::new(0.0, 0.0, 10.0, 10.0), &style, Affine::IDENTITY);
        let out = svg.finish().unwrap();
        assert_eq!(out.matches("<path").count(), 3);
        assert!(out.contains(r##"fill="#ff0000""##));
    }

    #[test]
    fn test_text_lines_are_escaped() {
        let mut svg = SvgBackend::new();
        svg.clear(Size::new(100.0, 100.0), Color::WHITE);
        let text = Text::new(Point::new(5.0, 5.0), "a<b\nc&d".to_string());
        svg.text(&text, 24.0, Affine::IDENTITY);
        let out = svg.finish().unwrap();
        assert!(out.contains("a&lt;b</tspan>"));
        assert!(out.contains(r#"<tspan x="5.00" y="29.00">c&amp;d</tspan>"#));
    }
}
