//! File exports: SVG markup and PNG encoding.

use crate::renderer::{GridStyle, RenderContext, render_frame};
use crate::svg::SvgBackend;
use kurbo::{Rect, Vec2};
use peniko::Color;
use sketchboard_core::camera::Camera;
use sketchboard_core::measure::TextMeasure;
use sketchboard_core::scene::Scene;
use thiserror::Error;

/// Empty border around exported drawings, in canvas units.
pub const EXPORT_MARGIN: f64 = 20.0;

/// Page color for opaque exports.
pub const EXPORT_BACKGROUND: Color = Color::WHITE;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Formatting failed")]
    Format(#[from] std::fmt::Error),
}

/// Render `scene` as a standalone SVG document framed around its content.
///
/// Only shapes are drawn: no grid, selection or caret. `background` of
/// `None` leaves the document transparent.
pub fn export_svg(
    scene: &Scene,
    measure: &dyn TextMeasure,
    background: Option<Color>,
) -> Result<String, ExportError> {
    let frame = scene
        .bounds(measure)
        .unwrap_or(Rect::ZERO)
        .inflate(EXPORT_MARGIN, EXPORT_MARGIN);
    let mut camera = Camera::default();
    camera.offset = Vec2::new(-frame.x0, -frame.y0);

    let ctx = RenderContext::new(scene, &camera, measure, frame.size())
        .with_grid(GridStyle::None)
        .with_background(background.unwrap_or(Color::TRANSPARENT));
    let mut backend = SvgBackend::new();
    render_frame(&ctx, &mut backend);
    let svg = backend.finish()?;
    log::debug!(
        "exported {} shapes to svg ({:.0}x{:.0})",
        scene.len(),
        frame.width(),
        frame.height()
    );
    Ok(svg)
}

/// Encode RGBA8 pixels produced by a raster backend as PNG.
pub fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, ExportError> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(ExportError::BufferSize {
            width,
            height,
            expected,
            actual: rgba.len(),
        });
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba)?;
        writer.finish()?;
    }
    log::debug!("encoded {width}x{height} png, {} bytes", png_data.len());
    Ok(png_data)
}
