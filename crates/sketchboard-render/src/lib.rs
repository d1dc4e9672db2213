//! Sketchboard Render Library
//!
//! Frame rendering over a pluggable [`RenderBackend`], the hand-drawn path
//! distortion, and the SVG/PNG export paths.

mod export;
mod recorder;
mod renderer;
pub mod rough;
mod svg;

pub use export::{EXPORT_BACKGROUND, EXPORT_MARGIN, ExportError, encode_png, export_svg};
pub use recorder::{CommandRecorder, DrawCommand};
pub use renderer::{
    GRID_SIZE, GridStyle, OverlayStyle, RenderBackend, RenderContext, render_frame, render_shape,
};
pub use svg::SvgBackend;
