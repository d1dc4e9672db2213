//! Backend that records draw calls for replay and inspection.

use crate::renderer::{OverlayStyle, RenderBackend};
use kurbo::{Affine, BezPath, Point, Rect, Size};
use peniko::Color;
use sketchboard_core::shapes::{SerializableColor, ShapeStyle, Text};

/// One recorded draw call. Colors are stored as RGBA8.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        viewport: Size,
        background: SerializableColor,
    },
    Rectangle {
        rect: Rect,
        style: ShapeStyle,
        transform: Affine,
    },
    Circle {
        center: Point,
        radius: f64,
        style: ShapeStyle,
        transform: Affine,
    },
    Line {
        start: Point,
        end: Point,
        style: ShapeStyle,
        transform: Affine,
    },
    Path {
        path: BezPath,
        style: ShapeStyle,
        transform: Affine,
    },
    Text {
        text: Text,
        line_height: f64,
        transform: Affine,
    },
    OverlayRect {
        rect: Rect,
        stroke: Option<SerializableColor>,
        fill: Option<SerializableColor>,
        width: f64,
        dashed: bool,
    },
    OverlayLine {
        start: Point,
        end: Point,
        color: SerializableColor,
        width: f64,
    },
}

impl DrawCommand {
    /// Whether this call draws scene content rather than UI chrome.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            DrawCommand::Rectangle { .. }
                | DrawCommand::Circle { .. }
                | DrawCommand::Line { .. }
                | DrawCommand::Path { .. }
                | DrawCommand::Text { .. }
        )
    }
}

/// Records every call in order.
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hand the recorded calls over, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Replay the recording into another backend.
    pub fn replay(&self, backend: &mut dyn RenderBackend) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear {
                    viewport,
                    background,
                } => backend.clear(*viewport, (*background).into()),
                DrawCommand::Rectangle {
                    rect,
                    style,
                    transform,
                } => backend.rough_rectangle(*rect, style, *transform),
                DrawCommand::Circle {
                    center,
                    radius,
                    style,
                    transform,
                } => backend.rough_circle(*center, *radius, style, *transform),
                DrawCommand::Line {
                    start,
                    end,
                    style,
                    transform,
                } => backend.rough_line(*start, *end, style, *transform),
                DrawCommand::Path {
                    path,
                    style,
                    transform,
                } => backend.rough_path(path, style, *transform),
                DrawCommand::Text {
                    text,
                    line_height,
                    transform,
                } => backend.text(text, *line_height, *transform),
                DrawCommand::OverlayRect {
                    rect,
                    stroke,
                    fill,
                    width,
                    dashed,
                } => backend.overlay_rect(
                    *rect,
                    OverlayStyle {
                        stroke: stroke.map(Color::from),
                        fill: fill.map(Color::from),
                        width: *width,
                        dashed: *dashed,
                    },
                ),
                DrawCommand::OverlayLine {
                    start,
                    end,
                    color,
                    width,
                } => backend.overlay_line(*start, *end, (*color).into(), *width),
            }
        }
    }
}

impl RenderBackend for CommandRecorder {
    fn clear(&mut self, viewport: Size, background: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear {
            viewport,
            background: background.into(),
        });
    }

    fn rough_rectangle(&mut self, rect: Rect, style: &ShapeStyle, transform: Affine) {
        self.commands.push(DrawCommand::Rectangle {
            rect,
            style: style.clone(),
            transform,
        });
    }

    fn rough_circle(&mut self, center: Point, radius: f64, style: &ShapeStyle, transform: Affine) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            style: style.clone(),
            transform,
        });
    }

    fn rough_line(&mut self, start: Point, end: Point, style: &ShapeStyle, transform: Affine) {
        self.commands.push(DrawCommand::Line {
            start,
            end,
            style: style.clone(),
            transform,
        });
    }

    fn rough_path(&mut self, path: &BezPath, style: &ShapeStyle, transform: Affine) {
        self.commands.push(DrawCommand::Path {
            path: path.clone(),
            style: style.clone(),
            transform,
        });
    }

    fn text(&mut self, text: &Text, line_height: f64, transform: Affine) {
        self.commands.push(DrawCommand::Text {
            text: text.clone(),
            line_height,
            transform,
        });
    }

    fn overlay_rect(&mut self, rect: Rect, style: OverlayStyle) {
        self.commands.push(DrawCommand::OverlayRect {
            rect,
            stroke: style.stroke.map(SerializableColor::from),
            fill: style.fill.map(SerializableColor::from),
            width: style.width,
            dashed: style.dashed,
        });
    }

    fn overlay_line(&mut self, start: Point, end: Point, color: Color, width: f64) {
        self.commands.push(DrawCommand::OverlayLine {
            start,
            end,
            color: color.into(),
            width,
        });
    }
}
