//! Tools and the in-progress drawing session.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::shapes::{
    Arrow, Circle, Line, Pencil, Rectangle, Shape, ShapeId, ShapeStyle, generate_seed,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Circle,
    Line,
    Arrow,
    Pencil,
    Text,
}

impl ToolKind {
    /// Tools that go through a [`DrawingSession`].
    pub fn is_draw_tool(&self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle
                | ToolKind::Circle
                | ToolKind::Line
                | ToolKind::Arrow
                | ToolKind::Pencil
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Line => "line",
            ToolKind::Arrow => "arrow",
            ToolKind::Pencil => "pencil",
            ToolKind::Text => "text",
        }
    }
}

/// State of a drawing interaction.
///
/// The id and seed are fixed at start, so every preview and the finished
/// shape share them.
#[derive(Debug, Clone, Default)]
pub enum DrawState {
    #[default]
    Idle,
    /// Rectangle, circle, line or arrow. Points are in screen space.
    PointDrag {
        tool: ToolKind,
        start: Point,
        current: Point,
        id: ShapeId,
        /// Seed for the hand-drawn effect.
        seed: u32,
    },
    /// Pencil stroke. Points are in canvas space.
    Freehand {
        points: Vec<Point>,
        id: ShapeId,
        seed: u32,
    },
}

/// Tracks the shape currently being drawn.
#[derive(Debug, Clone, Default)]
pub struct DrawingSession {
    pub state: DrawState,
    /// Style applied to new shapes.
    pub current_style: ShapeStyle,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin drawing with `tool` at a screen-space point. Non-drawing tools
    /// leave the session idle.
    pub fn start(&mut self, tool: ToolKind, screen_point: Point, camera: &Camera) {
        let id = Uuid::new_v4();
        let seed = generate_seed();
        self.state = match tool {
            ToolKind::Pencil => DrawState::Freehand {
                points: vec![camera.screen_to_canvas(screen_point)],
                id,
                seed,
            },
            ToolKind::Rectangle | ToolKind::Circle | ToolKind::Line | ToolKind::Arrow => {
                DrawState::PointDrag {
                    tool,
                    start: screen_point,
                    current: screen_point,
                    id,
                    seed,
                }
            }
            ToolKind::Select | ToolKind::Text => DrawState::Idle,
        };
    }

    /// Move the live end point, or append to the pencil stroke.
    ///
    /// A pencil point equal to the previous one is dropped, so a release
    /// without movement never turns a click into a stroke.
    pub fn update(&mut self, screen_point: Point, camera: &Camera) {
        match &mut self.state {
            DrawState::PointDrag { current, .. } => *current = screen_point,
            DrawState::Freehand { points, .. } => {
                let point = camera.screen_to_canvas(screen_point);
                if points.last() != Some(&point) {
                    points.push(point);
                }
            }
            DrawState::Idle => {}
        }
    }

    /// End the interaction and return the finished shape.
    ///
    /// Rectangles and circles smaller than `min_shape_size` on either axis
    /// and pencil strokes with fewer than two points are discarded.
    pub fn finish(&mut self, camera: &Camera, config: &EditorConfig) -> Option<Shape> {
        let state = std::mem::take(&mut self.state);
        match &state {
            DrawState::PointDrag {
                tool,
                start,
                current,
                ..
            } => {
                let a = camera.screen_to_canvas(*start);
                let b = camera.screen_to_canvas(*current);
                let gated = matches!(tool, ToolKind::Rectangle | ToolKind::Circle);
                let (dx, dy) = ((b.x - a.x).abs(), (b.y - a.y).abs());
                if gated && (dx <= config.min_shape_size || dy <= config.min_shape_size) {
                    log::debug!("discarding {} below minimum size", tool.name());
                    None
                } else {
                    self.build(&state, camera)
                }
            }
            DrawState::Freehand { points, .. } if points.len() < 2 => {
                log::debug!("discarding pencil stroke with {} points", points.len());
                None
            }
            DrawState::Freehand { .. } => self.build(&state, camera),
            DrawState::Idle => None,
        }
    }

    /// The live shape for rendering, without any size gate.
    pub fn preview(&self, camera: &Camera) -> Option<Shape> {
        self.build(&self.state, camera)
    }

    /// Discard the in-progress shape.
    pub fn cancel(&mut self) {
        self.state = DrawState::Idle;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, DrawState::Idle)
    }

    fn build(&self, state: &DrawState, camera: &Camera) -> Option<Shape> {
        let shape = match state {
            DrawState::Idle => return None,
            DrawState::PointDrag {
                tool,
                start,
                current,
                id,
                seed,
            } => {
                let a = camera.screen_to_canvas(*start);
                let b = camera.screen_to_canvas(*current);
                let style = self.style_with_seed(*seed);
                let shape = match tool {
                    ToolKind::Rectangle => {
                        Shape::Rectangle(Rectangle::from_corners(a, b)).with_style(style)
                    }
                    ToolKind::Circle => Shape::Circle(Circle::from_diameter(a, b)).with_style(style),
                    ToolKind::Line => Shape::Line(Line::new(a, b)).with_style(style),
                    ToolKind::Arrow => Shape::Arrow(Arrow::new(a, b)).with_style(style),
                    ToolKind::Pencil | ToolKind::Select | ToolKind::Text => return None,
                };
                shape.with_id(*id)
            }
            DrawState::Freehand { points, id, seed } => {
                Shape::Pencil(Pencil::from_points(points.clone()))
                    .with_style(self.style_with_seed(*seed))
                    .with_id(*id)
            }
        };
        Some(shape)
    }

    fn style_with_seed(&self, seed: u32) -> ShapeStyle {
        ShapeStyle {
            seed,
            ..self.current_style.clone()
        }
    }
}
