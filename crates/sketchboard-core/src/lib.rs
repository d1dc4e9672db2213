//! Sketchboard Core Library
//!
//! Platform-agnostic scene model, geometry and interaction state for the
//! Sketchboard drawing editor. Rendering lives in `sketchboard-render`.

pub mod camera;
pub mod config;
pub mod drawing;
pub mod editor;
pub mod format;
pub mod geometry;
pub mod history;
pub mod input;
pub mod measure;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod shortcuts;
pub mod svg_import;
pub mod text_edit;

pub use camera::Camera;
pub use config::{ConfigError, EditorConfig, HitToleranceSpace};
pub use drawing::{DrawState, DrawingSession, ToolKind};
pub use editor::{Editor, Gesture};
pub use format::{ImportError, ImportMode, Imported, parse_scene, scene_to_json};
pub use history::History;
pub use input::{ClickTracker, Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use measure::{ApproximateMeasure, MonospaceMeasure, TextMeasure};
pub use scene::Scene;
pub use selection::{Corner, ManipulationState, Marquee, MultiMoveState, Selection};
pub use shapes::{
    Arrow, Circle, FontFamily, Line, Pencil, Rectangle, SerializableColor, Shape, ShapeId, ShapeKind,
    ShapeStyle, ShapeTrait, Sloppiness, Text,
};
pub use shortcuts::{Command, Shortcut, ShortcutRegistry};
pub use svg_import::{SvgElement, SvgElementKind, SvgTransform};
pub use text_edit::{TextEditResult, TextEditState};
