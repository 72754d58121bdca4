//! Roughboard Core Library
//!
//! Platform-agnostic scene engine for the Roughboard whiteboard: camera,
//! drawables, the tool state machine and the damage-tracked render loop.
//! Hosts feed raw input in and provide a [`render::Surface`] to paint on.

pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod frame;
pub mod ids;
pub mod input;
pub mod math;
pub mod render;
pub mod shapes;
pub mod store;
pub mod tools;

pub use camera::Camera;
pub use config::EngineConfig;
pub use engine::{Engine, Viewport};
pub use error::{EngineError, EngineResult};
pub use events::{EngineEvent, SelectedObject, SubscriptionId};
pub use frame::FrameScheduler;
pub use ids::{IdSource, RandomIds, SequentialIds};
pub use input::{
    Modifiers, MouseButton, MouseEventData, Platform, RawKeyEvent, RawModifiers, RawMouseEvent,
    RawWheelEvent,
};
pub use render::{DrawCommand, RecordingSurface, ResolvedStyle, RoughBackend, Surface};
pub use shapes::{Drawable, Rectangle, ShapeId, ShapeStyle, StylePatch};
pub use store::ObjectStore;
pub use tools::{Tool, ToolContext, ToolKind};
