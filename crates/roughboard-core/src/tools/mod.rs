//! Tool system for the whiteboard.
//!
//! Exactly one tool is active at a time. The engine forwards normalized
//! mouse events to it together with a [`ToolContext`], through which the tool
//! edits the scene, moves the camera and requests redraws.

mod hand;
mod rectangle;
mod selection;

pub use hand::HandTool;
pub use rectangle::RectangleTool;
pub use selection::SelectionTool;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{EngineEvent, EventSink, SelectedObject};
use crate::frame::FrameLoop;
use crate::ids::IdSource;
use crate::input::MouseEventData;
use crate::render::Surface;
use crate::shapes::{Rectangle, ShapeId};
use crate::store::ObjectStore;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Editor modes known to the UI.
///
/// Only `Selection`, `Rectangle` and `Hand` have tools behind them; the rest
/// are reserved toolbar entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Selection,
    Rectangle,
    Hand,
    Ellipse,
    Diamond,
    Arrow,
    Line,
    Draw,
    Text,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        ToolKind::Selection,
        ToolKind::Rectangle,
        ToolKind::Hand,
        ToolKind::Ellipse,
        ToolKind::Diamond,
        ToolKind::Arrow,
        ToolKind::Line,
        ToolKind::Draw,
        ToolKind::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Selection => "selection",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Hand => "hand",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Diamond => "diamond",
            ToolKind::Arrow => "arrow",
            ToolKind::Line => "line",
            ToolKind::Draw => "draw",
            ToolKind::Text => "text",
        }
    }

    /// Whether a tool exists for this mode.
    pub fn is_implemented(self) -> bool {
        matches!(self, ToolKind::Selection | ToolKind::Rectangle | ToolKind::Hand)
    }

    /// Build a fresh tool for this mode.
    pub fn create_tool(self) -> Result<Box<dyn Tool>, EngineError> {
        match self {
            ToolKind::Selection => Ok(Box::new(SelectionTool::new())),
            ToolKind::Rectangle => Ok(Box::new(RectangleTool::new())),
            ToolKind::Hand => Ok(Box::new(HandTool::new())),
            other => Err(EngineError::UnsupportedTool(other.as_str().to_string())),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "selection" | "select" => ToolKind::Selection,
            "rectangle" | "rect" => ToolKind::Rectangle,
            "hand" | "pan" => ToolKind::Hand,
            "ellipse" => ToolKind::Ellipse,
            "diamond" => ToolKind::Diamond,
            "arrow" => ToolKind::Arrow,
            "line" => ToolKind::Line,
            "draw" | "freehand" => ToolKind::Draw,
            "text" => ToolKind::Text,
            _ => return Err(EngineError::UnknownTool(s.to_string())),
        };
        Ok(kind)
    }
}

/// Everything a tool may touch while handling an event.
pub struct ToolContext<'a> {
    pub store: &'a mut ObjectStore,
    pub camera: &'a mut Camera,
    pub config: &'a EngineConfig,
    ids: &'a mut dyn IdSource,
    frames: &'a mut FrameLoop,
    events: &'a mut EventSink,
}

impl<'a> ToolContext<'a> {
    pub fn new(
        store: &'a mut ObjectStore,
        camera: &'a mut Camera,
        config: &'a EngineConfig,
        ids: &'a mut dyn IdSource,
        frames: &'a mut FrameLoop,
        events: &'a mut EventSink,
    ) -> Self {
        Self {
            store,
            camera,
            config,
            ids,
            frames,
            events,
        }
    }

    /// Mark the scene as damaged.
    pub fn request_redraw(&mut self) {
        self.frames.request_redraw();
    }

    /// Insert a new rectangle with a fresh id and seed.
    pub fn create_rectangle(&mut self, position: Point, width: f64, height: f64) -> ShapeId {
        let id = self.ids.next_id();
        let seed = self.ids.next_seed();
        let id = self
            .store
            .insert(Rectangle::new(id, seed, position, width, height).into());
        log::debug!("Created rectangle {id}");
        id
    }

    /// Tell subscribers which object is selected now.
    pub fn announce_selection(&mut self, selected: Option<ShapeId>) {
        let selected = selected.and_then(|id| {
            self.store.get(id).map(|object| SelectedObject {
                id,
                style: object.style().clone(),
            })
        });
        self.events.emit(EngineEvent::SelectionChanged { selected });
    }

    /// Pan the camera by a viewport delta and redraw.
    pub fn pan_camera(&mut self, viewport_delta: Vec2) {
        self.camera.pan(viewport_delta);
        self.request_redraw();
    }
}

/// A tool: a small state machine fed with mouse events.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn on_mouse_down(&mut self, event: &MouseEventData, ctx: &mut ToolContext<'_>);

    fn on_mouse_move(&mut self, event: &MouseEventData, ctx: &mut ToolContext<'_>);

    fn on_mouse_up(&mut self, event: &MouseEventData, ctx: &mut ToolContext<'_>);

    /// Paint tool decorations in viewport (CSS pixel) coordinates.
    fn draw_overlay(
        &self,
        _surface: &mut dyn Surface,
        _store: &ObjectStore,
        _camera: &Camera,
        _config: &EngineConfig,
    ) {
    }

    /// Forget the current gesture without undoing what it already did.
    fn cancel(&mut self);

    /// A gesture is in progress.
    fn is_active(&self) -> bool;

    /// Currently selected object, for tools that select.
    fn selected(&self) -> Option<ShapeId> {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_ids() {
        assert_eq!("selection".parse::<ToolKind>().unwrap(), ToolKind::Selection);
        assert_eq!("select".parse::<ToolKind>().unwrap(), ToolKind::Selection);
        assert_eq!("Rectangle".parse::<ToolKind>().unwrap(), ToolKind::Rectangle);
        assert_eq!("hand".parse::<ToolKind>().unwrap(), ToolKind::Hand);
        assert_eq!("diamond".parse::<ToolKind>().unwrap(), ToolKind::Diamond);
        assert!(matches!(
            "lasso".parse::<ToolKind>(),
            Err(EngineError::UnknownTool(_))
        ));
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for kind in ToolKind::ALL {
            assert_eq!(kind.to_string().parse::<ToolKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_create_tool() {
        for kind in ToolKind::ALL {
            match kind.create_tool() {
                Ok(tool) => {
                    assert!(kind.is_implemented());
                    assert_eq!(tool.kind(), kind);
                    assert!(!tool.is_active());
                }
                Err(err) => {
                    assert!(!kind.is_implemented());
                    assert_eq!(err, EngineError::UnsupportedTool(kind.to_string()));
                }
            }
        }
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ToolKind::Hand).unwrap(), "\"hand\"");
        let kind: ToolKind = serde_json::from_str("\"rectangle\"").unwrap();
        assert_eq!(kind, ToolKind::Rectangle);
    }
}
