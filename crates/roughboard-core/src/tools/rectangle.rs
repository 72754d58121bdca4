//! Rectangle creation tool.

use super::{Tool, ToolContext, ToolKind};
use crate::input::{MouseButton, MouseEventData};
use crate::math::{abs_delta, distance};
use crate::shapes::ShapeId;
use kurbo::Point;

/// Where the current drag started.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    button: MouseButton,
    viewport_position: Point,
    world_position: Point,
}

/// Drag out a rectangle.
///
/// Nothing is created until the pointer has travelled
/// [`EngineConfig::creation_threshold`](crate::EngineConfig) viewport pixels
/// from the mouse-down point, so plain clicks leave the scene untouched.
#[derive(Debug, Clone, Default)]
pub struct RectangleTool {
    anchor: Option<Anchor>,
    /// Object created by the current drag.
    creating: Option<ShapeId>,
}

impl RectangleTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for RectangleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rectangle
    }

    fn on_mouse_down(&mut self, event: &MouseEventData, _ctx: &mut ToolContext<'_>) {
        if event.button != MouseButton::Left {
            return;
        }
        self.anchor = Some(Anchor {
            button: event.button,
            viewport_position: event.viewport_position,
            world_position: event.world_position,
        });
        self.creating = None;
    }

    fn on_mouse_move(&mut self, event: &MouseEventData, ctx: &mut ToolContext<'_>) {
        let Some(anchor) = self.anchor else {
            return;
        };
        let size = abs_delta(anchor.world_position, event.world_position);

        match self.creating {
            None => {
                let travelled = distance(anchor.viewport_position, event.viewport_position);
                if travelled < ctx.config.creation_threshold {
                    return;
                }
                let id = ctx.create_rectangle(anchor.world_position, size.x, size.y);
                self.creating = Some(id);
            }
            Some(id) => {
                if let Some(rect) = ctx.store.get_mut(id).and_then(|d| d.as_rect_mut()) {
                    rect.resize(size.x, size.y);
                }
            }
        }
        ctx.request_redraw();
    }

    fn on_mouse_up(&mut self, event: &MouseEventData, _ctx: &mut ToolContext<'_>) {
        if self.anchor.map(|a| a.button) != Some(event.button) {
            return;
        }
        self.cancel();
    }

    fn cancel(&mut self) {
        self.anchor = None;
        self.creating = None;
    }

    fn is_active(&self) -> bool {
        self.anchor.is_some()
    }
}
