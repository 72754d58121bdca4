//! Selection tool: pick the topmost object and drag it around.

use super::{Tool, ToolContext, ToolKind};
use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::input::{MouseButton, MouseEventData};
use crate::render::Surface;
use crate::shapes::ShapeId;
use crate::store::ObjectStore;
use kurbo::{Point, Rect};

#[derive(Debug, Clone, Default)]
pub struct SelectionTool {
    /// Button that started the current gesture.
    mouse_down: Option<MouseButton>,
    selected: Option<ShapeId>,
}

impl SelectionTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for SelectionTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Selection
    }

    fn on_mouse_down(&mut self, event: &MouseEventData, ctx: &mut ToolContext<'_>) {
        if event.button != MouseButton::Left {
            return;
        }
        self.mouse_down = Some(event.button);
        self.selected = ctx.store.hit_test(event.world_position);
        log::debug!("Selection at {:?}: {:?}", event.world_position, self.selected);

        ctx.announce_selection(self.selected);
        ctx.request_redraw();
    }

    fn on_mouse_move(&mut self, event: &MouseEventData, ctx: &mut ToolContext<'_>) {
        if self.mouse_down.is_none() {
            return;
        }
        let Some(id) = self.selected else {
            return;
        };
        if let Some(object) = ctx.store.get_mut(id) {
            object.translate(event.world_movement);
            ctx.request_redraw();
        }
    }

    fn on_mouse_up(&mut self, event: &MouseEventData, _ctx: &mut ToolContext<'_>) {
        if self.mouse_down != Some(event.button) {
            return;
        }
        self.mouse_down = None;
    }

    fn draw_overlay(
        &self,
        surface: &mut dyn Surface,
        store: &ObjectStore,
        camera: &Camera,
        config: &EngineConfig,
    ) {
        let Some(object) = self.selected.and_then(|id| store.get(id)) else {
            return;
        };
        let bounds = object.bounds();
        let outline = Rect::from_points(
            camera.world_to_viewport(bounds.origin()),
            camera.world_to_viewport(Point::new(bounds.x1, bounds.y1)),
        )
        .inflate(config.selection_padding, config.selection_padding);
        surface.stroke_rect(outline, config.selection_color, config.selection_line_width);
    }

    fn cancel(&mut self) {
        self.mouse_down = None;
    }

    fn is_active(&self) -> bool {
        self.mouse_down.is_some()
    }

    fn selected(&self) -> Option<ShapeId> {
        self.selected
    }
}
