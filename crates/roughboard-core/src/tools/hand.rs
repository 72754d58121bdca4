//! Hand tool: drag to pan the camera.

use super::{Tool, ToolContext, ToolKind};
use crate::input::{MouseButton, MouseEventData};

#[derive(Debug, Clone, Default)]
pub struct HandTool {
    mouse_down: Option<MouseButton>,
}

impl HandTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for HandTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Hand
    }

    fn on_mouse_down(&mut self, event: &MouseEventData, _ctx: &mut ToolContext<'_>) {
        if event.button == MouseButton::Right {
            return;
        }
        self.mouse_down = Some(event.button);
    }

    fn on_mouse_move(&mut self, event: &MouseEventData, ctx: &mut ToolContext<'_>) {
        if self.mouse_down.is_none() {
            return;
        }
        // The scene follows the pointer
        ctx.pan_camera(-event.movement);
    }

    fn on_mouse_up(&mut self, event: &MouseEventData, _ctx: &mut ToolContext<'_>) {
        if self.mouse_down != Some(event.button) {
            return;
        }
        self.mouse_down = None;
    }

    fn cancel(&mut self) {
        self.mouse_down = None;
    }

    fn is_active(&self) -> bool {
        self.mouse_down.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::Harness;
    use kurbo::{Point, Vec2};

    #[test]
    fn test_drag_pans_against_movement() {
        let mut h = Harness::new();
        h.camera.set_zoom(2.0);
        let mut tool = HandTool::new();
        let start = Point::new(100.0, 100.0);
        let down = h.event(MouseButton::Left, start, start);
        tool.on_mouse_down(&down, &mut h.ctx());

        let end = start + Vec2::new(10.0, -4.0);
        let mv = h.event(MouseButton::Left, end, start);
        tool.on_mouse_move(&mv, &mut h.ctx());

        assert!((h.camera.position.x - -5.0).abs() < 1e-9);
        assert!((h.camera.position.y - 2.0).abs() < 1e-9);
        assert_eq!(h.redraws.get(), 1);
    }

    #[test]
    fn test_world_point_follows_pointer() {
        let mut h = Harness::new();
        let mut tool = HandTool::new();
        let start = Point::new(200.0, 150.0);
        let grabbed = h.camera.viewport_to_world(start);
        let down = h.event(MouseButton::Middle, start, start);
        tool.on_mouse_down(&down, &mut h.ctx());

        let end = Point::new(260.0, 190.0);
        let mv = h.event(MouseButton::Middle, end, start);
        tool.on_mouse_move(&mv, &mut h.ctx());

        let under_pointer = h.camera.viewport_to_world(end);
        assert!((under_pointer - grabbed).hypot() < 1e-9);
    }

    #[test]
    fn test_right_button_does_not_pan() {
        let mut h = Harness::new();
        let mut tool = HandTool::new();
        let start = Point::new(100.0, 100.0);
        let down = h.event(MouseButton::Right, start, start);
        tool.on_mouse_down(&down, &mut h.ctx());
        let mv = h.event(MouseButton::Right, start + Vec2::new(30.0, 30.0), start);
        tool.on_mouse_move(&mv, &mut h.ctx());
        assert_eq!(h.camera.position, Point::ZERO);
    }

    #[test]
    fn test_hover_without_press_does_not_pan() {
        let mut h = Harness::new();
        let mut tool = HandTool::new();
        let start = Point::new(100.0, 100.0);
        let mv = h.event(MouseButton::Left, start + Vec2::new(30.0, 30.0), start);
        tool.on_mouse_move(&mv, &mut h.ctx());
        assert_eq!(h.camera.position, Point::ZERO);
        assert_eq!(h.redraws.get(), 0);
    }

    #[test]
    fn test_matching_mouse_up_ends_pan() {
        let mut h = Harness::new();
        let mut tool = HandTool::new();
        let start = Point::new(100.0, 100.0);
        let down = h.event(MouseButton::Left, start, start);
        tool.on_mouse_down(&down, &mut h.ctx());

        let up = h.event(MouseButton::Middle, start, start);
        tool.on_mouse_up(&up, &mut h.ctx());
        assert!(tool.is_active());

        let up = h.event(MouseButton::Left, start, start);
        tool.on_mouse_up(&up, &mut h.ctx());
        assert!(!tool.is_active());
    }
}
