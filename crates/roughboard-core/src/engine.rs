//! The engine: owns the scene, routes input to tools and paints frames.

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::events::{EngineEvent, EventSink, SelectedObject, SubscriptionId};
use crate::frame::{FrameLoop, FrameScheduler};
use crate::ids::IdSource;
use crate::input::{
    Modifiers, MouseButton, MouseEventData, Platform, PointerState, RawKeyEvent, RawMouseEvent,
    RawWheelEvent,
};
use crate::render::Surface;
use crate::shapes::{Drawable, ShapeId, StylePatch};
use crate::store::ObjectStore;
use crate::tools::{HandTool, Tool, ToolContext, ToolKind};
use kurbo::{Affine, Point, Vec2};

/// Where the canvas sits on the page and how big it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas top-left corner in client coordinates.
    pub origin: Point,
    /// Size in CSS pixels.
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            origin: Point::ZERO,
            width,
            height,
            device_pixel_ratio,
        }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Down,
    Move,
    Up,
}

/// A whiteboard scene bound to one canvas.
pub struct Engine {
    config: EngineConfig,
    platform: Platform,
    viewport_origin: Point,
    camera: Camera,
    store: ObjectStore,
    ids: Box<dyn IdSource>,
    frames: FrameLoop,
    events: EventSink,
    /// The active editor tool.
    tool: Box<dyn Tool>,
    /// Takes over mouse input while space is held.
    pan_gesture: HandTool,
    pointer: PointerState,
    is_dragging: bool,
    space_held: bool,
}

impl Engine {
    /// Create an engine in selection mode and request the first frame.
    pub fn new(
        config: EngineConfig,
        viewport: Viewport,
        ids: Box<dyn IdSource>,
        scheduler: Box<dyn FrameScheduler>,
    ) -> EngineResult<Self> {
        config.validate()?;
        let camera = Camera::new(viewport.width, viewport.height, viewport.device_pixel_ratio)
            .with_zoom_bounds(config.min_zoom, config.max_zoom);
        let platform = match config.apple_platform {
            Some(true) => Platform::Apple,
            Some(false) => Platform::Other,
            None => Platform::default(),
        };
        let tool = ToolKind::default().create_tool()?;

        log::info!(
            "Engine created: {}x{} @{}x, {platform:?}",
            viewport.width,
            viewport.height,
            camera.device_pixel_ratio()
        );

        let mut engine = Self {
            config,
            platform,
            viewport_origin: viewport.origin,
            camera,
            store: ObjectStore::new(),
            ids,
            frames: FrameLoop::new(scheduler),
            events: EventSink::new(),
            tool,
            pan_gesture: HandTool::new(),
            pointer: PointerState::new(),
            is_dragging: false,
            space_held: false,
        };
        engine.request_redraw();
        Ok(engine)
    }

    // --- queries ---

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn objects(&self) -> &ObjectStore {
        &self.store
    }

    pub fn object(&self, id: ShapeId) -> Option<&Drawable> {
        self.store.get(id)
    }

    pub fn selected(&self) -> Option<ShapeId> {
        self.tool.selected()
    }

    pub fn editor_mode(&self) -> ToolKind {
        self.tool.kind()
    }

    /// Space-pan affordance is on.
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn zoom(&self) -> f64 {
        self.camera.zoom()
    }

    // --- subscriptions ---

    pub fn subscribe(&mut self, listener: impl FnMut(&EngineEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // --- scene ---

    /// Insert an existing drawable, e.g. when loading a scene.
    pub fn add_object(&mut self, drawable: Drawable) -> ShapeId {
        let id = self.store.insert(drawable);
        self.request_redraw();
        id
    }

    /// Merge a style patch into an object.
    ///
    /// Unknown ids are ignored and return `false`.
    pub fn change_object_style(&mut self, id: ShapeId, patch: &StylePatch) -> bool {
        let Some(object) = self.store.get_mut(id) else {
            log::debug!("Style change for unknown object {id}");
            return false;
        };
        object.style_mut().apply(patch);
        let style = object.style().clone();
        self.request_redraw();

        if self.tool.selected() == Some(id) {
            self.events.emit(EngineEvent::SelectionChanged {
                selected: Some(SelectedObject { id, style }),
            });
        }
        true
    }

    // --- modes ---

    /// Switch the active tool.
    pub fn change_editor_mode(&mut self, kind: ToolKind) -> EngineResult<()> {
        if kind == self.tool.kind() {
            return Ok(());
        }
        let tool = kind.create_tool().inspect_err(|err| {
            log::warn!("Rejected editor mode change: {err}");
        })?;

        let had_selection = self.tool.selected().is_some();
        self.tool.cancel();
        self.tool = tool;
        log::info!("Editor mode: {kind}");

        self.events.emit(EngineEvent::EditorModeChanged { mode: kind });
        if had_selection {
            self.events.emit(EngineEvent::SelectionChanged { selected: None });
        }
        self.request_redraw();
        Ok(())
    }

    /// Switch the active tool by its UI id.
    pub fn change_editor_mode_by_id(&mut self, id: &str) -> EngineResult<()> {
        let kind = id.parse::<ToolKind>().inspect_err(|err| {
            log::warn!("Rejected editor mode change: {err}");
        })?;
        self.change_editor_mode(kind)
    }

    // --- camera ---

    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let changed = self.camera.set_zoom(zoom);
        self.after_zoom(changed)
    }

    pub fn zoom_in(&mut self) -> bool {
        let changed = self.camera.zoom_in();
        self.after_zoom(changed)
    }

    pub fn zoom_out(&mut self) -> bool {
        let changed = self.camera.zoom_out();
        self.after_zoom(changed)
    }

    pub fn reset_zoom(&mut self) -> bool {
        let changed = self.camera.reset_zoom();
        self.after_zoom(changed)
    }

    /// Wheel-style zoom around a canvas-local pivot.
    pub fn zoom_at(&mut self, pivot: Point, delta_y: f64) -> bool {
        let changed = self.camera.zoom_at(pivot, delta_y);
        self.after_zoom(changed)
    }

    fn after_zoom(&mut self, changed: bool) -> bool {
        if changed {
            log::debug!("Zoom: {}", self.camera.zoom());
            self.events.emit(EngineEvent::ZoomChanged {
                zoom: self.camera.zoom(),
            });
            self.request_redraw();
        }
        changed
    }

    /// Pan by a viewport delta.
    pub fn pan(&mut self, viewport_delta: Vec2) {
        self.camera.pan(viewport_delta);
        self.request_redraw();
    }

    /// Adopt a new canvas size, position or pixel ratio.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport_origin = viewport.origin;
        self.camera
            .resize(viewport.width, viewport.height, viewport.device_pixel_ratio);
        log::debug!("Resized to {}x{}", viewport.width, viewport.height);
        self.request_redraw();
    }

    /// Move the canvas within the page without resizing it, e.g. after the
    /// page scrolled. Client coordinates are measured from this point.
    pub fn set_viewport_origin(&mut self, origin: Point) {
        self.viewport_origin = origin;
    }

    /// Top-left corner of the canvas in client coordinates.
    pub fn viewport_origin(&self) -> Point {
        self.viewport_origin
    }

    // --- input ---

    fn mouse_event(&mut self, client: Point, button: MouseButton, modifiers: Modifiers) -> MouseEventData {
        let viewport_position = client - self.viewport_origin.to_vec2();
        let movement = self.pointer.move_to(viewport_position);
        MouseEventData {
            button,
            viewport_position,
            world_position: self.camera.viewport_to_world(viewport_position),
            movement,
            world_movement: self.camera.viewport_delta_to_world(movement),
            modifiers,
        }
    }

    fn dispatch(&mut self, phase: Phase, event: &MouseEventData) {
        let mut ctx = ToolContext::new(
            &mut self.store,
            &mut self.camera,
            &self.config,
            &mut *self.ids,
            &mut self.frames,
            &mut self.events,
        );
        let tool: &mut dyn Tool = if self.is_dragging {
            &mut self.pan_gesture
        } else {
            self.tool.as_mut()
        };
        match phase {
            Phase::Down => tool.on_mouse_down(event, &mut ctx),
            Phase::Move => tool.on_mouse_move(event, &mut ctx),
            Phase::Up => tool.on_mouse_up(event, &mut ctx),
        }
    }

    pub fn handle_mouse_down(&mut self, raw: RawMouseEvent) {
        let Some(button) = MouseButton::from_dom(raw.button) else {
            return;
        };
        self.pointer.press(button);
        let modifiers = Modifiers::normalize(raw.modifiers, self.platform);
        let event = self.mouse_event(raw.client, button, modifiers);
        self.dispatch(Phase::Down, &event);
    }

    pub fn handle_mouse_move(&mut self, raw: RawMouseEvent) {
        let button = MouseButton::from_dom(raw.button).unwrap_or(MouseButton::Left);
        let modifiers = Modifiers::normalize(raw.modifiers, self.platform);
        let event = self.mouse_event(raw.client, button, modifiers);
        self.dispatch(Phase::Move, &event);
    }

    pub fn handle_mouse_up(&mut self, raw: RawMouseEvent) {
        let Some(button) = MouseButton::from_dom(raw.button) else {
            return;
        };
        self.pointer.release(button);
        let modifiers = Modifiers::normalize(raw.modifiers, self.platform);
        let event = self.mouse_event(raw.client, button, modifiers);
        self.dispatch(Phase::Up, &event);

        // Space was let go mid-gesture
        if self.is_dragging && !self.space_held && !self.pointer.any_pressed() {
            self.set_dragging(false);
        }
    }

    /// Ctrl+wheel zooms around the pointer. Returns whether the host should
    /// suppress the default scroll.
    ///
    /// Browsers report trackpad pinches as a wheel with `ctrlKey` set on
    /// every platform, so the raw Ctrl flag counts here even on Apple.
    pub fn handle_wheel(&mut self, raw: RawWheelEvent) -> bool {
        let modifiers = Modifiers::normalize(raw.modifiers, self.platform);
        if !(modifiers.ctrl || raw.modifiers.ctrl) {
            return false;
        }
        let pivot = raw.client - self.viewport_origin.to_vec2();
        self.zoom_at(pivot, raw.delta_y);
        true
    }

    /// Returns whether the key was consumed.
    pub fn handle_key_down(&mut self, raw: &RawKeyEvent) -> bool {
        if !raw.is_space() {
            return false;
        }
        if raw.repeat && self.space_held {
            return true;
        }
        self.space_held = true;
        let modifiers = Modifiers::normalize(raw.modifiers, self.platform);
        if !modifiers.ctrl && !self.pointer.any_pressed() {
            self.set_dragging(true);
        }
        true
    }

    /// Returns whether the key was consumed.
    pub fn handle_key_up(&mut self, raw: &RawKeyEvent) -> bool {
        if !raw.is_space() {
            return false;
        }
        self.space_held = false;
        if !self.pointer.any_pressed() {
            self.set_dragging(false);
        }
        true
    }

    fn set_dragging(&mut self, is_dragging: bool) {
        if self.is_dragging == is_dragging {
            return;
        }
        self.is_dragging = is_dragging;
        self.pan_gesture.cancel();
        log::debug!("Dragging: {is_dragging}");
        self.events.emit(EngineEvent::DraggingChanged { is_dragging });
    }

    /// Abandon any gesture in progress, e.g. when the window lost focus or the
    /// mouse was released outside the canvas. Nothing is rolled back.
    pub fn pointer_cancel(&mut self) {
        self.pointer.release_all();
        self.tool.cancel();
        self.pan_gesture.cancel();
        if !self.space_held {
            self.set_dragging(false);
        }
    }

    // --- rendering ---

    /// Mark the scene damaged; schedules at most one pending frame.
    pub fn request_redraw(&mut self) {
        self.frames.request_redraw();
    }

    /// Frame callback. Paints once if the scene is damaged.
    ///
    /// Returns whether anything was painted.
    pub fn on_frame(&mut self, surface: &mut dyn Surface) -> bool {
        let damaged = self.frames.begin_frame();
        if damaged {
            self.render(surface);
        }
        self.frames.end_frame();
        damaged
    }

    /// Paint the whole scene and the active tool's overlay.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear();
        surface.set_transform(self.camera.render_transform());
        for object in self.store.iter() {
            object.draw(&mut *surface);
        }

        surface.set_transform(Affine::scale(self.camera.device_pixel_ratio()));
        self.tool
            .draw_overlay(surface, &self.store, &self.camera, &self.config);
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("mode", &self.tool.kind())
            .field("camera", &self.camera)
            .field("objects", &self.store.len())
            .field("is_dragging", &self.is_dragging)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::ids::SequentialIds;
    use crate::input::RawModifiers;
    use crate::render::{DrawCommand, RecordingSurface};
    use crate::shapes::{Rectangle, SerializableColor};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use kurbo::Rect;
    use uuid::Uuid;

    struct Fixture {
        engine: Engine,
        frames: Rc<Cell<usize>>,
        events: Rc<RefCell<Vec<EngineEvent>>>,
        surface: RecordingSurface,
    }

    impl Fixture {
        fn with_config(config: EngineConfig, viewport: Viewport) -> Self {
            let frames = Rc::new(Cell::new(0));
            let counter = Rc::clone(&frames);
            let mut engine = Engine::new(
                config,
                viewport,
                Box::new(SequentialIds::new()),
                Box::new(move || counter.set(counter.get() + 1)),
            )
            .unwrap();
            let events = Rc::new(RefCell::new(Vec::new()));
            let log = Rc::clone(&events);
            engine.subscribe(move |event| log.borrow_mut().push(event.clone()));
            let mut fixture = Self {
                engine,
                frames,
                events,
                surface: RecordingSurface::new(),
            };
            fixture.frame();
            fixture.frames.set(0);
            fixture.surface.take();
            fixture
        }

        fn new() -> Self {
            Self::with_config(EngineConfig::default(), Viewport::new(800.0, 600.0, 1.0))
        }

        fn frame(&mut self) -> bool {
            self.engine.on_frame(&mut self.surface)
        }

        fn down(&mut self, x: f64, y: f64) {
            self.engine.handle_mouse_down(RawMouseEvent::new(Point::new(x, y), 0));
        }

        fn move_to(&mut self, x: f64, y: f64) {
            self.engine.handle_mouse_move(RawMouseEvent::new(Point::new(x, y), 0));
        }

        fn up(&mut self, x: f64, y: f64) {
            self.engine.handle_mouse_up(RawMouseEvent::new(Point::new(x, y), 0));
        }

        fn drag(&mut self, from: (f64, f64), to: (f64, f64)) {
            self.move_to(from.0, from.1);
            self.down(from.0, from.1);
            self.move_to(to.0, to.1);
            self.up(to.0, to.1);
        }

        fn events(&self) -> Vec<EngineEvent> {
            self.events.borrow().clone()
        }
    }

    fn space(repeat: bool) -> RawKeyEvent {
        RawKeyEvent {
            key: " ".to_string(),
            code: "Space".to_string(),
            repeat,
            modifiers: RawModifiers::default(),
        }
    }

    fn ctrl() -> RawModifiers {
        RawModifiers {
            ctrl: true,
            ..RawModifiers::default()
        }
    }

    fn wheel(x: f64, y: f64, delta_y: f64, modifiers: RawModifiers) -> RawWheelEvent {
        RawWheelEvent {
            client: Point::new(x, y),
            delta_y,
            modifiers,
        }
    }

    #[test]
    fn test_new_requests_first_frame() {
        let frames = Rc::new(Cell::new(0));
        let counter = Rc::clone(&frames);
        let mut engine = Engine::new(
            EngineConfig::default(),
            Viewport::new(800.0, 600.0, 2.0),
            Box::new(SequentialIds::new()),
            Box::new(move || counter.set(counter.get() + 1)),
        )
        .unwrap();
        assert_eq!(frames.get(), 1);
        assert_eq!(engine.editor_mode(), ToolKind::Selection);

        let mut surface = RecordingSurface::new();
        assert!(engine.on_frame(&mut surface));
        assert_eq!(
            surface.commands()[..2],
            [
                DrawCommand::Clear,
                DrawCommand::SetTransform(engine.camera().render_transform())
            ]
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EngineConfig {
            min_zoom: 0.0,
            ..EngineConfig::default()
        };
        let result = Engine::new(
            config,
            Viewport::new(800.0, 600.0, 1.0),
            Box::new(SequentialIds::new()),
            Box::new(|| {}),
        );
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_redraw_requests_coalesce() {
        let mut f = Fixture::new();
        for _ in 0..5 {
            f.engine.pan(Vec2::new(1.0, 0.0));
        }
        f.engine.zoom_in();
        assert_eq!(f.frames.get(), 1);

        assert!(f.frame());
        assert_eq!(f.surface.clear_count(), 1);
        assert!(!f.frame());
        assert_eq!(f.surface.clear_count(), 1);
        assert_eq!(f.frames.get(), 1);
    }

    #[test]
    fn test_rectangle_drag_through_engine() {
        let viewport = Viewport::new(800.0, 600.0, 1.0).with_origin(Point::new(50.0, 20.0));
        let mut f = Fixture::with_config(EngineConfig::default(), viewport);
        f.engine.change_editor_mode(ToolKind::Rectangle).unwrap();

        // Canvas-local (450, 320) is world (50, 20)
        f.drag((500.0, 340.0), (560.0, 380.0));

        assert_eq!(f.engine.objects().len(), 1);
        let id = SequentialIds::nth(1);
        let bounds = f.engine.object(id).unwrap().bounds();
        assert!((bounds.x0 - 50.0).abs() < 1e-9);
        assert!((bounds.y0 - 20.0).abs() < 1e-9);
        assert!((bounds.width() - 60.0).abs() < 1e-9);
        assert!((bounds.height() - 40.0).abs() < 1e-9);

        assert!(f.frame());
        let rects = f.surface.rectangles();
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].0, Rect::new(50.0, 20.0, 110.0, 60.0));
    }

    #[test]
    fn test_click_without_drag_creates_nothing() {
        let mut f = Fixture::new();
        f.engine.change_editor_mode(ToolKind::Rectangle).unwrap();
        f.drag((100.0, 100.0), (104.0, 103.0));
        assert!(f.engine.objects().is_empty());
    }

    #[test]
    fn test_select_and_restyle() {
        let mut f = Fixture::new();
        let id = f.engine.add_object(
            Rectangle::new(Uuid::from_u128(7), 3, Point::new(-50.0, -50.0), 100.0, 100.0).into(),
        );
        f.down(400.0, 300.0);
        f.up(400.0, 300.0);
        assert_eq!(f.engine.selected(), Some(id));

        let red = SerializableColor::new(255, 0, 0, 255);
        let patch = StylePatch {
            stroke: Some(Some(red)),
            ..StylePatch::default()
        };
        assert!(f.engine.change_object_style(id, &patch));
        assert_eq!(f.engine.object(id).unwrap().style().stroke, Some(red));
        match f.events().last() {
            Some(EngineEvent::SelectionChanged {
                selected: Some(selected),
            }) => {
                assert_eq!(selected.id, id);
                assert_eq!(selected.style.stroke, Some(red));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_restyle_unknown_object_is_noop() {
        let mut f = Fixture::new();
        let patch = StylePatch {
            opacity: Some(0.5),
            ..StylePatch::default()
        };
        assert!(!f.engine.change_object_style(Uuid::from_u128(404), &patch));
        assert_eq!(f.frames.get(), 0);
        assert!(f.events().is_empty());
    }

    #[test]
    fn test_restyle_unselected_object_emits_nothing() {
        let mut f = Fixture::new();
        let id = f.engine.add_object(
            Rectangle::new(Uuid::from_u128(7), 3, Point::new(500.0, 500.0), 10.0, 10.0).into(),
        );
        let patch = StylePatch {
            opacity: Some(0.5),
            ..StylePatch::default()
        };
        assert!(f.engine.change_object_style(id, &patch));
        assert!(f.events().is_empty());
    }

    #[test]
    fn test_space_drag_pans_in_any_mode() {
        let mut f = Fixture::new();
        f.engine.change_editor_mode(ToolKind::Rectangle).unwrap();
        f.events.borrow_mut().clear();

        assert!(f.engine.handle_key_down(&space(false)));
        assert!(f.engine.is_dragging());
        assert!(f.engine.handle_key_down(&space(true)));
        assert_eq!(
            f.events(),
            vec![EngineEvent::DraggingChanged { is_dragging: true }]
        );

        f.drag((100.0, 100.0), (140.0, 120.0));
        assert!(f.engine.objects().is_empty());
        assert!((f.engine.camera().position.x - -40.0).abs() < 1e-9);
        assert!((f.engine.camera().position.y - -20.0).abs() < 1e-9);

        f.engine.handle_key_up(&space(false));
        assert!(!f.engine.is_dragging());
        assert_eq!(
            f.events().last(),
            Some(&EngineEvent::DraggingChanged { is_dragging: false })
        );
    }

    #[test]
    fn test_space_repeat_does_not_restart_pan() {
        let mut f = Fixture::new();
        f.down(100.0, 100.0);
        assert!(f.engine.handle_key_down(&space(false)));
        assert!(!f.engine.is_dragging());
        f.up(100.0, 100.0);

        // Held space keeps repeating after the button is released
        assert!(f.engine.handle_key_down(&space(true)));
        assert!(f.engine.handle_key_down(&space(true)));
        assert!(!f.engine.is_dragging());
        assert!(f.events().iter().all(|e| !matches!(e, EngineEvent::DraggingChanged { .. })));

        f.engine.handle_key_up(&space(false));
        assert!(f.engine.handle_key_down(&space(false)));
        assert!(f.engine.is_dragging());
    }

    #[test]
    fn test_space_ignored_with_ctrl_or_pressed_button() {
        let mut f = Fixture::new();
        let mut key = space(false);
        key.modifiers = ctrl();
        f.engine.handle_key_down(&key);
        assert!(!f.engine.is_dragging());
        f.engine.handle_key_up(&space(false));

        f.down(100.0, 100.0);
        f.engine.handle_key_down(&space(false));
        assert!(!f.engine.is_dragging());
        assert!(f.events().iter().all(|e| !matches!(e, EngineEvent::DraggingChanged { .. })));
    }

    #[test]
    fn test_space_released_mid_drag_ends_on_mouse_up() {
        let mut f = Fixture::new();
        f.engine.handle_key_down(&space(false));
        f.down(100.0, 100.0);
        f.engine.handle_key_up(&space(false));
        assert!(f.engine.is_dragging());

        f.move_to(110.0, 100.0);
        assert!((f.engine.camera().position.x - -10.0).abs() < 1e-9);
        f.up(110.0, 100.0);
        assert!(!f.engine.is_dragging());
    }

    #[test]
    fn test_wheel_requires_ctrl() {
        let mut f = Fixture::new();
        assert!(!f.engine.handle_wheel(wheel(400.0, 300.0, -100.0, RawModifiers::default())));
        assert!((f.engine.zoom() - 1.0).abs() < f64::EPSILON);

        assert!(f.engine.handle_wheel(wheel(400.0, 300.0, -100.0, ctrl())));
        assert!(f.engine.zoom() > 1.0);
        assert_eq!(
            f.events(),
            vec![EngineEvent::ZoomChanged {
                zoom: f.engine.zoom()
            }]
        );
    }

    #[test]
    fn test_wheel_zoom_keeps_pointer_world_point() {
        let viewport = Viewport::new(800.0, 600.0, 2.0).with_origin(Point::new(10.0, 10.0));
        let mut f = Fixture::with_config(EngineConfig::default(), viewport);
        let pivot = Point::new(200.0, 100.0);
        let before = f.engine.camera().viewport_to_world(pivot);
        f.engine
            .handle_wheel(wheel(pivot.x + 10.0, pivot.y + 10.0, -60.0, ctrl()));
        let after = f.engine.camera().viewport_to_world(pivot);
        assert!((after - before).hypot() < 1e-6);
    }

    #[test]
    fn test_apple_uses_cmd_for_zoom() {
        let config = EngineConfig {
            apple_platform: Some(true),
            ..EngineConfig::default()
        };
        let mut f = Fixture::with_config(config, Viewport::new(800.0, 600.0, 1.0));
        let cmd = RawModifiers {
            meta: true,
            ..RawModifiers::default()
        };
        assert!(f.engine.handle_wheel(wheel(400.0, 300.0, -100.0, cmd)));
        assert!(f.engine.zoom() > 1.0);
    }

    #[test]
    fn test_apple_pinch_reports_ctrl_wheel() {
        let config = EngineConfig {
            apple_platform: Some(true),
            ..EngineConfig::default()
        };
        let mut f = Fixture::with_config(config, Viewport::new(800.0, 600.0, 1.0));
        assert!(f.engine.handle_wheel(wheel(400.0, 300.0, -100.0, ctrl())));
        assert!(f.engine.zoom() > 1.0);

        let zoom = f.engine.zoom();
        assert!(!f.engine.handle_wheel(wheel(400.0, 300.0, -100.0, RawModifiers::default())));
        assert!((f.engine.zoom() - zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_controls() {
        let mut f = Fixture::new();
        assert!(f.engine.zoom_in());
        assert!((f.engine.zoom() - 1.1).abs() < 1e-9);
        assert!(f.engine.set_zoom(50.0));
        assert!((f.engine.zoom() - 10.0).abs() < 1e-9);
        assert!(!f.engine.set_zoom(12.0));
        assert!(f.engine.reset_zoom());
        assert!((f.engine.zoom() - 1.0).abs() < 1e-9);
        assert!(f.engine.zoom_out());
        assert!((f.engine.zoom() - 0.9).abs() < 1e-9);
        assert_eq!(f.events().len(), 4);
    }

    #[test]
    fn test_unsupported_mode_is_rejected() {
        let mut f = Fixture::new();
        let err = f.engine.change_editor_mode(ToolKind::Ellipse).unwrap_err();
        assert_eq!(err, EngineError::UnsupportedTool("ellipse".to_string()));
        assert_eq!(f.engine.editor_mode(), ToolKind::Selection);
        assert!(f.events().is_empty());

        assert!(matches!(
            f.engine.change_editor_mode_by_id("lasso"),
            Err(EngineError::UnknownTool(_))
        ));
        f.engine.change_editor_mode_by_id("hand").unwrap();
        assert_eq!(f.engine.editor_mode(), ToolKind::Hand);
        assert_eq!(
            f.events(),
            vec![EngineEvent::EditorModeChanged {
                mode: ToolKind::Hand
            }]
        );
    }

    #[test]
    fn test_mode_switch_drops_selection() {
        let mut f = Fixture::new();
        let id = f.engine.add_object(
            Rectangle::new(Uuid::from_u128(7), 3, Point::new(-50.0, -50.0), 100.0, 100.0).into(),
        );
        f.down(400.0, 300.0);
        f.up(400.0, 300.0);
        assert_eq!(f.engine.selected(), Some(id));

        f.engine.change_editor_mode(ToolKind::Rectangle).unwrap();
        assert_eq!(f.engine.selected(), None);
        assert_eq!(
            f.events().last(),
            Some(&EngineEvent::SelectionChanged { selected: None })
        );
    }

    #[test]
    fn test_pointer_cancel_abandons_gesture() {
        let mut f = Fixture::new();
        f.engine.change_editor_mode(ToolKind::Rectangle).unwrap();
        f.down(100.0, 100.0);
        f.move_to(150.0, 150.0);
        f.engine.pointer_cancel();
        f.move_to(300.0, 300.0);

        let bounds = f.engine.object(SequentialIds::nth(1)).unwrap().bounds();
        assert!((bounds.width() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_render_draws_overlay_in_viewport_space() {
        let viewport = Viewport::new(800.0, 600.0, 2.0);
        let mut f = Fixture::with_config(EngineConfig::default(), viewport);
        f.engine.add_object(
            Rectangle::new(Uuid::from_u128(7), 3, Point::new(-50.0, -50.0), 100.0, 100.0).into(),
        );
        f.down(400.0, 300.0);
        f.up(400.0, 300.0);
        assert!(f.frame());

        let commands = f.surface.commands();
        assert_eq!(commands[0], DrawCommand::Clear);
        assert_eq!(
            commands[1],
            DrawCommand::SetTransform(f.engine.camera().render_transform())
        );
        assert!(matches!(commands[2], DrawCommand::Rectangle { .. }));
        assert_eq!(commands[3], DrawCommand::SetTransform(Affine::scale(2.0)));
        match &commands[4] {
            DrawCommand::StrokeRect { rect, color, .. } => {
                assert_eq!(*rect, Rect::new(344.0, 244.0, 456.0, 356.0));
                assert_eq!(*color, f.engine.config().selection_color);
            }
            other => panic!("expected selection outline, got {other:?}"),
        }
    }

    #[test]
    fn test_resize_updates_camera() {
        let mut f = Fixture::new();
        f.engine
            .resize(Viewport::new(1000.0, 500.0, 2.0).with_origin(Point::new(5.0, 5.0)));
        assert!((f.engine.camera().device_pixel_ratio() - 2.0).abs() < f64::EPSILON);
        assert_eq!(f.engine.camera().viewport_to_world(Point::new(500.0, 250.0)), Point::ZERO);
        assert_eq!(f.frames.get(), 1);
    }

    #[test]
    fn test_viewport_origin_follows_page_scroll() {
        let viewport = Viewport::new(800.0, 600.0, 1.0).with_origin(Point::new(50.0, 20.0));
        let mut f = Fixture::with_config(EngineConfig::default(), viewport);
        f.engine.change_editor_mode(ToolKind::Rectangle).unwrap();

        // Page scrolled down by 100px, canvas moved up in client space
        f.engine.set_viewport_origin(Point::new(50.0, -80.0));
        assert_eq!(f.engine.viewport_origin(), Point::new(50.0, -80.0));
        f.drag((500.0, 240.0), (560.0, 280.0));

        let id = SequentialIds::nth(1);
        let bounds = f.engine.object(id).unwrap().bounds();
        assert!((bounds.x0 - 50.0).abs() < 1e-9);
        assert!((bounds.y0 - 20.0).abs() < 1e-9);
        assert!((bounds.width() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsubscribe_stops_events() {
        let mut f = Fixture::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let id = f.engine.subscribe(move |_| counter.set(counter.get() + 1));
        f.engine.zoom_in();
        assert!(f.engine.unsubscribe(id));
        f.engine.zoom_in();
        assert_eq!(count.get(), 1);
    }
}
