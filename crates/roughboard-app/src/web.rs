//! WebAssembly entry point and page bindings.

use crate::bridge::{finite, is_editable_tag, parse_object_id};
use crate::canvas2d::Canvas2dSurface;
use crate::error::{AppError, AppResult};
use crate::layout::CanvasLayout;
use kurbo::{Point, Vec2};
use roughboard_core::{
    Engine, EngineConfig, EngineEvent, FrameScheduler, Platform, RandomIds, RawKeyEvent,
    RawModifiers, RawMouseEvent, RawWheelEvent, StylePatch,
};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, HtmlElement, KeyboardEvent,
    MouseEvent, WheelEvent, Window,
};

/// Initialize panic reporting and logging.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to initialize logger");
}

/// A DOM listener that unregisters itself when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        kind: &'static str,
        options: Option<&AddEventListenerOptions>,
        handler: impl FnMut(Event) + 'static,
    ) -> AppResult<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        match options {
            Some(options) => target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                options,
            )?,
            None => target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?,
        }
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

struct Inner {
    engine: Engine,
    surface: Canvas2dSurface,
}

/// State shared between the exported handle, DOM listeners and frame callbacks.
struct Shell {
    window: Window,
    canvas: HtmlCanvasElement,
    container: HtmlElement,
    state: RefCell<Option<Inner>>,
    /// Engine events waiting to be delivered to page subscribers.
    queue: Rc<RefCell<Vec<EngineEvent>>>,
    subscribers: RefCell<Vec<(u32, js_sys::Function)>>,
    next_subscriber: Cell<u32>,
    frame_handle: Cell<Option<i32>>,
    listeners: RefCell<Vec<Listener>>,
}

impl Shell {
    /// Run `f` against the engine, then deliver any events it produced.
    ///
    /// Returns `None` once the engine is destroyed or while it is busy.
    fn with_engine<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> Option<R> {
        let result = match self.state.try_borrow_mut() {
            Ok(mut state) => state.as_mut().map(f),
            Err(_) => {
                log::warn!("Engine re-entered from an event handler; call ignored");
                None
            }
        };
        self.flush_events();
        result
    }

    fn flush_events(&self) {
        let events = std::mem::take(&mut *self.queue.borrow_mut());
        if events.is_empty() {
            return;
        }
        let subscribers = self.subscribers.borrow().clone();
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        for event in &events {
            let value = match event.serialize(&serializer) {
                Ok(value) => value,
                Err(err) => {
                    log::error!("Failed to serialize {event:?}: {err}");
                    continue;
                }
            };
            for (_, callback) in &subscribers {
                if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                    log::warn!("Event subscriber threw: {err:?}");
                }
            }
        }
    }

    fn on_frame(&self) {
        self.frame_handle.set(None);
        self.with_engine(|inner| {
            inner.engine.on_frame(&mut inner.surface);
        });
    }

    fn layout(&self) -> CanvasLayout {
        CanvasLayout::compute(
            f64::from(self.container.client_width()),
            f64::from(self.container.client_height()),
            self.window.device_pixel_ratio(),
        )
    }

    /// Size the canvas element and its backing store to the container.
    fn fit_canvas(&self) -> AppResult<CanvasLayout> {
        let layout = self.layout();
        let (width, height) = layout.css_size();
        let style = self.canvas.style();
        style.set_property("width", &width)?;
        style.set_property("height", &height)?;
        self.canvas.set_width(layout.backing_width);
        self.canvas.set_height(layout.backing_height);
        Ok(layout)
    }

    /// Canvas corner in client coordinates. Read per event since page
    /// scrolling moves it without a resize.
    fn canvas_origin(&self) -> Point {
        let bounds = self.canvas.get_bounding_client_rect();
        Point::new(bounds.left(), bounds.top())
    }

    fn resize(&self) -> AppResult<()> {
        let layout = self.fit_canvas()?;
        let viewport = layout.viewport(self.canvas_origin());
        self.with_engine(|inner| inner.engine.resize(viewport));
        Ok(())
    }

    fn destroy(&self) {
        self.listeners.borrow_mut().clear();
        if let Some(handle) = self.frame_handle.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
        self.subscribers.borrow_mut().clear();
        self.queue.borrow_mut().clear();
        let released = match self.state.try_borrow_mut() {
            Ok(mut state) => state.take().is_some(),
            Err(_) => false,
        };
        if released {
            log::info!("Engine destroyed");
        }
    }
}

/// Schedules engine frames with `requestAnimationFrame`.
struct RafScheduler {
    shell: Weak<Shell>,
}

impl FrameScheduler for RafScheduler {
    fn schedule_frame(&mut self) {
        let Some(shell) = self.shell.upgrade() else {
            return;
        };
        let weak = self.shell.clone();
        let callback = Closure::once_into_js(move |_timestamp: f64| {
            if let Some(shell) = weak.upgrade() {
                shell.on_frame();
            }
        });
        match shell.window.request_animation_frame(callback.unchecked_ref()) {
            Ok(handle) => shell.frame_handle.set(Some(handle)),
            Err(err) => log::warn!("requestAnimationFrame failed: {err:?}"),
        }
    }
}

fn raw_modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> RawModifiers {
    RawModifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn raw_mouse(event: &MouseEvent) -> RawMouseEvent {
    RawMouseEvent::new(
        Point::new(f64::from(event.client_x()), f64::from(event.client_y())),
        event.button(),
    )
    .with_modifiers(raw_modifiers(
        event.shift_key(),
        event.ctrl_key(),
        event.alt_key(),
        event.meta_key(),
    ))
}

fn raw_wheel(event: &WheelEvent) -> RawWheelEvent {
    RawWheelEvent {
        client: Point::new(f64::from(event.client_x()), f64::from(event.client_y())),
        delta_y: event.delta_y(),
        modifiers: raw_modifiers(
            event.shift_key(),
            event.ctrl_key(),
            event.alt_key(),
            event.meta_key(),
        ),
    }
}

fn raw_key(event: &KeyboardEvent) -> RawKeyEvent {
    RawKeyEvent {
        key: event.key(),
        code: event.code(),
        repeat: event.repeat(),
        modifiers: raw_modifiers(
            event.shift_key(),
            event.ctrl_key(),
            event.alt_key(),
            event.meta_key(),
        ),
    }
}

fn targets_editable(event: &Event) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .is_some_and(|element| is_editable_tag(&element.tag_name()))
}

/// Attach the canvas and window listeners.
fn bind(shell: &Rc<Shell>) -> AppResult<Vec<Listener>> {
    let canvas: &EventTarget = shell.canvas.as_ref();
    let window: &EventTarget = shell.window.as_ref();
    let mut listeners = Vec::new();

    let weak = Rc::downgrade(shell);
    listeners.push(Listener::new(canvas, "mousedown", None, move |event| {
        let (Some(shell), Some(event)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>()) else {
            return;
        };
        let origin = shell.canvas_origin();
        shell.with_engine(|inner| {
            inner.engine.set_viewport_origin(origin);
            inner.engine.handle_mouse_down(raw_mouse(event));
        });
    })?);

    let weak = Rc::downgrade(shell);
    listeners.push(Listener::new(canvas, "mousemove", None, move |event| {
        let (Some(shell), Some(event)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>()) else {
            return;
        };
        let origin = shell.canvas_origin();
        shell.with_engine(|inner| {
            inner.engine.set_viewport_origin(origin);
            inner.engine.handle_mouse_move(raw_mouse(event));
        });
    })?);

    let weak = Rc::downgrade(shell);
    listeners.push(Listener::new(canvas, "mouseup", None, move |event| {
        let (Some(shell), Some(event)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>()) else {
            return;
        };
        let origin = shell.canvas_origin();
        shell.with_engine(|inner| {
            inner.engine.set_viewport_origin(origin);
            inner.engine.handle_mouse_up(raw_mouse(event));
        });
    })?);

    let wheel_options = AddEventListenerOptions::new();
    wheel_options.set_passive(false);
    let weak = Rc::downgrade(shell);
    listeners.push(Listener::new(canvas, "wheel", Some(&wheel_options), move |event| {
        let (Some(shell), Some(wheel)) = (weak.upgrade(), event.dyn_ref::<WheelEvent>()) else {
            return;
        };
        let origin = shell.canvas_origin();
        let handled = shell
            .with_engine(|inner| {
                inner.engine.set_viewport_origin(origin);
                inner.engine.handle_wheel(raw_wheel(wheel))
            })
            .unwrap_or(false);
        if handled {
            event.prevent_default();
        }
    })?);

    listeners.push(Listener::new(canvas, "contextmenu", None, |event| {
        event.prevent_default();
    })?);

    let weak = Rc::downgrade(shell);
    listeners.push(Listener::new(window, "keydown", None, move |event| {
        let Some(shell) = weak.upgrade() else {
            return;
        };
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if targets_editable(&event) {
            return;
        }
        let consumed = shell
            .with_engine(|inner| inner.engine.handle_key_down(&raw_key(key)))
            .unwrap_or(false);
        if consumed {
            event.prevent_default();
        }
    })?);

    let weak = Rc::downgrade(shell);
    listeners.push(Listener::new(window, "keyup", None, move |event| {
        let Some(shell) = weak.upgrade() else {
            return;
        };
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if targets_editable(&event) {
            return;
        }
        let consumed = shell
            .with_engine(|inner| inner.engine.handle_key_up(&raw_key(key)))
            .unwrap_or(false);
        if consumed {
            event.prevent_default();
        }
    })?);

    // Releases outside the canvas end the gesture without a mouse-up
    let weak = Rc::downgrade(shell);
    listeners.push(Listener::new(window, "mouseup", None, move |event| {
        let Some(shell) = weak.upgrade() else {
            return;
        };
        let on_canvas = event
            .target()
            .is_some_and(|target| js_sys::Object::is(&target, &shell.canvas));
        if !on_canvas {
            shell.with_engine(|inner| inner.engine.pointer_cancel());
        }
    })?);

    let weak = Rc::downgrade(shell);
    listeners.push(Listener::new(window, "blur", None, move |_| {
        if let Some(shell) = weak.upgrade() {
            shell.with_engine(|inner| inner.engine.pointer_cancel());
        }
    })?);

    let weak = Rc::downgrade(shell);
    listeners.push(Listener::new(window, "resize", None, move |_| {
        let Some(shell) = weak.upgrade() else {
            return;
        };
        if let Err(err) = shell.resize() {
            log::warn!("Resize failed: {err}");
        }
    })?);

    Ok(listeners)
}

fn detect_platform(window: &Window) -> Platform {
    window
        .navigator()
        .platform()
        .map(|platform| Platform::detect(&platform))
        .unwrap_or_default()
}

/// Whiteboard engine bound to a canvas element.
#[wasm_bindgen]
pub struct RoughboardEngine {
    shell: Rc<Shell>,
}

#[wasm_bindgen]
impl RoughboardEngine {
    /// Bind to `canvas`, sized to fill `container`.
    ///
    /// `config` is an optional object with camelCase engine settings.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        container: HtmlElement,
        config: JsValue,
    ) -> Result<RoughboardEngine, JsValue> {
        Ok(Self::create(canvas, container, config)?)
    }

    #[wasm_bindgen(js_name = changeEditorMode)]
    pub fn change_editor_mode(&self, id: &str) -> Result<(), JsValue> {
        match self
            .shell
            .with_engine(|inner| inner.engine.change_editor_mode_by_id(id))
        {
            Some(result) => Ok(result.map_err(AppError::from)?),
            None => Ok(()),
        }
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&self, zoom: f64) -> Result<bool, JsValue> {
        let zoom = finite("zoom", zoom)?;
        Ok(self
            .shell
            .with_engine(|inner| inner.engine.set_zoom(zoom))
            .unwrap_or(false))
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) -> bool {
        self.shell
            .with_engine(|inner| inner.engine.zoom_in())
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) -> bool {
        self.shell
            .with_engine(|inner| inner.engine.zoom_out())
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&self) -> bool {
        self.shell
            .with_engine(|inner| inner.engine.reset_zoom())
            .unwrap_or(false)
    }

    /// Wheel-style zoom around a point in canvas CSS pixels.
    #[wasm_bindgen(js_name = zoomAt)]
    pub fn zoom_at(&self, x: f64, y: f64, delta_y: f64) -> Result<bool, JsValue> {
        let pivot = Point::new(finite("x", x)?, finite("y", y)?);
        let delta_y = finite("deltaY", delta_y)?;
        Ok(self
            .shell
            .with_engine(|inner| inner.engine.zoom_at(pivot, delta_y))
            .unwrap_or(false))
    }

    /// Pan by a delta in canvas CSS pixels.
    pub fn pan(&self, dx: f64, dy: f64) -> Result<(), JsValue> {
        let delta = Vec2::new(finite("dx", dx)?, finite("dy", dy)?);
        self.shell.with_engine(|inner| inner.engine.pan(delta));
        Ok(())
    }

    /// Apply a partial style to an object. Returns false for unknown ids.
    #[wasm_bindgen(js_name = changeObjectStyle)]
    pub fn change_object_style(&self, id: &str, patch: JsValue) -> Result<bool, JsValue> {
        let id = parse_object_id(id)?;
        let patch: StylePatch = serde_wasm_bindgen::from_value(patch)
            .map_err(|err| AppError::InvalidArgument(format!("style: {err}")))?;
        Ok(self
            .shell
            .with_engine(|inner| inner.engine.change_object_style(id, &patch))
            .unwrap_or(false))
    }

    /// Register `callback` for engine events. Returns an id for `unsubscribe`.
    pub fn subscribe(&self, callback: js_sys::Function) -> u32 {
        let id = self.shell.next_subscriber.get();
        self.shell.next_subscriber.set(id.wrapping_add(1));
        self.shell.subscribers.borrow_mut().push((id, callback));
        id
    }

    pub fn unsubscribe(&self, id: u32) -> bool {
        let mut subscribers = self.shell.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// Refit the canvas after its container changed size.
    pub fn resize(&self) -> Result<(), JsValue> {
        Ok(self.shell.resize()?)
    }

    /// Detach every listener and release the engine.
    pub fn destroy(&self) {
        self.shell.destroy();
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.shell
            .with_engine(|inner| inner.engine.zoom())
            .unwrap_or(1.0)
    }

    #[wasm_bindgen(getter, js_name = editorMode)]
    pub fn editor_mode(&self) -> String {
        self.shell
            .with_engine(|inner| inner.engine.editor_mode().to_string())
            .unwrap_or_default()
    }

    #[wasm_bindgen(getter, js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.shell
            .with_engine(|inner| inner.engine.is_dragging())
            .unwrap_or(false)
    }

    /// Id of the selected object, if any.
    #[wasm_bindgen(getter)]
    pub fn selected(&self) -> Option<String> {
        self.shell
            .with_engine(|inner| inner.engine.selected())
            .flatten()
            .map(|id| id.to_string())
    }
}

impl RoughboardEngine {
    fn create(
        canvas: HtmlCanvasElement,
        container: HtmlElement,
        config: JsValue,
    ) -> AppResult<RoughboardEngine> {
        let window = web_sys::window().ok_or(AppError::NoWindow)?;
        window.document().ok_or(AppError::NoDocument)?;

        let mut config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|err| AppError::InvalidArgument(format!("config: {err}")))?
        };
        if config.apple_platform.is_none() {
            config.apple_platform = Some(detect_platform(&window) == Platform::Apple);
        }

        let surface = Canvas2dSurface::new(canvas.clone())?;
        let shell = Rc::new(Shell {
            window,
            canvas,
            container,
            state: RefCell::new(None),
            queue: Rc::new(RefCell::new(Vec::new())),
            subscribers: RefCell::new(Vec::new()),
            next_subscriber: Cell::new(1),
            frame_handle: Cell::new(None),
            listeners: RefCell::new(Vec::new()),
        });

        let layout = shell.fit_canvas()?;
        let scheduler = RafScheduler {
            shell: Rc::downgrade(&shell),
        };
        let mut engine = Engine::new(
            config,
            layout.viewport(shell.canvas_origin()),
            Box::new(RandomIds),
            Box::new(scheduler),
        )?;
        let queue = Rc::clone(&shell.queue);
        engine.subscribe(move |event| queue.borrow_mut().push(event.clone()));
        *shell.state.borrow_mut() = Some(Inner { engine, surface });

        let listeners = bind(&shell)?;
        *shell.listeners.borrow_mut() = listeners;

        Ok(RoughboardEngine { shell })
    }
}

impl Drop for RoughboardEngine {
    fn drop(&mut self) {
        self.shell.destroy();
    }
}
