//! Input normalization for mouse, wheel and keyboard events.
//!
//! Hosts translate their native events into the `Raw*` types; the engine
//! turns those into [`MouseEventData`] for the tools.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` index. Back/forward buttons map to `None`.
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }
}

/// Host platform, as far as modifier handling cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Cmd plays the role of Ctrl.
    Apple,
    #[default]
    Other,
}

impl Platform {
    /// Detect from a `navigator.platform`-style string.
    pub fn detect(platform: &str) -> Self {
        let platform = platform.to_ascii_uppercase();
        if ["MAC", "IPHONE", "IPAD"].iter().any(|p| platform.contains(p)) {
            Platform::Apple
        } else {
            Platform::Other
        }
    }
}

/// Modifier keys exactly as the host reported them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Platform-normalized modifier state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Ctrl, or Cmd on Apple platforms.
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn normalize(raw: RawModifiers, platform: Platform) -> Self {
        let ctrl = match platform {
            Platform::Apple => raw.meta,
            Platform::Other => raw.ctrl,
        };
        Self {
            ctrl,
            shift: raw.shift,
            alt: raw.alt,
        }
    }
}

/// A mouse event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMouseEvent {
    /// Position in client (page viewport) coordinates.
    pub client: Point,
    /// DOM-style button index (0 left, 1 middle, 2 right).
    pub button: i16,
    pub modifiers: RawModifiers,
}

impl RawMouseEvent {
    pub fn new(client: Point, button: i16) -> Self {
        Self {
            client,
            button,
            modifiers: RawModifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: RawModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A wheel event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawWheelEvent {
    pub client: Point,
    pub delta_y: f64,
    pub modifiers: RawModifiers,
}

/// A key event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyEvent {
    /// `KeyboardEvent.key`.
    pub key: String,
    /// `KeyboardEvent.code`.
    pub code: String,
    /// Auto-repeat from a held key.
    pub repeat: bool,
    pub modifiers: RawModifiers,
}

impl RawKeyEvent {
    pub fn is_space(&self) -> bool {
        self.code == "Space" || self.key == " "
    }
}

/// What every tool callback receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEventData {
    pub button: MouseButton,
    /// Canvas-local position in CSS pixels.
    pub viewport_position: Point,
    /// Same position in world coordinates.
    pub world_position: Point,
    /// Viewport movement since the previous pointer event.
    pub movement: Vec2,
    /// `movement` converted to world units.
    pub world_movement: Vec2,
    pub modifiers: Modifiers,
}

/// Engine-side pointer bookkeeping: pressed buttons and last position.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Last pointer position in viewport coordinates.
    last_position: Option<Point>,
    /// Currently pressed mouse buttons.
    pressed_buttons: HashSet<MouseButton>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new position and return the movement since the last one.
    pub fn move_to(&mut self, position: Point) -> Vec2 {
        let movement = self
            .last_position
            .map(|last| position - last)
            .unwrap_or(Vec2::ZERO);
        self.last_position = Some(position);
        movement
    }

    pub fn press(&mut self, button: MouseButton) {
        self.pressed_buttons.insert(button);
    }

    /// Returns whether the button was held.
    pub fn release(&mut self, button: MouseButton) -> bool {
        self.pressed_buttons.remove(&button)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    pub fn any_pressed(&self) -> bool {
        !self.pressed_buttons.is_empty()
    }

    /// Forget held buttons, e.g. after the pointer left the window.
    pub fn release_all(&mut self) {
        self.pressed_buttons.clear();
    }
}
