//! Camera module for pan/zoom transforms.
//!
//! Viewport coordinates are CSS pixels relative to the drawing surface's
//! top-left corner. World coordinates are the zoom/pan independent space the
//! drawables live in. `position` is the world point shown at the centre of
//! the viewport, so a fresh camera puts the world origin in the middle of the
//! screen.

use crate::math::round_to;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Lowest zoom reachable by any code path.
pub const MIN_ZOOM: f64 = 0.1;
/// Highest zoom reachable by any code path.
pub const MAX_ZOOM: f64 = 10.0;
/// Zoom increment used by the stepped controls and to cap wheel deltas.
pub const ZOOM_STEP: f64 = 0.1;
/// Zoom that corresponds to "100%" in the UI.
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Camera manages the view transform for the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// World point under the viewport centre.
    pub position: Point,
    /// Current zoom level. Always inside `[min_zoom, max_zoom]`.
    zoom: f64,
    /// Minimum allowed zoom level.
    min_zoom: f64,
    /// Maximum allowed zoom level.
    max_zoom: f64,
    /// Viewport width in CSS pixels.
    client_width: f64,
    /// Viewport height in CSS pixels.
    client_height: f64,
    /// Backing-store pixels per CSS pixel.
    device_pixel_ratio: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            client_width: 0.0,
            client_height: 0.0,
            device_pixel_ratio: 1.0,
        }
    }
}

impl Camera {
    /// Create a camera for a viewport of the given CSS size.
    pub fn new(client_width: f64, client_height: f64, device_pixel_ratio: f64) -> Self {
        let mut camera = Self::default();
        camera.resize(client_width, client_height, device_pixel_ratio);
        camera
    }

    /// Replace the zoom bounds, re-clamping the current zoom.
    ///
    /// Bounds are expected to be validated already (see `EngineConfig::validate`).
    pub fn with_zoom_bounds(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self
    }

    /// Update viewport size and device pixel ratio.
    pub fn resize(&mut self, client_width: f64, client_height: f64, device_pixel_ratio: f64) {
        self.client_width = client_width.max(0.0);
        self.client_height = client_height.max(0.0);
        self.device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_bounds(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Viewport size in CSS pixels.
    pub fn client_size(&self) -> kurbo::Size {
        kurbo::Size::new(self.client_width, self.client_height)
    }

    /// Centre of the viewport in CSS pixels.
    fn center(&self) -> Vec2 {
        Vec2::new(self.client_width / 2.0, self.client_height / 2.0)
    }

    /// World → viewport (CSS pixel) transform.
    pub fn view_transform(&self) -> Affine {
        Affine::translate(self.center())
            * Affine::scale(self.zoom)
            * Affine::translate(-self.position.to_vec2())
    }

    /// World → backing-store pixel transform applied to the drawing context
    /// before the scene is painted.
    ///
    /// Equivalent to: identity, scale by device pixel ratio, translate to the
    /// viewport centre, scale by zoom, translate by `-position`.
    pub fn render_transform(&self) -> Affine {
        Affine::scale(self.device_pixel_ratio) * self.view_transform()
    }

    /// Convert a viewport point (CSS pixels) to world coordinates.
    pub fn viewport_to_world(&self, viewport_point: Point) -> Point {
        let dpr = self.device_pixel_ratio;
        let device = Point::new(viewport_point.x * dpr, viewport_point.y * dpr);
        self.render_transform().inverse() * device
    }

    /// Convert a world point to viewport coordinates (CSS pixels).
    pub fn world_to_viewport(&self, world_point: Point) -> Point {
        let dpr = self.device_pixel_ratio;
        let device = self.render_transform() * world_point;
        Point::new(device.x / dpr, device.y / dpr)
    }

    /// Convert a viewport-space displacement to world space.
    pub fn viewport_delta_to_world(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    /// Pan the camera by a delta in viewport coordinates.
    ///
    /// The delta is added to `position` after dividing by zoom. Callers that
    /// follow the pointer pass the negated pointer movement.
    pub fn pan(&mut self, viewport_delta: Vec2) {
        self.position += self.viewport_delta_to_world(viewport_delta);
    }

    /// Zoom from a wheel delta, keeping the world point under `pivot` fixed.
    ///
    /// Returns whether the zoom changed.
    pub fn zoom_at(&mut self, pivot: Point, delta_y: f64) -> bool {
        let new_zoom = self.wheel_zoom(delta_y);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let anchor = self.viewport_to_world(pivot);
        self.zoom = new_zoom;

        // Shift so the anchor lands back under the pivot
        let drift = anchor - self.viewport_to_world(pivot);
        self.position += drift;
        true
    }

    /// Zoom level a wheel delta would produce from the current zoom.
    ///
    /// The raw delta is capped at `ZOOM_STEP * 100`, and a log10 term scales
    /// the step with the current zoom so high zoom levels move faster.
    pub fn wheel_zoom(&self, delta_y: f64) -> f64 {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return self.zoom;
        }
        let max_step = ZOOM_STEP * 100.0;
        let sign = delta_y.signum();
        let delta = delta_y.clamp(-max_step, max_step);

        let mut zoom = self.zoom - delta / 100.0;
        zoom += self.zoom.max(1.0).log10() * -sign * (delta_y.abs() / 20.0).min(1.0);
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Set the zoom directly, rounded to two decimals. No pivot is kept.
    ///
    /// Returns whether the zoom changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let new_zoom = round_to(zoom, 2).clamp(self.min_zoom, self.max_zoom);
        let changed = (new_zoom - self.zoom).abs() >= f64::EPSILON;
        self.zoom = new_zoom;
        changed
    }

    /// Step the zoom up by `ZOOM_STEP`.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom + ZOOM_STEP)
    }

    /// Step the zoom down by `ZOOM_STEP`.
    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom - ZOOM_STEP)
    }

    /// Return to 100%.
    pub fn reset_zoom(&mut self) -> bool {
        self.set_zoom(DEFAULT_ZOOM)
    }
}
