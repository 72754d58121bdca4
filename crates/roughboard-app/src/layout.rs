//! Canvas sizing.

use kurbo::Point;
use roughboard_core::Viewport;

/// Size of the canvas element and its backing store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    /// CSS size, copied from the container.
    pub css_width: f64,
    pub css_height: f64,
    /// Backing-store size in device pixels.
    pub backing_width: u32,
    pub backing_height: u32,
    pub device_pixel_ratio: f64,
}

impl CanvasLayout {
    /// Fit a canvas to a container of the given CSS size.
    pub fn compute(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let css_width = css_width.max(0.0);
        let css_height = css_height.max(0.0);
        let backing = |css: f64| (css * device_pixel_ratio).round().max(1.0) as u32;
        Self {
            css_width,
            css_height,
            backing_width: backing(css_width),
            backing_height: backing(css_height),
            device_pixel_ratio,
        }
    }

    /// Engine viewport for a canvas whose top-left corner is at `origin`.
    pub fn viewport(&self, origin: Point) -> Viewport {
        Viewport::new(self.css_width, self.css_height, self.device_pixel_ratio).with_origin(origin)
    }

    /// `style.width` / `style.height` values.
    pub fn css_size(&self) -> (String, String) {
        (format!("{}px", self.css_width), format!("{}px", self.css_height))
    }
}
