//! Engine configuration.

use crate::camera::{MAX_ZOOM, MIN_ZOOM};
use crate::error::{EngineError, EngineResult};
use crate::shapes::SerializableColor;
use serde::{Deserialize, Serialize};

/// Viewport distance (CSS pixels) a drag must cover before a shape is created.
pub const DEFAULT_CREATION_THRESHOLD: f64 = 10.0;

/// Padding (CSS pixels) between a selected object and its outline.
pub const DEFAULT_SELECTION_PADDING: f64 = 6.0;

/// Tunables for an [`Engine`](crate::Engine) instance.
///
/// Every field has a default, so hosts only pass what they want to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Lower zoom bound.
    pub min_zoom: f64,
    /// Upper zoom bound.
    pub max_zoom: f64,
    /// Drag distance before the rectangle tool creates an object.
    pub creation_threshold: f64,
    /// Padding around the selection outline.
    pub selection_padding: f64,
    /// Selection outline color.
    pub selection_color: SerializableColor,
    /// Selection outline width in CSS pixels.
    pub selection_line_width: f64,
    /// Force Apple (Cmd as Ctrl) modifier handling. `None` = detect.
    pub apple_platform: Option<bool>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            creation_threshold: DEFAULT_CREATION_THRESHOLD,
            selection_padding: DEFAULT_SELECTION_PADDING,
            selection_color: SerializableColor::new(0x4f, 0x39, 0xf6, 255),
            selection_line_width: 1.0,
            apple_platform: None,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject zoom bounds that would break the camera's `zoom > 0` invariant,
    /// and lengths that are negative or not finite.
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "minZoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            return Err(EngineError::InvalidConfig(format!(
                "maxZoom must be >= minZoom, got {} < {}",
                self.max_zoom, self.min_zoom
            )));
        }
        for (name, value) in [
            ("creationThreshold", self.creation_threshold),
            ("selectionPadding", self.selection_padding),
            ("selectionLineWidth", self.selection_line_width),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be finite and not negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
