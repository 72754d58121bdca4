//! Conversions between page values and engine types.

use crate::error::{AppError, AppResult};
use roughboard_core::ShapeId;

/// Parse an object id handed in from JavaScript.
pub fn parse_object_id(id: &str) -> AppResult<ShapeId> {
    ShapeId::parse_str(id.trim()).map_err(|_| AppError::InvalidObjectId(id.to_string()))
}

/// Whether keyboard input aimed at an element with this tag belongs to the
/// element rather than the whiteboard.
pub fn is_editable_tag(tag_name: &str) -> bool {
    matches!(
        tag_name.to_ascii_uppercase().as_str(),
        "INPUT" | "TEXTAREA" | "SELECT"
    )
}

/// Reject non-finite numbers coming from the page.
pub fn finite(name: &str, value: f64) -> AppResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AppError::InvalidArgument(format!("{name} must be finite, got {value}")))
    }
}
