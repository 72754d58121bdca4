//! Shell errors.

use roughboard_core::EngineError;
use thiserror::Error;

/// Errors raised while wiring the engine to the page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No window available")]
    NoWindow,
    #[error("No document available")]
    NoDocument,
    #[error("Canvas 2D context is not available")]
    ContextUnavailable,
    #[error("Invalid object id: {0}")]
    InvalidObjectId(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Result type for shell operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for AppError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        AppError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<AppError> for wasm_bindgen::JsValue {
    fn from(err: AppError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
