//! Engine errors.

use thiserror::Error;

/// Errors surfaced by the engine API.
///
/// Most runtime conditions (unknown object ids, mismatched mouse-ups) are
/// not errors; they are ignored where they occur.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Tool is not available yet: {0}")]
    UnsupportedTool(String),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
