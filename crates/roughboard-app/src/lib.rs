//! Roughboard Application
//!
//! Browser shell for the Roughboard engine: binds a `<canvas>` and its
//! container, forwards DOM input, drives frames from `requestAnimationFrame`
//! and paints sketches with the Canvas 2D API.

pub mod bridge;
mod error;
pub mod layout;
pub mod paint;

pub use error::{AppError, AppResult};

#[cfg(target_arch = "wasm32")]
mod canvas2d;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::RoughboardEngine;
