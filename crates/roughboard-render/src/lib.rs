//! Roughboard Render Library
//!
//! Hand-drawn backend for Roughboard: turns rectangle primitives plus a
//! resolved style into seeded, jittered `kurbo` paths. Hosts paint the
//! resulting [`Sketch`] operations with whatever 2D API they have.

pub mod hachure;
pub mod rough;
mod sketch;

pub use rough::{SketchRng, apply_hand_drawn_effect};
pub use sketch::{Sketch, SketchOp, SketchRecorder, outline_path, sketch_rectangle};
