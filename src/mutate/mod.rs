//! Layout mutation engine orchestrator.
//!
//! Reorder, equalize, and the resize gesture session all live here. Every
//! operation degrades to a no-op on malformed input instead of returning an
//! error; the implementation details live in the private `core` module.

mod core;

pub use core::{equalize, reorder, ResizeEdge, ResizeOutcome, ResizeSession};
