//! Grid layout model orchestrator.
//!
//! The dashboard grid is a fixed 2-row × 12-column space. This module
//! exposes the placement types and the `LayoutState` container; the
//! implementation details live in the private `core` module.

mod core;

pub use core::{
    ChartVariant, LayoutState, WidgetKind, WidgetPlacement, GRID_COLS, GRID_ROWS, MAX_SPAN,
    MIN_SPAN,
};
