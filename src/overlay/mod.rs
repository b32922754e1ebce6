//! Modal overlay surfaces stacked above the main display.

pub mod stack;

pub use stack::{OverlayId, OverlayKind, OverlayStack};
