//! Swipe-to-reveal gestures for list rows.
//!
//! Pointer input is classified as a horizontal swipe or a vertical scroll,
//! tracked with rubber-band resistance, and resolved into open, closed or
//! delete-requested. Only one row is ever open.

pub mod controller;
pub mod easing;
pub mod registry;
pub mod session;

pub use controller::{
    MoveOutcome, Release, SwipeController, SwipeOutcome, TapOutcome, classify_release, drag_offset,
};
pub use easing::{CubicBezier, SETTLE_EASING};
pub use registry::{Motion, RevealBackground, RowRegistry, RowVisual};
pub use session::{AxisLock, GestureSession};
