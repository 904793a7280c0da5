use std::hash::Hash;
use std::time::Duration;

use crate::model::config::SwipeConfig;

use super::registry::{Motion, RevealBackground, RowRegistry, RowVisual};
use super::session::{AxisLock, GestureSession};

/// What a pointer move did to the active gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// No active session.
    Idle,
    /// Still inside the dead zone; nothing changed.
    DeadZone,
    /// Locked vertical: the session was dropped so the list can scroll.
    Abandoned,
    /// Horizontal tracking; the row now sits at `offset`.
    Tracking { offset: f64 },
}

/// Terminal result of a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeOutcome<K> {
    /// No session was active (never started, or abandoned as a scroll).
    Aborted,
    /// The pointer never left the dead zone. Hosts usually treat this as a tap.
    Discarded(K),
    Opened(K),
    Closed(K),
    /// The row was pulled far or fast enough to ask for deletion. The row
    /// is already animating back to rest; the host must confirm before
    /// deleting anything.
    DeleteRequested(K),
}

/// Result of a tap on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// The row was open; it is closing and the tap must not navigate.
    Swallowed,
    PassThrough,
}

/// How a horizontal release resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Open,
    Close,
    CommitDelete,
}

/// Offset shown while dragging: clamped at rest on the right, damped past
/// the full reveal on the left.
pub fn drag_offset(config: &SwipeConfig, base_offset: f64, dx: f64) -> f64 {
    let width = config.reveal_width;
    let offset = (base_offset + dx).min(0.0);
    if offset < -width {
        let over = -offset - width;
        -(width + over * config.rubber_band)
    } else {
        offset
    }
}

/// Decide the end state of a horizontal gesture.
///
/// A fast rightward flick always closes, even when the row is still past
/// the open threshold.
pub fn classify_release(config: &SwipeConfig, base_offset: f64, dx: f64, velocity: f64) -> Release {
    let total = base_offset + dx;
    let flick = velocity > config.velocity_threshold;
    let should_open = total < -config.open_threshold || (flick && dx < 0.0);
    let should_close = !should_open || (flick && dx > 0.0);

    if should_open && !should_close {
        let overshoot = total < -(config.reveal_width * config.commit_ratio);
        let fast_past_width = velocity > config.commit_velocity && dx < -config.reveal_width;
        if overshoot || fast_past_width {
            Release::CommitDelete
        } else {
            Release::Open
        }
    } else {
        Release::Close
    }
}

/// Swipe-to-reveal state machine for a list of rows.
///
/// Feed it pointer events for one row at a time; it drives the row handles
/// in its `RowRegistry` directly and reports the outcome of each gesture.
/// Open state changes as soon as an outcome is decided; animations only
/// converge the visuals, and `transition_end` must be called when they land.
pub struct SwipeController<K> {
    config: SwipeConfig,
    registry: RowRegistry<K>,
    session: Option<GestureSession<K>>,
    on_delete: Option<Box<dyn FnMut(&K)>>,
}

impl<K: Clone + Eq + Hash> SwipeController<K> {
    pub fn new(config: SwipeConfig) -> Self {
        SwipeController {
            config,
            registry: RowRegistry::new(),
            session: None,
            on_delete: None,
        }
    }

    /// Call `handler` whenever a gesture ends in `DeleteRequested`.
    pub fn with_delete_handler(mut self, handler: impl FnMut(&K) + 'static) -> Self {
        self.on_delete = Some(Box::new(handler));
        self
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn registry(&self) -> &RowRegistry<K> {
        &self.registry
    }

    pub fn session(&self) -> Option<&GestureSession<K>> {
        self.session.as_ref()
    }

    pub fn open_row(&self) -> Option<&K> {
        self.registry.open_row()
    }

    /// Register a row. Rows bound without a background cannot be swiped.
    pub fn bind_row(
        &mut self,
        id: K,
        visual: Box<dyn RowVisual>,
        background: Option<Box<dyn RevealBackground>>,
    ) {
        self.registry.bind(id, visual, background);
    }

    pub fn unbind_row(&mut self, id: &K) {
        if self.session.as_ref().is_some_and(|s| &s.subject == id) {
            self.session = None;
        }
        self.registry.unbind(id);
    }

    fn settle_motion(&self) -> Motion {
        Motion::Animated {
            duration: Duration::from_millis(self.config.settle_ms),
        }
    }

    fn base_offset(&self, id: &K) -> f64 {
        if self.registry.is_open(id) {
            -self.config.reveal_width
        } else {
            0.0
        }
    }

    /// Press on a row.
    ///
    /// A horizontal session that never saw its release is resolved first,
    /// as if cancelled at its last position; its outcome is returned so the
    /// host can still act on a delete request.
    pub fn pointer_start(&mut self, id: K, x: f64, y: f64, t: u64) -> Option<SwipeOutcome<K>> {
        let stale = match self.session.as_ref().map(|s| s.axis) {
            Some(AxisLock::Horizontal) => Some(self.pointer_cancel()),
            _ => {
                self.session = None;
                None
            }
        };
        if self.registry.is_swipeable(&id) {
            self.session = Some(GestureSession::new(id, x, y, t));
        }
        stale
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, t: u64) -> MoveOutcome {
        let motion = self.settle_motion();
        let Some(session) = self.session.as_mut() else {
            return MoveOutcome::Idle;
        };
        let dx = x - session.start_x;
        let dy = y - session.start_y;

        if session.axis == AxisLock::Undecided {
            let dead_zone = self.config.dead_zone;
            if dx.abs() < dead_zone && dy.abs() < dead_zone {
                return MoveOutcome::DeadZone;
            }
            if dx.abs() > dy.abs() {
                session.axis = AxisLock::Horizontal;
            } else {
                self.session = None;
                return MoveOutcome::Abandoned;
            }
            let id = session.subject.clone();
            self.registry.close_open_except(&id, motion);
            self.registry.begin_drag(&id);
        }

        session.track(x, t);
        let id = session.subject.clone();
        let base = if self.registry.is_open(&id) {
            -self.config.reveal_width
        } else {
            0.0
        };
        let offset = drag_offset(&self.config, base, dx);
        self.registry.set_offset(&id, offset, Motion::Immediate);
        MoveOutcome::Tracking { offset }
    }

    /// Release. Resolves a horizontal gesture to open, closed or a delete
    /// request.
    pub fn pointer_end(&mut self) -> SwipeOutcome<K> {
        let Some(session) = self.session.take() else {
            return SwipeOutcome::Aborted;
        };
        match session.axis {
            AxisLock::Undecided => return SwipeOutcome::Discarded(session.subject),
            AxisLock::Vertical => return SwipeOutcome::Aborted,
            AxisLock::Horizontal => {}
        }

        self.registry.end_drag();
        let id = session.subject.clone();
        let motion = self.settle_motion();
        let dx = session.dx();
        let release = classify_release(&self.config, self.base_offset(&id), dx, session.velocity());

        match release {
            Release::CommitDelete => {
                self.registry.animate_closed(&id, motion);
                if let Some(handler) = self.on_delete.as_mut() {
                    handler(&id);
                }
                SwipeOutcome::DeleteRequested(id)
            }
            Release::Open => {
                self.registry
                    .set_offset(&id, -self.config.reveal_width, motion);
                self.registry.set_open(&id, motion);
                SwipeOutcome::Opened(id)
            }
            Release::Close => {
                self.registry.animate_closed(&id, motion);
                SwipeOutcome::Closed(id)
            }
        }
    }

    /// Pointer cancelled by the platform: resolved like a release at the
    /// last tracked position.
    pub fn pointer_cancel(&mut self) -> SwipeOutcome<K> {
        self.pointer_end()
    }

    /// Tap on a row. An open row closes and the tap is swallowed.
    pub fn tap(&mut self, id: &K) -> TapOutcome {
        if self.registry.is_open(id) {
            let motion = self.settle_motion();
            self.registry.animate_closed(id, motion);
            TapOutcome::Swallowed
        } else {
            TapOutcome::PassThrough
        }
    }

    /// Close the open row, if any (e.g. when a delete is cancelled).
    pub fn close_open_row(&mut self) {
        if let Some(id) = self.registry.open_row().cloned() {
            let motion = self.settle_motion();
            self.registry.animate_closed(&id, motion);
        }
    }

    /// The host finished animating `id`.
    pub fn transition_end(&mut self, id: &K) {
        self.registry.settle(id);
    }
}
