use std::cell::RefCell;
use std::rc::Rc;

use crate::autosave::Clock;
use crate::swipe::{Motion, RevealBackground, RowVisual, SETTLE_EASING};

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f64,
    start_ms: u64,
    duration_ms: u64,
}

/// What the notes list draws for one row: its horizontal offset (px) and
/// whether the delete action behind it is visible.
#[derive(Debug, Clone, Default)]
pub struct RowPaint {
    target: f64,
    shown: f64,
    animation: Option<Animation>,
    pub background_visible: bool,
}

impl RowPaint {
    /// Offset currently on screen.
    pub fn offset(&self) -> f64 {
        self.shown
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Step the animation to `now_ms`. Returns true exactly once, on the
    /// frame the animation lands.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        let elapsed = now_ms.saturating_sub(anim.start_ms);
        if elapsed >= anim.duration_ms {
            self.shown = self.target;
            self.animation = None;
            return true;
        }
        let progress = SETTLE_EASING.sample(elapsed as f64 / anim.duration_ms as f64);
        self.shown = anim.from + (self.target - anim.from) * progress;
        false
    }
}

pub type SharedPaint = Rc<RefCell<RowPaint>>;

/// Sliding layer of a notes row.
pub struct PaintedRow<C> {
    paint: SharedPaint,
    clock: C,
}

/// Delete action behind a notes row.
pub struct PaintedBackground {
    paint: SharedPaint,
}

/// Handles for one row; both write into the same `RowPaint`.
pub fn row_handles<C: Clock>(paint: &SharedPaint, clock: C) -> (PaintedRow<C>, PaintedBackground) {
    (
        PaintedRow {
            paint: paint.clone(),
            clock,
        },
        PaintedBackground {
            paint: paint.clone(),
        },
    )
}

impl<C: Clock> RowVisual for PaintedRow<C> {
    fn set_offset(&mut self, offset: f64, motion: Motion) {
        let mut paint = self.paint.borrow_mut();
        paint.target = offset;
        match motion {
            Motion::Immediate => {
                paint.shown = offset;
                paint.animation = None;
            }
            Motion::Animated { duration } => {
                paint.animation = Some(Animation {
                    from: paint.shown,
                    start_ms: self.clock.now_ms(),
                    duration_ms: duration.as_millis() as u64,
                });
            }
        }
    }
}

impl RevealBackground for PaintedBackground {
    fn set_visible(&mut self, visible: bool) {
        self.paint.borrow_mut().background_visible = visible;
    }
}
