use std::hash::Hash;
use std::time::Duration;

use indexmap::IndexMap;

/// How a row moves to a new offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Jump with no transition (finger tracking).
    Immediate,
    /// Animate along `SETTLE_EASING`; the host reports completion through
    /// `SwipeController::transition_end`.
    Animated { duration: Duration },
}

/// The part of a row that slides horizontally.
pub trait RowVisual {
    fn set_offset(&mut self, offset: f64, motion: Motion);
}

/// The action area drawn behind a row.
pub trait RevealBackground {
    fn set_visible(&mut self, visible: bool);
}

struct RowBinding {
    visual: Box<dyn RowVisual>,
    background: Option<Box<dyn RevealBackground>>,
    offset: f64,
    background_visible: bool,
    /// Hide the background once the current animation lands
    hide_on_settle: bool,
}

/// Live view handles for each row, plus the single "open" slot.
///
/// All offset and background changes go through here so the visual state
/// of a row and the open slot never drift apart. At most one row is open.
pub struct RowRegistry<K> {
    rows: IndexMap<K, RowBinding>,
    open: Option<K>,
    dragging: Option<K>,
}

impl<K: Clone + Eq + Hash> Default for RowRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> RowRegistry<K> {
    pub fn new() -> Self {
        RowRegistry {
            rows: IndexMap::new(),
            open: None,
            dragging: None,
        }
    }

    /// Attach handles for `id`. Rebinding keeps the row's current offset and
    /// background state and pushes them to the new handles.
    pub fn bind(
        &mut self,
        id: K,
        mut visual: Box<dyn RowVisual>,
        mut background: Option<Box<dyn RevealBackground>>,
    ) {
        let (offset, background_visible) = self
            .rows
            .get(&id)
            .map_or((0.0, false), |row| (row.offset, row.background_visible));
        visual.set_offset(offset, Motion::Immediate);
        if let Some(bg) = background.as_mut() {
            bg.set_visible(background_visible);
        }
        self.rows.insert(
            id,
            RowBinding {
                visual,
                background,
                offset,
                background_visible,
                hide_on_settle: false,
            },
        );
    }

    /// Drop a row's handles. Clears the open slot if it pointed at `id`.
    pub fn unbind(&mut self, id: &K) {
        self.rows.shift_remove(id);
        if self.open.as_ref() == Some(id) {
            self.open = None;
        }
        if self.dragging.as_ref() == Some(id) {
            self.dragging = None;
        }
    }

    pub fn is_bound(&self, id: &K) -> bool {
        self.rows.contains_key(id)
    }

    /// Bound and has an action area to reveal.
    pub fn is_swipeable(&self, id: &K) -> bool {
        self.rows.get(id).is_some_and(|row| row.background.is_some())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.rows.keys()
    }

    pub fn open_row(&self) -> Option<&K> {
        self.open.as_ref()
    }

    pub fn is_open(&self, id: &K) -> bool {
        self.open.as_ref() == Some(id)
    }

    pub fn dragging_row(&self) -> Option<&K> {
        self.dragging.as_ref()
    }

    /// Last offset requested for `id` (the target, if animating).
    pub fn offset(&self, id: &K) -> Option<f64> {
        self.rows.get(id).map(|row| row.offset)
    }

    pub fn background_visible(&self, id: &K) -> bool {
        self.rows.get(id).is_some_and(|row| row.background_visible)
    }

    pub(crate) fn set_offset(&mut self, id: &K, offset: f64, motion: Motion) {
        if let Some(row) = self.rows.get_mut(id) {
            row.offset = offset;
            if motion == Motion::Immediate {
                row.hide_on_settle = false;
            }
            row.visual.set_offset(offset, motion);
        }
    }

    fn set_background(&mut self, id: &K, visible: bool) {
        if let Some(row) = self.rows.get_mut(id)
            && row.background_visible != visible
        {
            row.background_visible = visible;
            if let Some(bg) = row.background.as_mut() {
                bg.set_visible(visible);
            }
        }
    }

    /// Animate `id` back to rest and hide its background when it lands.
    pub(crate) fn animate_closed(&mut self, id: &K, motion: Motion) {
        if self.open.as_ref() == Some(id) {
            self.open = None;
        }
        self.set_offset(id, 0.0, motion);
        match motion {
            Motion::Immediate => self.set_background(id, false),
            Motion::Animated { .. } => {
                if let Some(row) = self.rows.get_mut(id) {
                    row.hide_on_settle = true;
                }
            }
        }
    }

    /// Close whichever row is open unless it is `except`.
    pub(crate) fn close_open_except(&mut self, except: &K, motion: Motion) {
        if let Some(prev) = self.open.clone()
            && &prev != except
        {
            self.animate_closed(&prev, motion);
        }
    }

    /// Record `id` as the open row, closing any other open row first.
    pub(crate) fn set_open(&mut self, id: &K, motion: Motion) {
        self.close_open_except(id, motion);
        self.open = Some(id.clone());
        self.set_background(id, true);
        if let Some(row) = self.rows.get_mut(id) {
            row.hide_on_settle = false;
        }
    }

    pub(crate) fn begin_drag(&mut self, id: &K) {
        self.dragging = Some(id.clone());
        if let Some(row) = self.rows.get_mut(id) {
            row.hide_on_settle = false;
        }
        self.set_background(id, true);
    }

    pub(crate) fn end_drag(&mut self) {
        self.dragging = None;
    }

    /// The host's animation for `id` finished. The background is hidden only
    /// if the row is neither open nor being dragged by then.
    pub(crate) fn settle(&mut self, id: &K) {
        let still_active = self.open.as_ref() == Some(id) || self.dragging.as_ref() == Some(id);
        let Some(row) = self.rows.get_mut(id) else {
            return;
        };
        if !std::mem::take(&mut row.hide_on_settle) || still_active {
            return;
        }
        self.set_background(id, false);
    }
}
