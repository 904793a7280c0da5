use std::fmt;
use std::time::Duration;

use crate::io::store::StoreError;
use crate::model::{DateKey, Hour};

use super::clock::Clock;

/// Identity of an editable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub date: DateKey,
    pub hour: Hour,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.hour.label())
    }
}

/// Issued with every save request; hand it back to `complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SaveTicket(u64);

/// A write the host must perform: persist `content` at `slot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub ticket: SaveTicket,
    pub slot: SlotKey,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPhase {
    Idle,
    /// A debounced save will fire at `deadline`.
    Pending { deadline: u64 },
    /// At least one write is outstanding.
    Saving,
}

#[derive(Debug, thiserror::Error)]
pub enum AutosaveError {
    #[error("could not save {slot}: {source}")]
    Persistence { slot: SlotKey, source: StoreError },
}

#[derive(Debug, Clone)]
struct InFlight {
    ticket: SaveTicket,
    epoch: u64,
    content: String,
}

/// Debounced autosave for one text slot.
///
/// The slot never touches storage. It hands out `SaveRequest`s from
/// `poll`, `blur` and `dispose`, and the host reports each write's result
/// through `complete`. Edits may continue while writes are outstanding.
///
/// Invariant: whenever `value() != acknowledged()`, a save is pending, in
/// flight, or will be issued by `blur`/`dispose`.
pub struct AutosaveSlot<C> {
    key: SlotKey,
    clock: C,
    debounce: Duration,
    current: String,
    acknowledged: String,
    deadline: Option<u64>,
    in_flight: Vec<InFlight>,
    next_ticket: u64,
    /// Newest ticket whose success moved the watermark in this epoch
    acked_ticket: Option<SaveTicket>,
    /// Bumped by `external_update`; older writes no longer move the watermark
    epoch: u64,
}

impl<C: Clock> AutosaveSlot<C> {
    pub fn new(key: SlotKey, initial: &str, debounce: Duration, clock: C) -> Self {
        AutosaveSlot {
            key,
            clock,
            debounce,
            current: initial.to_string(),
            acknowledged: initial.to_string(),
            deadline: None,
            in_flight: Vec::new(),
            next_ticket: 0,
            acked_ticket: None,
            epoch: 0,
        }
    }

    pub fn key(&self) -> SlotKey {
        self.key
    }

    /// What the user sees.
    pub fn value(&self) -> &str {
        &self.current
    }

    /// The last value confirmed persisted.
    pub fn acknowledged(&self) -> &str {
        &self.acknowledged
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.acknowledged
    }

    pub fn is_saving(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn phase(&self) -> SlotPhase {
        if self.is_saving() {
            SlotPhase::Saving
        } else if let Some(deadline) = self.deadline {
            SlotPhase::Pending { deadline }
        } else {
            SlotPhase::Idle
        }
    }

    fn issue(&mut self) -> SaveRequest {
        let ticket = SaveTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight.push(InFlight {
            ticket,
            epoch: self.epoch,
            content: self.current.clone(),
        });
        SaveRequest {
            ticket,
            slot: self.key,
            content: self.current.clone(),
        }
    }

    /// Whether the newest outstanding write (or, with none, the watermark)
    /// already matches what the user sees.
    fn up_to_date(&self) -> bool {
        match self.in_flight.iter().rev().find(|f| f.epoch == self.epoch) {
            Some(newest) => newest.content == self.current,
            None => self.current == self.acknowledged,
        }
    }

    fn arm(&mut self) {
        self.deadline = Some(self.clock.now_ms() + self.debounce.as_millis() as u64);
    }

    /// User edit. Takes effect immediately and restarts the debounce window.
    pub fn change(&mut self, value: impl Into<String>) {
        self.current = value.into();
        self.arm();
    }

    /// Fire the debounce if its deadline has passed.
    pub fn poll(&mut self) -> Option<SaveRequest> {
        let deadline = self.deadline?;
        if self.clock.now_ms() < deadline {
            return None;
        }
        self.deadline = None;
        if self.up_to_date() {
            return None;
        }
        Some(self.issue())
    }

    /// Focus left the slot: cancel the debounce and save now if the text
    /// differs from the watermark.
    pub fn blur(&mut self) -> Option<SaveRequest> {
        self.deadline = None;
        if self.is_dirty() {
            Some(self.issue())
        } else {
            None
        }
    }

    /// The slot now shows a different subject's text. Unflushed edits are
    /// dropped; flush first if they matter.
    pub fn external_update(&mut self, value: &str) {
        self.current = value.to_string();
        self.acknowledged = value.to_string();
        self.deadline = None;
        self.acked_ticket = None;
        self.epoch += 1;
    }

    /// Move the slot to a different date/hour and show `value`.
    pub fn reassign(&mut self, key: SlotKey, value: &str) {
        self.key = key;
        self.external_update(value);
    }

    /// Teardown. Returns a last save to fire and forget if the text was
    /// never acknowledged.
    pub fn dispose(mut self) -> Option<SaveRequest> {
        if self.is_dirty() {
            Some(self.issue())
        } else {
            None
        }
    }

    /// A write issued by this slot finished.
    ///
    /// Success moves the watermark to exactly the value that was sent, never
    /// backwards past a newer acknowledged write. Failure leaves the
    /// watermark alone so the next edit or blur sends the text again.
    pub fn complete(
        &mut self,
        ticket: SaveTicket,
        result: Result<(), StoreError>,
    ) -> Result<(), AutosaveError> {
        let Some(pos) = self.in_flight.iter().position(|f| f.ticket == ticket) else {
            return Ok(());
        };
        let write = self.in_flight.remove(pos);

        if let Err(source) = result {
            return Err(AutosaveError::Persistence {
                slot: self.key,
                source,
            });
        }

        let current_epoch = write.epoch == self.epoch;
        let newer = self.acked_ticket.is_none_or(|acked| ticket > acked);
        if current_epoch && newer {
            self.acknowledged = write.content;
            self.acked_ticket = Some(ticket);
        }

        // Text changed while writing and nothing else will carry it
        if self.is_dirty() && self.deadline.is_none() && !self.is_saving() {
            self.arm();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autosave::clock::ManualClock;
    use pretty_assertions::assert_eq;

    fn slot(initial: &str) -> (AutosaveSlot<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let key = SlotKey {
            date: "2025-03-03".parse().unwrap(),
            hour: Hour::new(9).unwrap(),
        };
        (
            AutosaveSlot::new(key, initial, Duration::from_millis(500), clock.clone()),
            clock,
        )
    }

    fn failure() -> StoreError {
        StoreError::Unavailable("offline".into())
    }

    #[test]
    fn keystrokes_within_window_coalesce() {
        let (mut s, clock) = slot("");
        for text in ["h", "he", "hel", "hell", "hello"] {
            s.change(text);
            clock.advance(100);
            assert_eq!(s.poll(), None);
        }
        assert_eq!(s.value(), "hello");

        clock.advance(400);
        let req = s.poll().unwrap();
        assert_eq!(req.content, "hello");
        assert_eq!(s.poll(), None);
        assert!(s.is_saving());

        s.complete(req.ticket, Ok(())).unwrap();
        assert_eq!(s.acknowledged(), "hello");
        assert!(!s.is_saving());
        assert_eq!(s.phase(), SlotPhase::Idle);
    }

    #[test]
    fn phases_follow_the_save_cycle() {
        let (mut s, clock) = slot("");
        assert_eq!(s.phase(), SlotPhase::Idle);
        s.change("a");
        assert_eq!(s.phase(), SlotPhase::Pending { deadline: 500 });
        clock.advance(500);
        let req = s.poll().unwrap();
        assert_eq!(s.phase(), SlotPhase::Saving);
        s.complete(req.ticket, Ok(())).unwrap();
        assert_eq!(s.phase(), SlotPhase::Idle);
    }

    #[test]
    fn blur_without_edit_does_not_save() {
        let (mut s, _clock) = slot("saved");
        assert_eq!(s.blur(), None);

        s.change("saved!");
        s.change("saved");
        assert_eq!(s.blur(), None);
        // the debounce was cancelled too
        assert_eq!(s.phase(), SlotPhase::Idle);
    }

    #[test]
    fn blur_flushes_immediately_and_cancels_debounce() {
        let (mut s, clock) = slot("");
        s.change("draft");
        let req = s.blur().unwrap();
        assert_eq!(req.content, "draft");
        s.complete(req.ticket, Ok(())).unwrap();

        clock.advance(1_000);
        assert_eq!(s.poll(), None);
    }

    #[test]
    fn typing_during_save_keeps_watermark_at_sent_value() {
        let (mut s, clock) = slot("");
        s.change("one");
        clock.advance(500);
        let first = s.poll().unwrap();

        s.change("one two");
        s.complete(first.ticket, Ok(())).unwrap();
        assert_eq!(s.acknowledged(), "one");
        assert_eq!(s.value(), "one two");
        assert!(s.is_dirty());

        clock.advance(500);
        let second = s.poll().unwrap();
        assert_eq!(second.content, "one two");
        s.complete(second.ticket, Ok(())).unwrap();
        assert!(!s.is_dirty());
    }

    #[test]
    fn overlapping_writes_never_move_watermark_backwards() {
        let (mut s, clock) = slot("");
        s.change("a");
        clock.advance(500);
        let older = s.poll().unwrap();
        s.change("ab");
        clock.advance(500);
        let newer = s.poll().unwrap();

        s.complete(newer.ticket, Ok(())).unwrap();
        assert!(s.is_saving());
        s.complete(older.ticket, Ok(())).unwrap();
        assert_eq!(s.acknowledged(), "ab");
        assert!(!s.is_saving());
    }

    #[test]
    fn reverting_while_write_in_flight_still_saves() {
        let (mut s, clock) = slot("a");
        s.change("ab");
        clock.advance(500);
        let sent = s.poll().unwrap();

        // back to the acknowledged text before the write lands
        s.change("a");
        clock.advance(500);
        let revert = s.poll().unwrap();
        assert_eq!(revert.content, "a");

        s.complete(sent.ticket, Ok(())).unwrap();
        s.complete(revert.ticket, Ok(())).unwrap();
        assert_eq!(s.acknowledged(), "a");
        assert!(!s.is_dirty());
    }

    #[test]
    fn stale_write_landing_after_blur_rearms_debounce() {
        let (mut s, clock) = slot("a");
        s.change("ab");
        clock.advance(500);
        let sent = s.poll().unwrap();
        s.change("a");
        assert_eq!(s.blur(), None);

        s.complete(sent.ticket, Ok(())).unwrap();
        assert_eq!(s.acknowledged(), "ab");
        assert!(matches!(s.phase(), SlotPhase::Pending { .. }));

        clock.advance(500);
        assert_eq!(s.poll().unwrap().content, "a");
    }

    #[test]
    fn failure_leaves_watermark_and_surfaces_error() {
        let (mut s, clock) = slot("old");
        s.change("new");
        clock.advance(500);
        let req = s.poll().unwrap();

        let err = s.complete(req.ticket, Err(failure())).unwrap_err();
        assert!(err.to_string().contains("2025-03-03 09:00"));
        assert_eq!(s.acknowledged(), "old");
        assert!(!s.is_saving());
        // no automatic retry
        clock.advance(5_000);
        assert_eq!(s.poll(), None);

        // the next blur sends the same text again
        assert_eq!(s.blur().unwrap().content, "new");
    }

    #[test]
    fn external_update_discards_local_edit() {
        let (mut s, clock) = slot("mine");
        s.change("mine, edited");
        s.external_update("theirs");
        assert_eq!(s.value(), "theirs");
        assert_eq!(s.acknowledged(), "theirs");
        clock.advance(1_000);
        assert_eq!(s.poll(), None);
        assert_eq!(s.blur(), None);
    }

    #[test]
    fn write_from_previous_subject_does_not_move_watermark() {
        let (mut s, clock) = slot("");
        s.change("monday");
        clock.advance(500);
        let req = s.poll().unwrap();

        let tuesday = SlotKey {
            date: "2025-03-04".parse().unwrap(),
            hour: Hour::new(9).unwrap(),
        };
        s.reassign(tuesday, "tuesday");
        assert!(s.is_saving());

        s.complete(req.ticket, Ok(())).unwrap();
        assert_eq!(s.acknowledged(), "tuesday");
        assert_eq!(s.key(), tuesday);
        assert!(!s.is_saving());
        assert_eq!(s.phase(), SlotPhase::Idle);
    }

    #[test]
    fn dispose_returns_final_save_only_when_dirty() {
        let (s, _clock) = slot("same");
        assert_eq!(s.dispose(), None);

        let (mut s, _clock) = slot("same");
        s.change("changed");
        let req = s.dispose().unwrap();
        assert_eq!(req.content, "changed");
    }

    #[test]
    fn unknown_ticket_is_ignored() {
        let (mut s, clock) = slot("");
        s.change("x");
        clock.advance(500);
        let req = s.poll().unwrap();
        s.complete(req.ticket, Ok(())).unwrap();
        // completing twice is harmless
        s.complete(req.ticket, Err(failure())).unwrap();
        assert_eq!(s.acknowledged(), "x");
    }
}
