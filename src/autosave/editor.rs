use std::path::Path;
use std::time::Duration;

use crate::io::recovery::log_unsaved_edit;
use crate::io::store::{JournalStore, StoreError};
use crate::model::{DateKey, Day, Hour};

use super::clock::Clock;
use super::slot::{AutosaveError, AutosaveSlot, SaveRequest, SlotKey};

fn persist(store: &mut dyn JournalStore, req: &SaveRequest) -> Result<(), StoreError> {
    store
        .save_entry(req.slot.date, req.slot.hour, &req.content)
        .map(|_| ())
}

fn blur_slot<C: Clock>(
    slot: &mut AutosaveSlot<C>,
    store: &mut dyn JournalStore,
) -> Result<(), AutosaveError> {
    match slot.blur() {
        Some(req) => {
            let result = persist(store, &req);
            slot.complete(req.ticket, result)
        }
        None => Ok(()),
    }
}

/// The 24 autosaving hour slots of one day, wired to a `JournalStore`.
///
/// Writes run synchronously through the store passed to each call, so a
/// request is completed before the method returns.
pub struct DayEditor<C> {
    date: DateKey,
    slots: Vec<AutosaveSlot<C>>,
}

impl<C: Clock + Clone> DayEditor<C> {
    /// Slots for `date`, hydrated from `day` if one was stored.
    pub fn new(date: DateKey, day: Option<&Day>, debounce: Duration, clock: C) -> Self {
        let slots = Hour::all()
            .map(|hour| {
                let content = day.map_or("", |d| d.content(hour));
                AutosaveSlot::new(SlotKey { date, hour }, content, debounce, clock.clone())
            })
            .collect();
        DayEditor { date, slots }
    }

    pub fn date(&self) -> DateKey {
        self.date
    }

    pub fn slot(&self, hour: Hour) -> &AutosaveSlot<C> {
        &self.slots[hour.index()]
    }

    pub fn value(&self, hour: Hour) -> &str {
        self.slots[hour.index()].value()
    }

    pub fn has_unsaved(&self) -> bool {
        self.slots.iter().any(|s| s.is_dirty())
    }

    pub fn change(&mut self, hour: Hour, value: impl Into<String>) {
        self.slots[hour.index()].change(value);
    }

    /// Fire due debounces. Returns the failures, one per slot that failed.
    pub fn tick(&mut self, store: &mut dyn JournalStore) -> Vec<AutosaveError> {
        let mut errors = Vec::new();
        for slot in &mut self.slots {
            if let Some(req) = slot.poll() {
                let result = persist(store, &req);
                if let Err(e) = slot.complete(req.ticket, result) {
                    errors.push(e);
                }
            }
        }
        errors
    }

    /// Focus left `hour`: save it now if it has unsaved text.
    pub fn blur(&mut self, hour: Hour, store: &mut dyn JournalStore) -> Result<(), AutosaveError> {
        blur_slot(&mut self.slots[hour.index()], store)
    }

    /// Blur every slot. All slots are attempted; the first failure is returned.
    pub fn flush(&mut self, store: &mut dyn JournalStore) -> Result<(), AutosaveError> {
        let mut first_err = None;
        for slot in &mut self.slots {
            if let Err(e) = blur_slot(slot, store)
                && first_err.is_none()
            {
                first_err = Some(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Show another day. Unflushed edits are dropped; call `flush` first.
    pub fn switch_day(&mut self, date: DateKey, day: Option<&Day>) {
        self.date = date;
        for slot in &mut self.slots {
            let hour = slot.key().hour;
            let content = day.map_or("", |d| d.content(hour));
            slot.reassign(SlotKey { date, hour }, content);
        }
    }

    /// Apply a copy of this day written elsewhere. Slots with unsaved edits
    /// keep the local text. Returns the hours updated.
    pub fn apply_external(&mut self, day: &Day) -> Vec<Hour> {
        if day.date != self.date {
            return Vec::new();
        }
        let mut updated = Vec::new();
        for slot in &mut self.slots {
            let hour = slot.key().hour;
            let incoming = day.content(hour);
            if slot.is_dirty() || slot.value() == incoming {
                continue;
            }
            slot.external_update(incoming);
            updated.push(hour);
        }
        updated
    }

    /// Tear down. Every slot with unacknowledged text gets one last write;
    /// failures are recorded in the recovery log under `journal_dir` and
    /// otherwise ignored.
    pub fn dispose(self, store: &mut dyn JournalStore, journal_dir: &Path) {
        for slot in self.slots {
            if let Some(req) = slot.dispose()
                && let Err(e) = persist(store, &req)
            {
                log_unsaved_edit(
                    journal_dir,
                    req.slot.date,
                    req.slot.hour,
                    &req.content,
                    &e.to_string(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autosave::clock::ManualClock;
    use crate::io::recovery::read_recovery_entries;
    use crate::io::store::MemoryStore;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn date(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn hour(h: u8) -> Hour {
        Hour::new(h).unwrap()
    }

    fn editor(day: Option<&Day>) -> (DayEditor<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let ed = DayEditor::new(
            date("2025-03-03"),
            day,
            Duration::from_millis(500),
            clock.clone(),
        );
        (ed, clock)
    }

    #[test]
    fn hydrates_from_stored_day() {
        let mut day = Day::new(date("2025-03-03"));
        day.upsert(hour(7), "wake", Utc::now());
        let (ed, _clock) = editor(Some(&day));
        assert_eq!(ed.value(hour(7)), "wake");
        assert_eq!(ed.value(hour(8)), "");
        assert!(!ed.has_unsaved());
    }

    #[test]
    fn tick_writes_only_the_final_value() {
        let mut store = MemoryStore::new();
        let (mut ed, clock) = editor(None);
        ed.change(hour(9), "c");
        clock.advance(200);
        ed.change(hour(9), "co");
        clock.advance(200);
        ed.change(hour(9), "cof");
        assert!(ed.tick(&mut store).is_empty());
        assert!(store.writes.is_empty());

        clock.advance(500);
        assert!(ed.tick(&mut store).is_empty());
        assert_eq!(store.writes, vec![(date("2025-03-03"), hour(9), "cof".to_string())]);
        assert!(!ed.has_unsaved());
    }

    #[test]
    fn blur_with_nothing_pending_does_not_write() {
        let mut store = MemoryStore::new();
        let (mut ed, _clock) = editor(None);
        ed.blur(hour(3), &mut store).unwrap();
        ed.flush(&mut store).unwrap();
        assert!(store.writes.is_empty());
    }

    #[test]
    fn failed_blur_surfaces_and_keeps_text_unsaved() {
        let mut store = MemoryStore::new();
        store.fail_writes = true;
        let (mut ed, _clock) = editor(None);
        ed.change(hour(10), "meeting");

        let err = ed.blur(hour(10), &mut store).unwrap_err();
        assert!(matches!(err, AutosaveError::Persistence { .. }));
        assert!(ed.has_unsaved());

        store.fail_writes = false;
        ed.blur(hour(10), &mut store).unwrap();
        assert!(!ed.has_unsaved());
    }

    #[test]
    fn failure_in_one_slot_does_not_block_others() {
        let mut store = MemoryStore::new();
        let (mut ed, clock) = editor(None);
        ed.change(hour(1), "one");
        ed.change(hour(2), "two");
        store.fail_writes = true;
        clock.advance(500);
        let errors = ed.tick(&mut store);
        assert_eq!(errors.len(), 2);

        store.fail_writes = false;
        ed.flush(&mut store).unwrap();
        assert_eq!(store.writes.len(), 2);
    }

    #[test]
    fn switch_day_rekeys_slots() {
        let mut store = MemoryStore::new();
        let (mut ed, clock) = editor(None);
        ed.change(hour(5), "monday");
        ed.flush(&mut store).unwrap();

        let mut tuesday = Day::new(date("2025-03-04"));
        tuesday.upsert(hour(5), "tuesday", Utc::now());
        ed.switch_day(date("2025-03-04"), Some(&tuesday));
        assert_eq!(ed.date(), date("2025-03-04"));
        assert_eq!(ed.value(hour(5)), "tuesday");

        ed.change(hour(5), "tuesday!");
        clock.advance(500);
        ed.tick(&mut store);
        assert_eq!(
            store.writes.last(),
            Some(&(date("2025-03-04"), hour(5), "tuesday!".to_string()))
        );
    }

    #[test]
    fn external_copy_only_touches_clean_slots() {
        let (mut ed, _clock) = editor(None);
        ed.change(hour(1), "typing");

        let mut remote = Day::new(date("2025-03-03"));
        remote.upsert(hour(1), "remote one", Utc::now());
        remote.upsert(hour(2), "remote two", Utc::now());

        assert_eq!(ed.apply_external(&remote), vec![hour(2)]);
        assert_eq!(ed.value(hour(1)), "typing");
        assert_eq!(ed.value(hour(2)), "remote two");
    }

    #[test]
    fn dispose_saves_dirty_slots() {
        let tmp = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        let (mut ed, _clock) = editor(None);
        ed.change(hour(22), "bed");
        ed.dispose(&mut store, tmp.path());
        assert_eq!(store.writes, vec![(date("2025-03-03"), hour(22), "bed".to_string())]);
        assert!(read_recovery_entries(tmp.path(), None).is_empty());
    }

    #[test]
    fn dispose_failure_goes_to_recovery_log() {
        let tmp = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        store.fail_writes = true;
        let (mut ed, _clock) = editor(None);
        ed.change(hour(22), "do not lose this");
        ed.dispose(&mut store, tmp.path());

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].body, "do not lose this");
    }
}
