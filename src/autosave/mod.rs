//! Debounced autosave for editable hour slots.
//!
//! `AutosaveSlot` is the per-slot state machine (idle, pending, saving)
//! with a watermark of the last acknowledged value. `DayEditor` runs a
//! day's slots against a `JournalStore`.

pub mod clock;
pub mod editor;
pub mod slot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use editor::DayEditor;
pub use slot::{AutosaveError, AutosaveSlot, SaveRequest, SaveTicket, SlotKey, SlotPhase};
