use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, Timelike};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::autosave::{Clock, DayEditor, SystemClock};
use crate::io::recovery::log_day_deletion;
use crate::io::store::{FileStore, JournalStore};
use crate::io::watcher::DayWatcher;
use crate::model::{DateKey, Day, Hour, JournalConfig};
use crate::swipe::SwipeController;
use crate::util::unicode::grapheme_len;

use super::input;
use super::render;
use super::rows::{SharedPaint, row_handles};
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Days that have notes, newest first
    Notes,
    /// The 24 hour slots of one day
    Day,
}

/// A delete waiting for y/n
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmDelete {
    pub date: DateKey,
}

/// A mouse press on a notes row that has not been released yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub date: DateKey,
    pub column: u16,
    /// The drag turned into a vertical scroll
    pub abandoned: bool,
}

/// Where a notes row was drawn, for mouse hit tests
#[derive(Debug, Clone, Copy)]
pub struct RowHit {
    pub date: DateKey,
    pub area: Rect,
}

/// Main application state
pub struct App {
    pub store: Box<dyn JournalStore>,
    pub journal_dir: PathBuf,
    pub config: JournalConfig,
    pub theme: Theme,
    pub clock: SystemClock,
    pub today: DateKey,
    pub view: View,
    pub should_quit: bool,
    /// Days shown in the notes list
    pub days: Vec<Day>,
    pub notes_cursor: usize,
    pub notes_scroll: usize,
    pub press: Option<Press>,
    pub swipe: SwipeController<DateKey>,
    /// Paint state behind each bound row's swipe handles
    pub row_paints: HashMap<DateKey, SharedPaint>,
    /// Filled in by the notes renderer
    pub row_hits: Vec<RowHit>,
    /// Filled in by the day renderer
    pub slot_hits: Vec<(Hour, Rect)>,
    pub editor: Option<DayEditor<SystemClock>>,
    /// Focused hour in the day view
    pub focus: Hour,
    /// Cursor position (in graphemes) inside the focused slot
    pub edit_cursor: usize,
    pub day_scroll: usize,
    pub confirm: Option<ConfirmDelete>,
    pub status_message: Option<String>,
    pub watcher: Option<DayWatcher>,
}

impl App {
    pub fn new(
        store: Box<dyn JournalStore>,
        journal_dir: &Path,
        config: JournalConfig,
        today: DateKey,
    ) -> Self {
        let theme = Theme::from_config(&config.ui);
        let swipe = SwipeController::new(config.swipe.clone());
        let mut app = App {
            store,
            journal_dir: journal_dir.to_path_buf(),
            config,
            theme,
            clock: SystemClock::new(),
            today,
            view: View::Notes,
            should_quit: false,
            days: Vec::new(),
            notes_cursor: 0,
            notes_scroll: 0,
            press: None,
            swipe,
            row_paints: HashMap::new(),
            row_hits: Vec::new(),
            slot_hits: Vec::new(),
            editor: None,
            focus: Hour::MIDNIGHT,
            edit_cursor: 0,
            day_scroll: 0,
            confirm: None,
            status_message: None,
            watcher: None,
        };
        app.reload_days();
        app
    }

    /// Horizontal pixels per terminal column.
    pub fn cell_width(&self) -> f64 {
        self.config.ui.cell_width_px.max(1.0)
    }

    /// Columns covered by the revealed delete action.
    pub fn reveal_cols(&self) -> u16 {
        (self.config.swipe.reveal_width / self.cell_width()).round() as u16
    }

    /// Map a terminal cell to gesture coordinates. Cells are roughly twice
    /// as tall as they are wide.
    pub fn cell_to_px(&self, column: u16, row: u16) -> (f64, f64) {
        let w = self.cell_width();
        (column as f64 * w, row as f64 * w * 2.0)
    }

    pub fn selected_date(&self) -> Option<DateKey> {
        self.days.get(self.notes_cursor).map(|d| d.date)
    }

    // -----------------------------------------------------------------------
    // Notes list
    // -----------------------------------------------------------------------

    /// Reload listed days from the store and bind a swipe row for each.
    pub fn reload_days(&mut self) {
        match self.store.load_all_days() {
            Ok(days) => self.days = days.into_iter().filter(|d| d.has_content()).collect(),
            Err(e) => {
                self.days.clear();
                self.status_message = Some(format!("could not load days: {}", e));
            }
        }
        self.sync_rows();
        self.notes_cursor = self.notes_cursor.min(self.days.len().saturating_sub(1));
    }

    fn sync_rows(&mut self) {
        let listed: Vec<DateKey> = self.days.iter().map(|d| d.date).collect();
        let stale: Vec<DateKey> = self
            .row_paints
            .keys()
            .filter(|d| !listed.contains(d))
            .copied()
            .collect();
        for date in stale {
            self.swipe.unbind_row(&date);
            self.row_paints.remove(&date);
        }

        for date in listed {
            if self.row_paints.contains_key(&date) {
                continue;
            }
            let paint = SharedPaint::default();
            let (visual, background) = row_handles(&paint, self.clock);
            // Today's row cannot be deleted, so it has nothing to reveal
            if date == self.today {
                self.swipe.bind_row(date, Box::new(visual), None);
            } else {
                self.swipe
                    .bind_row(date, Box::new(visual), Some(Box::new(background)));
            }
            self.row_paints.insert(date, paint);
        }
    }

    pub fn request_delete(&mut self, date: DateKey) {
        if date != self.today {
            self.confirm = Some(ConfirmDelete { date });
        }
    }

    pub fn confirm_delete(&mut self) {
        let Some(ConfirmDelete { date }) = self.confirm.take() else {
            return;
        };
        if let Ok(Some(day)) = self.store.load_day(date) {
            log_day_deletion(&self.journal_dir, &day);
        }
        match self.store.delete_day(date) {
            Ok(()) => {
                self.swipe.unbind_row(&date);
                self.row_paints.remove(&date);
                self.status_message = Some(format!("deleted {}", date.display_long()));
            }
            Err(e) => self.status_message = Some(format!("delete failed: {}", e)),
        }
        self.reload_days();
    }

    pub fn cancel_delete(&mut self) {
        self.confirm = None;
    }

    // -----------------------------------------------------------------------
    // Day view
    // -----------------------------------------------------------------------

    fn load_day(&mut self, date: DateKey) -> Option<Day> {
        match self.store.load_day(date) {
            Ok(day) => day,
            Err(e) => {
                self.status_message = Some(format!("could not load {}: {}", date, e));
                None
            }
        }
    }

    pub fn open_day(&mut self, date: DateKey) {
        let day = self.load_day(date);
        let debounce = Duration::from_millis(self.config.autosave.debounce_ms);
        self.editor = Some(DayEditor::new(date, day.as_ref(), debounce, self.clock));
        let start_hour = if date == self.today {
            Hour::new(Local::now().hour() as u8).ok()
        } else {
            None
        };
        self.day_scroll = 0;
        self.set_focus(start_hour.unwrap_or(Hour::MIDNIGHT));
        self.view = View::Day;
    }

    fn set_focus(&mut self, hour: Hour) {
        self.focus = hour;
        self.edit_cursor = grapheme_len(self.focused_text());
    }

    pub fn focused_text(&self) -> &str {
        self.editor.as_ref().map_or("", |ed| ed.value(self.focus))
    }

    /// Move focus to `hour`, saving the slot that loses focus.
    pub fn focus_slot(&mut self, hour: Hour) {
        if hour == self.focus {
            return;
        }
        if let Some(editor) = self.editor.as_mut()
            && let Err(e) = editor.blur(self.focus, self.store.as_mut())
        {
            self.status_message = Some(e.to_string());
        }
        self.set_focus(hour);
    }

    /// Replace the focused slot's text and put the cursor at `cursor`.
    pub fn edit_focused(&mut self, text: String, cursor: usize) {
        if let Some(editor) = self.editor.as_mut() {
            editor.change(self.focus, text);
            self.edit_cursor = cursor;
        }
    }

    /// Flush the current day and show the day `forward` or back from it.
    pub fn step_day(&mut self, forward: bool) {
        let Some(current) = self.editor.as_ref().map(|ed| ed.date()) else {
            return;
        };
        if let Some(editor) = self.editor.as_mut()
            && let Err(e) = editor.flush(self.store.as_mut())
        {
            // Keep the unsaved text on screen rather than dropping it
            self.status_message = Some(e.to_string());
            return;
        }
        let next = if forward { current.succ() } else { current.pred() };
        let day = self.load_day(next);
        if let Some(editor) = self.editor.as_mut() {
            editor.switch_day(next, day.as_ref());
        }
        let focus = self.focus;
        self.set_focus(focus);
    }

    /// Leave the day view. Pending edits get a final best-effort save.
    pub fn close_day(&mut self) {
        if let Some(editor) = self.editor.take() {
            editor.dispose(self.store.as_mut(), &self.journal_dir);
        }
        self.view = View::Notes;
        self.reload_days();
    }

    pub fn quit(&mut self) {
        if self.editor.is_some() {
            self.close_day();
        }
        self.should_quit = true;
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// Advance row animations, fire due autosaves and pick up external edits.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        let landed: Vec<DateKey> = self
            .row_paints
            .iter()
            .filter_map(|(date, paint)| paint.borrow_mut().advance(now).then_some(*date))
            .collect();
        for date in landed {
            self.swipe.transition_end(&date);
        }

        if let Some(editor) = self.editor.as_mut() {
            for err in editor.tick(self.store.as_mut()) {
                self.status_message = Some(err.to_string());
            }
        }

        let changed = self.watcher.as_ref().map(|w| w.poll()).unwrap_or_default();
        if !changed.is_empty() {
            self.apply_external_changes(&changed);
        }
    }

    pub fn apply_external_changes(&mut self, dates: &[DateKey]) {
        match self.view {
            View::Notes => {
                if self.swipe.session().is_none() {
                    self.reload_days();
                }
            }
            View::Day => {
                let Some(date) = self.editor.as_ref().map(|ed| ed.date()) else {
                    return;
                };
                if !dates.contains(&date) {
                    return;
                }
                let Some(day) = self.load_day(date) else {
                    return;
                };
                let updated = self
                    .editor
                    .as_mut()
                    .map(|ed| ed.apply_external(&day))
                    .unwrap_or_default();
                if updated.contains(&self.focus) {
                    let focus = self.focus;
                    self.set_focus(focus);
                }
            }
        }
    }
}

/// Run the TUI application
pub fn run(journal_dir: &Path, config: JournalConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open(journal_dir)?;
    let watcher = DayWatcher::start(&store.days_dir()).ok();
    let mut app = App::new(Box::new(store), journal_dir, config, DateKey::today());
    app.watcher = watcher;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Flush anything still being edited, even after an error
    if app.editor.is_some() {
        app.close_day();
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }
        app.tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
