pub mod autosave;
pub mod cli;
pub mod io;
pub mod model;
pub mod swipe;
pub mod tui;
pub mod util;
