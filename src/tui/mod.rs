pub mod app;
pub mod input;
pub mod render;
pub mod rows;
pub mod theme;

pub use app::run;
