//! Ratatui front-end: a movie form stacked over the table of saved movies.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
