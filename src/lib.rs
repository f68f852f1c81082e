//! Core library surface for the Movie Bookmark Manager TUI application.
//!
//! The `bin` target only wires these pieces together; keeping them in a
//! library lets the integration tests drive the persistence layer directly.
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer.
pub use db::{create_movie, delete_movie, ensure_schema, fetch_movies, update_movie};

pub use config::Config;
pub use error::MovieError;
pub use models::{Genre, Movie, MovieDraft, Rating};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
