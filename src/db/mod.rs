//! Persistence module split across logical submodules.

mod connection;
mod movies;

pub use connection::{ensure_schema, open_in_memory};
pub use movies::{create_movie, delete_movie, fetch_movies, update_movie};
