//! Error kinds surfaced to the user. Everything except `Initialization` is
//! recoverable: the UI reports it in a modal notice and keeps the form.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Could not initialize database: {0:#}")]
    Initialization(anyhow::Error),

    #[error("A movie with the title '{title}' already exists.")]
    DuplicateTitle { title: String },

    #[error("{0}")]
    Selection(&'static str),

    #[error("{0}")]
    Validation(&'static str),

    #[error("Could not {action}: {source}")]
    Storage {
        action: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl MovieError {
    /// Title for the dialog that reports this error.
    pub fn heading(&self) -> &'static str {
        match self {
            MovieError::Validation(_) => "Input Error",
            MovieError::Selection(_) => "Selection Error",
            MovieError::Initialization(_)
            | MovieError::DuplicateTitle { .. }
            | MovieError::Storage { .. } => "Database Error",
        }
    }
}

/// Build a `map_err` adapter that tags a SQLite failure with the action that
/// was being attempted.
pub(crate) fn storage(action: &'static str) -> impl FnOnce(rusqlite::Error) -> MovieError {
    move |source| MovieError::Storage { action, source }
}

pub type Result<T, E = MovieError> = std::result::Result<T, E>;
