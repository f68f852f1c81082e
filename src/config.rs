use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".movie-bookmark-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "movies.sqlite";
/// Log file written next to the database. The terminal belongs to the TUI so
/// tracing output has to go somewhere else.
const LOG_FILE_NAME: &str = "movie-bookmark-manager.log";
/// Environment variable that relocates the data directory.
const HOME_ENV: &str = "MOVIE_BOOKMARKS_HOME";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    /// Resolve paths from the environment (and a `.env` file when present),
    /// falling back to a hidden folder in the user's home.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let data_dir = match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let base_dirs =
                    BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
                base_dirs.home_dir().join(DATA_DIR_NAME)
            }
        };

        Ok(Self::in_dir(data_dir))
    }

    /// Lay out the database and log files inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let data_dir = dir.as_ref().to_path_buf();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_path: data_dir.join(LOG_FILE_NAME),
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_inside_the_data_dir() {
        let config = Config::in_dir("/tmp/movies");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/movies"));
        assert_eq!(config.db_path, PathBuf::from("/tmp/movies/movies.sqlite"));
        assert_eq!(
            config.log_path,
            PathBuf::from("/tmp/movies/movie-bookmark-manager.log")
        );
    }
}
