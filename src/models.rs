//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. These types stay light-weight data holders so the other layers can
//! focus on presentation and persistence logic.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use thiserror::Error;

/// The fixed set of genres a movie can be filed under. The declaration order
/// is the order the form cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Genre {
    #[default]
    Action,
    Comedy,
    Drama,
    Horror,
    SciFi,
    Romance,
    Thriller,
}

impl Genre {
    pub const ALL: [Genre; 7] = [
        Genre::Action,
        Genre::Comedy,
        Genre::Drama,
        Genre::Horror,
        Genre::SciFi,
        Genre::Romance,
        Genre::Thriller,
    ];

    /// Label shown in the UI and stored in the `genre` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::SciFi => "Sci-Fi",
            Genre::Romance => "Romance",
            Genre::Thriller => "Thriller",
        }
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|genre| *genre == self)
            .unwrap_or_default()
    }

    /// Following genre in display order, wrapping back to the first.
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Preceding genre in display order, wrapping around to the last.
    pub fn previous(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name one of the known genres.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown genre '{0}'")]
pub struct UnknownGenre(pub String);

impl FromStr for Genre {
    type Err = UnknownGenre;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str() == s)
            .ok_or_else(|| UnknownGenre(s.to_string()))
    }
}

impl ToSql for Genre {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Genre {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

/// A score between [`Rating::MIN`] and [`Rating::MAX`] inclusive. The bounds
/// are enforced at construction so a `Rating` is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// One step up, holding at the maximum.
    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(1).min(Self::MAX))
    }

    /// One step down, holding at the minimum.
    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN))
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for Rating {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.0)))
    }
}

impl FromSql for Rating {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_i64()?;
        u8::try_from(raw)
            .ok()
            .and_then(Rating::new)
            .ok_or(FromSqlError::OutOfRange(raw))
    }
}

/// Validated field values ready to be written by a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDraft {
    pub title: String,
    pub genre: Genre,
    pub rating: Rating,
    pub favorite: bool,
}

/// One row of the `movies` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    /// Primary key generated by SQLite. Never changes after insertion.
    pub id: i64,
    /// Unique across all movies.
    pub title: String,
    pub genre: Genre,
    pub rating: Rating,
    pub favorite: bool,
}

impl Movie {
    /// Copy the editable fields out of the row, e.g. to prefill the form.
    pub fn to_draft(&self) -> MovieDraft {
        MovieDraft {
            title: self.title.clone(),
            genre: self.genre,
            rating: self.rating,
            favorite: self.favorite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_labels_parse_back() {
        assert_eq!("Sci-Fi".parse::<Genre>().unwrap(), Genre::SciFi);
        assert_eq!(Genre::SciFi.to_string(), "Sci-Fi");
        assert_eq!(
            "Western".parse::<Genre>(),
            Err(UnknownGenre("Western".to_string()))
        );
    }

    #[test]
    fn genre_cycling_wraps() {
        assert_eq!(Genre::Thriller.next(), Genre::Action);
        assert_eq!(Genre::Action.previous(), Genre::Thriller);
        assert_eq!(Genre::Drama.next(), Genre::Horror);
    }

    #[test]
    fn rating_stays_in_bounds() {
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(11).is_none());
        let max = Rating::new(10).unwrap();
        assert_eq!(max.increment(), max);
        assert_eq!(Rating::default().decrement().value(), 1);
        assert_eq!(Rating::new(5).unwrap().increment().value(), 6);
    }
}
