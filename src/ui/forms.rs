use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::error::{MovieError, Result};
use crate::models::{Genre, Movie, MovieDraft, Rating};

/// Shown in place of an id while the form is in insert mode.
pub(crate) const NO_ID: &str = "N/A";

/// Editable fields of the movie form, in focus order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum MovieField {
    #[default]
    Title,
    Genre,
    Rating,
    Favorite,
}

impl MovieField {
    pub(crate) fn next(self) -> Option<Self> {
        match self {
            MovieField::Title => Some(MovieField::Genre),
            MovieField::Genre => Some(MovieField::Rating),
            MovieField::Rating => Some(MovieField::Favorite),
            MovieField::Favorite => None,
        }
    }

    pub(crate) fn previous(self) -> Option<Self> {
        match self {
            MovieField::Title => None,
            MovieField::Genre => Some(MovieField::Title),
            MovieField::Rating => Some(MovieField::Genre),
            MovieField::Favorite => Some(MovieField::Rating),
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            MovieField::Title => "Title",
            MovieField::Genre => "Genre",
            MovieField::Rating => "Rating",
            MovieField::Favorite => "Favorite",
        }
    }
}

/// Internal representation of the movie form. `id` doubles as the mode flag:
/// `None` is insert mode, `Some` is edit mode for that row.
#[derive(Clone, Debug, Default)]
pub(crate) struct MovieForm {
    pub(crate) id: Option<i64>,
    pub(crate) title: String,
    pub(crate) genre: Genre,
    pub(crate) rating: Rating,
    pub(crate) favorite: bool,
}

impl MovieForm {
    /// Prefill every field from a row and switch to edit mode.
    pub(crate) fn load(&mut self, movie: &Movie) {
        self.id = Some(movie.id);
        self.title = movie.title.clone();
        self.genre = movie.genre;
        self.rating = movie.rating;
        self.favorite = movie.favorite;
    }

    /// Back to insert mode with default values.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn id_indicator(&self) -> String {
        self.id
            .map(|id| id.to_string())
            .unwrap_or_else(|| NO_ID.to_string())
    }

    /// Append a printable character to the title.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.title.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.title.pop();
    }

    /// Replace the title with the first line of pasted text.
    pub(crate) fn paste_title(&mut self, text: &str) {
        let first_line = text.lines().next().unwrap_or_default();
        self.title = first_line.chars().filter(|ch| !ch.is_control()).collect();
    }

    /// Step the value of a non-text field. `forward` picks the direction;
    /// the favorite flag simply flips.
    pub(crate) fn adjust(&mut self, field: MovieField, forward: bool) {
        match field {
            MovieField::Title => {}
            MovieField::Genre => {
                self.genre = if forward {
                    self.genre.next()
                } else {
                    self.genre.previous()
                };
            }
            MovieField::Rating => {
                self.rating = if forward {
                    self.rating.increment()
                } else {
                    self.rating.decrement()
                };
            }
            MovieField::Favorite => self.favorite = !self.favorite,
        }
    }

    /// Validate the inputs and return values ready for persistence. Rating
    /// and genre cannot hold invalid values, so only the title is checked.
    pub(crate) fn parse_inputs(&self) -> Result<MovieDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(MovieError::Validation("Movie title cannot be empty."));
        }
        Ok(MovieDraft {
            title: title.to_string(),
            genre: self.genre,
            rating: self.rating,
            favorite: self.favorite,
        })
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: MovieField, active: bool) -> Line<'static> {
        let style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let value = match field {
            MovieField::Title if self.title.is_empty() => {
                let placeholder = if active {
                    style
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                return Line::from(vec![
                    Span::raw(format!("{}: ", field.label())),
                    Span::styled("<required>", placeholder),
                ]);
            }
            MovieField::Title => self.title.clone(),
            MovieField::Genre => format!("< {} >", self.genre),
            MovieField::Rating => format!("< {} > / {}", self.rating, Rating::MAX),
            MovieField::Favorite => {
                let mark = if self.favorite { "x" } else { " " };
                format!("[{mark}] Mark as Favorite")
            }
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(value, style),
        ])
    }

    pub(crate) fn id_line(&self) -> Line<'static> {
        Line::from(vec![
            Span::raw("ID: "),
            Span::styled(
                self.id_indicator(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])
    }

    /// Column where the cursor sits when the title is being typed. Titles
    /// wider than a terminal can address pin to `u16::MAX`.
    pub(crate) fn title_cursor_offset(&self) -> u16 {
        let prefix = format!("{}: ", MovieField::Title.label()).len();
        u16::try_from(prefix + self.title.chars().count()).unwrap_or(u16::MAX)
    }
}

/// State for confirming permanent movie deletion.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmMovieDelete {
    pub(crate) id: i64,
    pub(crate) title: String,
}

impl From<&Movie> for ConfirmMovieDelete {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_movie() -> Movie {
        Movie {
            id: 42,
            title: "Heat".to_string(),
            genre: Genre::Thriller,
            rating: Rating::new(8).unwrap(),
            favorite: true,
        }
    }

    #[test]
    fn blank_title_fails_validation() {
        let mut form = MovieForm::default();
        form.title = "   \t".to_string();

        let err = form.parse_inputs().unwrap_err();

        assert!(matches!(err, MovieError::Validation(_)));
        assert_eq!(err.heading(), "Input Error");
    }

    #[test]
    fn title_is_trimmed_before_saving() {
        let mut form = MovieForm::default();
        form.title = "  Alien  ".to_string();

        assert_eq!(form.parse_inputs().unwrap().title, "Alien");
    }

    #[test]
    fn loading_enters_edit_mode_and_clearing_leaves_it() {
        let mut form = MovieForm::default();
        assert_eq!(form.id_indicator(), NO_ID);

        form.load(&sample_movie());
        assert!(form.is_editing());
        assert_eq!(form.id_indicator(), "42");
        assert_eq!(form.parse_inputs().unwrap(), sample_movie().to_draft());

        form.clear();
        assert!(!form.is_editing());
        assert_eq!(form.title, "");
        assert_eq!(form.genre, Genre::Action);
        assert_eq!(form.rating, Rating::default());
        assert!(!form.favorite);
    }

    #[test]
    fn adjust_steps_each_field() {
        let mut form = MovieForm::default();

        form.adjust(MovieField::Genre, false);
        assert_eq!(form.genre, Genre::Thriller);
        form.adjust(MovieField::Rating, false);
        assert_eq!(form.rating.value(), 1);
        form.adjust(MovieField::Rating, true);
        assert_eq!(form.rating.value(), 2);
        form.adjust(MovieField::Favorite, true);
        assert!(form.favorite);
    }

    #[test]
    fn paste_keeps_only_the_first_line() {
        let mut form = MovieForm::default();
        form.title = "old".to_string();

        form.paste_title("Blade Runner\nsecond line");

        assert_eq!(form.title, "Blade Runner");
    }

    #[test]
    fn cursor_offset_saturates_for_huge_titles() {
        let mut form = MovieForm::default();
        form.title = "Heat".to_string();
        assert_eq!(form.title_cursor_offset(), 11);

        form.paste_title(&"a".repeat(100_000));

        assert_eq!(form.title_cursor_offset(), u16::MAX);
    }
}
