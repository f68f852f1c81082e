use std::mem;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::db::{create_movie, delete_movie, fetch_movies, update_movie};
use crate::error::{MovieError, Result};
use crate::models::Movie;

use super::forms::{ConfirmMovieDelete, MovieField, MovieForm};
use super::helpers::{centered_rect, favorite_label, key_hints};

/// Form block height: the id line, four fields, and the border.
const FORM_HEIGHT: u16 = 7;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown in the table.
const PAGE_STEP: isize = 5;

/// Where keyboard input goes while no dialog is open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Focus {
    Field(MovieField),
    Table,
}

/// Dialog layered over the main screen, if any.
enum Mode {
    Normal,
    ConfirmDelete(ConfirmMovieDelete),
    Notice(Notice),
}

/// Modal report of a recoverable error.
struct Notice {
    heading: &'static str,
    message: String,
}

impl From<&MovieError> for Notice {
    fn from(err: &MovieError) -> Self {
        Self {
            heading: err.heading(),
            message: err.to_string(),
        }
    }
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. Owns the database connection for the lifetime
/// of the program; dropping the `App` closes it.
pub struct App {
    conn: Connection,
    movies: Vec<Movie>,
    selected: Option<usize>,
    form: MovieForm,
    focus: Focus,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app around an initialized connection and load the table. A
    /// failed initial load is reported in a dialog rather than aborting.
    pub fn new(conn: Connection) -> Self {
        let mut app = Self {
            conn,
            movies: Vec::new(),
            selected: None,
            form: MovieForm::default(),
            focus: Focus::Field(MovieField::Title),
            mode: Mode::Normal,
            status: None,
        };
        if let Err(err) = app.reload_movies() {
            app.mode = app.report(err);
        }
        app
    }

    /// Dispatch a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Notice(notice) => self.handle_notice(code, notice),
        };

        exit
    }

    /// Dispatch a full key event. Control chords map to commands and never
    /// reach the form as plain characters. Returns `true` on quit.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if !key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.handle_key(key.code);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') => return true,
            KeyCode::Char('a') => self.add_movie(),
            KeyCode::Char('u') => self.update_movie(),
            KeyCode::Char('d') => self.request_delete(),
            KeyCode::Char('n') => self.reset_form(),
            _ => {}
        }
        false
    }

    /// Insert the form contents as a new movie, whatever the form mode.
    pub fn add_movie(&mut self) {
        if matches!(self.mode, Mode::Normal) {
            self.mode = self.run_add();
        }
    }

    /// Save the form over the movie it was loaded from.
    pub fn update_movie(&mut self) {
        if matches!(self.mode, Mode::Normal) {
            self.mode = self.run_update();
        }
    }

    /// Ask for confirmation before deleting the selected table row.
    pub fn request_delete(&mut self) {
        if matches!(self.mode, Mode::Normal) {
            self.mode = self.begin_delete();
        }
    }

    /// Back to insert mode with an empty form and no table selection.
    pub fn reset_form(&mut self) {
        if matches!(self.mode, Mode::Normal) {
            self.clear_form();
        }
    }

    /// Pasted text replaces the title.
    pub fn handle_paste(&mut self, text: &str) {
        if matches!(self.mode, Mode::Normal) {
            self.form.paste_title(text);
            self.focus = Focus::Field(MovieField::Title);
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match self.focus {
            Focus::Table => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc => self.clear_form(),
                KeyCode::Up => self.move_selection(-1),
                KeyCode::Down => self.move_selection(1),
                KeyCode::PageUp => self.move_selection(-PAGE_STEP),
                KeyCode::PageDown => self.move_selection(PAGE_STEP),
                KeyCode::Home => self.select_row(0),
                KeyCode::End => self.select_row(self.movies.len().saturating_sub(1)),
                KeyCode::Tab | KeyCode::Enter => self.focus = Focus::Field(MovieField::Title),
                KeyCode::BackTab => self.focus = Focus::Field(MovieField::Favorite),
                KeyCode::Char('d') | KeyCode::Delete => return self.begin_delete(),
                _ => {}
            },
            Focus::Field(field) => match code {
                KeyCode::Esc => self.clear_form(),
                KeyCode::Tab | KeyCode::Down => {
                    self.focus = field.next().map(Focus::Field).unwrap_or(Focus::Table);
                }
                KeyCode::BackTab => {
                    self.focus = field.previous().map(Focus::Field).unwrap_or(Focus::Table);
                }
                KeyCode::Up => {
                    if let Some(previous) = field.previous() {
                        self.focus = Focus::Field(previous);
                    }
                }
                KeyCode::Enter => {
                    return if self.form.is_editing() {
                        self.run_update()
                    } else {
                        self.run_add()
                    };
                }
                KeyCode::Backspace if field == MovieField::Title => self.form.backspace(),
                KeyCode::Char(ch) if field == MovieField::Title => {
                    self.form.push_char(ch);
                }
                KeyCode::Left => self.form.adjust(field, false),
                KeyCode::Right => self.form.adjust(field, true),
                KeyCode::Char('-') if field == MovieField::Rating => self.form.adjust(field, false),
                KeyCode::Char('+') if field == MovieField::Rating => self.form.adjust(field, true),
                KeyCode::Char(' ') if field == MovieField::Favorite => {
                    self.form.adjust(field, true)
                }
                _ => {}
            },
        }
        Mode::Normal
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmMovieDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(message) => self.after_mutation(message),
                    Err(err) => self.report(err),
                }
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_notice(&mut self, code: KeyCode, notice: Notice) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => Mode::Normal,
            _ => Mode::Notice(notice),
        }
    }

    fn run_add(&mut self) -> Mode {
        match self.save_new_movie() {
            Ok(message) => self.after_mutation(message),
            Err(err) => self.report(err),
        }
    }

    fn run_update(&mut self) -> Mode {
        match self.save_existing_movie() {
            Ok(message) => self.after_mutation(message),
            Err(err) => self.report(err),
        }
    }

    fn begin_delete(&mut self) -> Mode {
        match self.selected_movie() {
            Some(movie) => Mode::ConfirmDelete(ConfirmMovieDelete::from(movie)),
            None => self.report(MovieError::Selection("Please select a movie to delete.")),
        }
    }

    fn save_new_movie(&mut self) -> Result<String> {
        let draft = self.form.parse_inputs()?;
        let movie = create_movie(&self.conn, &draft)?;
        info!(id = movie.id, title = %movie.title, "movie added");
        Ok(format!("Successfully added '{}'!", movie.title))
    }

    fn save_existing_movie(&mut self) -> Result<String> {
        let id = self.form.id.ok_or(MovieError::Selection(
            "Please select a movie from the table to update.",
        ))?;
        let draft = self.form.parse_inputs()?;
        update_movie(&self.conn, id, &draft)?;
        info!(id, title = %draft.title, "movie updated");
        Ok(format!("Successfully updated '{}'!", draft.title))
    }

    fn perform_delete(&mut self, confirm: &ConfirmMovieDelete) -> Result<String> {
        delete_movie(&self.conn, confirm.id)?;
        info!(id = confirm.id, title = %confirm.title, "movie deleted");
        Ok(format!("Successfully deleted '{}'!", confirm.title))
    }

    /// Every successful write resets the form and reloads the whole table.
    /// The write is already committed, so a failed reload opens the notice
    /// but leaves the success message in the footer.
    fn after_mutation(&mut self, message: String) -> Mode {
        self.clear_form();
        self.set_status(message, StatusKind::Info);
        match self.reload_movies() {
            Ok(()) => Mode::Normal,
            Err(err) => {
                warn!(error = %err, "reload after write failed");
                Mode::Notice(Notice::from(&err))
            }
        }
    }

    fn reload_movies(&mut self) -> Result<()> {
        self.movies = fetch_movies(&self.conn)?;
        if self.selected.is_some_and(|idx| idx >= self.movies.len()) {
            self.selected = None;
        }
        debug!(count = self.movies.len(), "movie table reloaded");
        Ok(())
    }

    /// Log the error, echo it in the footer, and open the notice dialog.
    fn report(&mut self, err: MovieError) -> Mode {
        warn!(error = %err, "operation failed");
        let notice = Notice::from(&err);
        self.set_status(notice.message.clone(), StatusKind::Error);
        Mode::Notice(notice)
    }

    fn clear_form(&mut self) {
        self.form.clear();
        self.selected = None;
    }

    fn selected_movie(&self) -> Option<&Movie> {
        self.selected.and_then(|idx| self.movies.get(idx))
    }

    fn move_selection(&mut self, offset: isize) {
        if self.movies.is_empty() {
            return;
        }
        let last = self.movies.len() as isize - 1;
        let target = match self.selected {
            Some(current) => (current as isize + offset).clamp(0, last),
            None => 0,
        };
        self.select_row(target as usize);
    }

    /// Highlight a table row and load it into the form (edit mode).
    fn select_row(&mut self, index: usize) {
        if let Some(movie) = self.movies.get(index) {
            self.form.load(movie);
            self.selected = Some(index);
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FORM_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Notice(notice) => self.draw_notice(frame, area, notice),
            Mode::Normal => {}
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let title = if self.form.is_editing() {
            "Movie Details • Edit"
        } else {
            "Movie Details • Insert"
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);

        let fields = [
            MovieField::Title,
            MovieField::Genre,
            MovieField::Rating,
            MovieField::Favorite,
        ];
        let mut lines = vec![self.form.id_line()];
        lines.extend(
            fields
                .into_iter()
                .map(|field| self.form.build_line(field, self.focus == Focus::Field(field))),
        );

        frame.render_widget(Paragraph::new(lines).block(block), area);

        if matches!(self.mode, Mode::Normal)
            && self.focus == Focus::Field(MovieField::Title)
            && inner.height > 1
        {
            let cursor_x = inner
                .x
                .saturating_add(self.form.title_cursor_offset())
                .min(inner.right().saturating_sub(1));
            frame.set_cursor_position((cursor_x, inner.y + 1));
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Movies ({})", self.movies.len()));
        if self.focus == Focus::Table {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }

        if self.movies.is_empty() {
            let message =
                Paragraph::new("No movies yet. Fill in the form and press Ctrl+A to add one.")
                    .alignment(Alignment::Center)
                    .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(["ID", "Title", "Genre", "Rating", "Favorite"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self.movies.iter().map(|movie| {
            Row::new(vec![
                Cell::from(movie.id.to_string()),
                Cell::from(movie.title.clone()),
                Cell::from(movie.genre.as_str()),
                Cell::from(movie.rating.to_string()),
                Cell::from(favorite_label(movie.favorite)),
            ])
        });
        let widths = [
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(9),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = TableState::default().with_selected(self.selected);
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.mode, self.focus) {
            (Mode::ConfirmDelete(_), _) => key_hints(&[("[y]", "Delete"), ("[n/Esc]", "Keep")]),
            (Mode::Notice(_), _) => key_hints(&[("[Enter/Esc]", "Dismiss")]),
            (Mode::Normal, Focus::Table) => key_hints(&[
                ("[↑↓]", "Select"),
                ("[Tab]", "Form"),
                ("[d]", "Delete"),
                ("[Esc]", "Clear"),
                ("[^A]", "Add"),
                ("[^U]", "Update"),
                ("[q]", "Quit"),
            ]),
            (Mode::Normal, Focus::Field(_)) => key_hints(&[
                ("[Tab]", "Next"),
                ("[←→]", "Change"),
                ("[Enter]", "Save"),
                ("[^A]", "Add"),
                ("[^U]", "Update"),
                ("[^D]", "Delete"),
                ("[^N]", "Clear"),
                ("[^Q]", "Quit"),
            ]),
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmMovieDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Are you sure you want to delete '{}'?",
                confirm.title
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(notice.heading)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(notice.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter or Esc to dismiss.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}
