use rusqlite::{ffi, params, Connection, Error as SqlError, Row};
use tracing::debug;

use crate::error::{storage, MovieError, Result};
use crate::models::{Movie, MovieDraft};

/// Retrieve every movie sorted by title. The query is the single source of
/// truth for how the table orders rows.
pub fn fetch_movies(conn: &Connection) -> Result<Vec<Movie>> {
    let mut stmt = conn
        .prepare("SELECT id, title, genre, rating, favorite FROM movies ORDER BY title")
        .map_err(storage("load movies"))?;

    let movies = stmt
        .query_map([], movie_from_row)
        .map_err(storage("load movies"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(storage("load movies"))?;

    Ok(movies)
}

/// Insert a new movie, returning the hydrated row so callers can log or focus
/// it without re-querying.
pub fn create_movie(conn: &Connection, draft: &MovieDraft) -> Result<Movie> {
    conn.execute(
        "INSERT INTO movies (title, genre, rating, favorite) VALUES (?1, ?2, ?3, ?4)",
        params![draft.title, draft.genre, draft.rating, draft.favorite],
    )
    .map_err(|err| map_unique_constraint(err, &draft.title, "add movie"))?;

    Ok(Movie {
        id: conn.last_insert_rowid(),
        title: draft.title.clone(),
        genre: draft.genre,
        rating: draft.rating,
        favorite: draft.favorite,
    })
}

/// Overwrite every editable field of the movie with `id`. A missing id is not
/// an error; nothing is written.
pub fn update_movie(conn: &Connection, id: i64, draft: &MovieDraft) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE movies SET title = ?1, genre = ?2, rating = ?3, favorite = ?4 WHERE id = ?5",
            params![draft.title, draft.genre, draft.rating, draft.favorite, id],
        )
        .map_err(|err| map_unique_constraint(err, &draft.title, "update movie"))?;

    if updated == 0 {
        debug!(id, "update matched no movie");
    }
    Ok(())
}

/// Remove the movie row. A missing id is not an error.
pub fn delete_movie(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM movies WHERE id = ?1", params![id])
        .map_err(storage("delete movie"))?;

    if deleted == 0 {
        debug!(id, "delete matched no movie");
    }
    Ok(())
}

fn movie_from_row(row: &Row<'_>) -> rusqlite::Result<Movie> {
    Ok(Movie {
        id: row.get(0)?,
        title: row.get(1)?,
        genre: row.get(2)?,
        rating: row.get(3)?,
        favorite: row.get(4)?,
    })
}

/// Titles are the only unique column, so a uniqueness failure always means a
/// duplicate title. Anything else stays a generic storage error.
fn map_unique_constraint(err: SqlError, title: &str, action: &'static str) -> MovieError {
    match err {
        SqlError::SqliteFailure(ref code, _)
            if code.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            MovieError::DuplicateTitle {
                title: title.to_string(),
            }
        }
        source => MovieError::Storage { action, source },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::models::{Genre, Rating};

    fn draft(title: &str, genre: Genre, rating: u8, favorite: bool) -> MovieDraft {
        MovieDraft {
            title: title.to_string(),
            genre,
            rating: Rating::new(rating).unwrap(),
            favorite,
        }
    }

    #[test]
    fn created_movie_is_listed_with_same_values() {
        let conn = open_in_memory().unwrap();
        let inception = draft("Inception", Genre::SciFi, 9, true);

        let created = create_movie(&conn, &inception).unwrap();
        let movies = fetch_movies(&conn).unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0], created);
        assert_eq!(movies[0].to_draft(), inception);
    }

    #[test]
    fn duplicate_title_is_rejected() {
        let conn = open_in_memory().unwrap();
        create_movie(&conn, &draft("Inception", Genre::SciFi, 9, true)).unwrap();

        let err = create_movie(&conn, &draft("Inception", Genre::Drama, 5, false)).unwrap_err();

        assert!(matches!(err, MovieError::DuplicateTitle { ref title } if title == "Inception"));
        let movies = fetch_movies(&conn).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].genre, Genre::SciFi);
    }

    #[test]
    fn listing_is_sorted_by_title() {
        let conn = open_in_memory().unwrap();
        for title in ["Zodiac", "Alien", "Memento", "Heat"] {
            create_movie(&conn, &draft(title, Genre::Thriller, 7, false)).unwrap();
        }

        let titles: Vec<String> = fetch_movies(&conn)
            .unwrap()
            .into_iter()
            .map(|movie| movie.title)
            .collect();

        assert_eq!(titles, ["Alien", "Heat", "Memento", "Zodiac"]);
    }

    #[test]
    fn update_keeps_id_and_row_count() {
        let conn = open_in_memory().unwrap();
        let alien = create_movie(&conn, &draft("Alien", Genre::Horror, 8, false)).unwrap();
        create_movie(&conn, &draft("Heat", Genre::Action, 7, false)).unwrap();

        let edited = draft("Aliens", Genre::Action, 9, true);
        update_movie(&conn, alien.id, &edited).unwrap();

        let movies = fetch_movies(&conn).unwrap();
        assert_eq!(movies.len(), 2);
        let updated = movies.iter().find(|movie| movie.id == alien.id).unwrap();
        assert_eq!(updated.to_draft(), edited);
    }

    #[test]
    fn update_of_missing_id_is_a_no_op() {
        let conn = open_in_memory().unwrap();
        let heat = create_movie(&conn, &draft("Heat", Genre::Action, 7, false)).unwrap();

        update_movie(&conn, heat.id + 100, &draft("Other", Genre::Drama, 2, true)).unwrap();

        assert_eq!(fetch_movies(&conn).unwrap(), vec![heat]);
    }

    #[test]
    fn update_into_existing_title_reports_duplicate() {
        let conn = open_in_memory().unwrap();
        create_movie(&conn, &draft("Alien", Genre::Horror, 8, false)).unwrap();
        let heat = create_movie(&conn, &draft("Heat", Genre::Action, 7, false)).unwrap();

        let err =
            update_movie(&conn, heat.id, &draft("Alien", Genre::Action, 7, false)).unwrap_err();

        assert!(matches!(err, MovieError::DuplicateTitle { .. }));
        assert!(fetch_movies(&conn).unwrap().contains(&heat));
    }

    #[test]
    fn delete_removes_exactly_one_row() {
        let conn = open_in_memory().unwrap();
        let alien = create_movie(&conn, &draft("Alien", Genre::Horror, 8, false)).unwrap();
        let heat = create_movie(&conn, &draft("Heat", Genre::Action, 7, false)).unwrap();

        delete_movie(&conn, alien.id).unwrap();
        delete_movie(&conn, alien.id).unwrap();

        assert_eq!(fetch_movies(&conn).unwrap(), vec![heat]);
    }

    #[test]
    fn unreadable_rows_surface_as_storage_errors() {
        let conn = open_in_memory().unwrap();
        conn.execute(
            "INSERT INTO movies (title, genre, rating, favorite) VALUES ('Odd', 'Western', 5, 0)",
            [],
        )
        .unwrap();

        let err = fetch_movies(&conn).unwrap_err();

        assert!(matches!(err, MovieError::Storage { action: "load movies", .. }));
    }

    #[test]
    fn out_of_range_rating_is_a_read_error() {
        let conn = open_in_memory().unwrap();
        conn.execute(
            "INSERT INTO movies (title, genre, rating, favorite) VALUES ('Loud', 'Action', 11, 0)",
            [],
        )
        .unwrap();

        let err = fetch_movies(&conn).unwrap_err();

        assert!(matches!(err, MovieError::Storage { action: "load movies", .. }));
    }
}
