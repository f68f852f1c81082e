//! File-backed persistence tests: schema creation is idempotent, movies
//! survive a reopen, and an unusable path fails initialization.

use std::fs;

use movie_bookmark_manager::{
    create_movie, delete_movie, ensure_schema, fetch_movies, update_movie, Config, Genre,
    MovieDraft, Rating,
};
use tempfile::tempdir;

fn draft(title: &str, genre: Genre, rating: u8, favorite: bool) -> MovieDraft {
    MovieDraft {
        title: title.to_string(),
        genre,
        rating: Rating::new(rating).unwrap(),
        favorite,
    }
}

#[test]
fn schema_creation_is_idempotent() {
    let dir = tempdir().unwrap();
    let config = Config::in_dir(dir.path().join("nested"));

    {
        let conn = ensure_schema(&config.db_path).unwrap();
        create_movie(&conn, &draft("Inception", Genre::SciFi, 9, true)).unwrap();
    }

    let conn = ensure_schema(&config.db_path).unwrap();
    let movies = fetch_movies(&conn).unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].to_draft(), draft("Inception", Genre::SciFi, 9, true));
}

#[test]
fn edits_survive_reopen() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("movies.sqlite");

    let (kept_id, removed_id) = {
        let conn = ensure_schema(&db_path).unwrap();
        let kept = create_movie(&conn, &draft("Heat", Genre::Action, 7, false)).unwrap();
        let removed = create_movie(&conn, &draft("Alien", Genre::Horror, 8, true)).unwrap();
        update_movie(&conn, kept.id, &draft("Heat", Genre::Thriller, 10, true)).unwrap();
        delete_movie(&conn, removed.id).unwrap();
        (kept.id, removed.id)
    };

    let conn = ensure_schema(&db_path).unwrap();
    let movies = fetch_movies(&conn).unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].id, kept_id);
    assert_ne!(movies[0].id, removed_id);
    assert_eq!(movies[0].genre, Genre::Thriller);
    assert_eq!(movies[0].rating.value(), 10);
    assert!(movies[0].favorite);
}

#[test]
fn unusable_path_fails_initialization() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"plain file").unwrap();

    let result = ensure_schema(&blocker.join("movies.sqlite"));

    assert!(result.is_err());
}
