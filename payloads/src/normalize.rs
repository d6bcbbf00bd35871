//! Ordered fallback chains for records whose shape varies between
//! backend versions.
//!
//! Every function here tries its fields in a fixed order and returns the
//! first usable value. String and integer values are accepted; empty
//! strings are skipped.

use crate::MovieId;
use serde_json::Value;

/// Id of any backend record.
///
/// Order: `id`, `_id`, `_id.$oid`.
pub fn entity_id(record: &Value) -> Option<String> {
    scalar(record.get("id"))
        .or_else(|| scalar(record.get("_id")))
        .or_else(|| scalar(record.get("_id").and_then(|id| id.get("$oid"))))
}

/// Id of the movie a favorite record points at.
///
/// Order: `movie.id`, `movie._id` (populated movie), `movie` (bare
/// reference), `movieId`, `movie_id`, then the record's own id for legacy
/// favorites that stored the movie directly.
pub fn favorite_movie_id(record: &Value) -> Option<MovieId> {
    let movie = record.get("movie");
    movie
        .filter(|m| m.is_object())
        .and_then(entity_id)
        .or_else(|| scalar(movie))
        .or_else(|| scalar(record.get("movieId")))
        .or_else(|| scalar(record.get("movie_id")))
        .or_else(|| entity_id(record))
        .map(MovieId)
}

/// Display title of a movie-like record.
///
/// Order: `title`, `name`, `original_title`.
pub fn movie_title(record: &Value) -> Option<String> {
    ["title", "name", "original_title"]
        .iter()
        .find_map(|field| scalar(record.get(*field)))
}

fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
