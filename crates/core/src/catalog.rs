//! The in-memory movie catalog.
//!
//! The catalog is built once at startup from a fixed list and never mutated
//! afterwards, so it can be shared behind an `Arc` without locking. The only
//! per-request enrichment (showtimes) is applied to a clone returned by
//! [`Catalog::detail`].

use std::collections::HashSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{MovieId, Score};

/// Showtimes attached to every single-movie lookup. Static demo data.
pub const DEFAULT_SHOWTIMES: [&str; 4] = ["10:00", "13:30", "16:45", "20:00"];

/// Upper bound of the rating scale.
pub const MAX_SCORE: Score = 10.0;

// ---------------------------------------------------------------------------
// Genre
// ---------------------------------------------------------------------------

/// Genres present in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Genre {
    Drama,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Family,
    Thriller,
    Adventure,
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Drama,
        Genre::SciFi,
        Genre::Family,
        Genre::Thriller,
        Genre::Adventure,
    ];

    /// Display name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Drama => "Drama",
            Genre::SciFi => "Sci-Fi",
            Genre::Family => "Family",
            Genre::Thriller => "Thriller",
            Genre::Adventure => "Adventure",
        }
    }

    /// Case-insensitive comparison against a user-supplied genre name.
    pub fn matches(self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name.trim())
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MovieRecord
// ---------------------------------------------------------------------------

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    pub genre: Genre,
    /// Running time in minutes.
    pub length: u32,
    pub score: Score,
    pub lang: String,
    pub year: i32,
    /// CSS colour used by the frontend as a card background hint.
    pub color: String,
    pub tagline: String,
    pub director: String,
    /// Only present on single-movie lookups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showtimes: Option<Vec<String>>,
    #[serde(rename = "posterUrl", skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl MovieRecord {
    /// Return a copy decorated with [`DEFAULT_SHOWTIMES`].
    pub fn with_showtimes(&self) -> MovieRecord {
        MovieRecord {
            showtimes: Some(DEFAULT_SHOWTIMES.iter().map(|s| s.to_string()).collect()),
            ..self.clone()
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn movie(
    id: MovieId,
    title: &str,
    genre: Genre,
    length: u32,
    score: Score,
    lang: &str,
    year: i32,
    color: &str,
    tagline: &str,
    director: &str,
) -> MovieRecord {
    MovieRecord {
        id,
        title: title.to_string(),
        genre,
        length,
        score,
        lang: lang.to_string(),
        year,
        color: color.to_string(),
        tagline: tagline.to_string(),
        director: director.to_string(),
        showtimes: None,
        poster_url: None,
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable, ordered collection of [`MovieRecord`]s keyed by unique id.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<MovieRecord>,
}

impl Catalog {
    /// Build a catalog, validating every record.
    ///
    /// Rejects duplicate ids, zero-length movies, and scores outside
    /// `0.0..=10.0`.
    pub fn new(movies: Vec<MovieRecord>) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(movies.len());
        for m in &movies {
            if !seen.insert(m.id) {
                return Err(CoreError::Validation(format!("duplicate movie id {}", m.id)));
            }
            if m.length == 0 {
                return Err(CoreError::Validation(format!(
                    "movie {} must have a positive length",
                    m.id
                )));
            }
            if !(0.0..=MAX_SCORE).contains(&m.score) {
                return Err(CoreError::Validation(format!(
                    "movie {} score {} is outside 0-10",
                    m.id, m.score
                )));
            }
        }
        Ok(Self { movies })
    }

    /// The fixed five-movie catalog served by the API.
    #[rustfmt::skip]
    pub fn builtin() -> Self {
        Self {
            movies: vec![
                movie(101, "CineWave", Genre::Drama, 112, 7.4, "Hindi", 2023, "#5063f0", "When waves meet hearts", "A. Rao"),
                movie(102, "Night Circuit", Genre::SciFi, 129, 8.1, "English", 2024, "#ff8a65", "City never sleeps", "M. Sen"),
                movie(103, "The Lost Kite", Genre::Family, 95, 7.9, "Hindi", 2022, "#66bb6a", "Small joys, big skies", "R. Kapoor"),
                movie(104, "Echo Chamber", Genre::Thriller, 140, 8.6, "English", 2024, "#ab47bc", "Every secret echoes", "S. Iyer"),
                movie(105, "Spice Route", Genre::Adventure, 121, 7.8, "Malayalam", 2021, "#ffca28", "Sail beyond maps", "P. Das"),
            ],
        }
    }

    /// All records in insertion order.
    pub fn all(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn find(&self, id: MovieId) -> Option<&MovieRecord> {
        self.movies.iter().find(|m| m.id == id)
    }

    /// Look up a movie for the detail view, attaching showtimes.
    pub fn detail(&self, id: MovieId) -> Result<MovieRecord, CoreError> {
        self.find(id)
            .map(MovieRecord::with_showtimes)
            .ok_or(CoreError::NotFound { entity: "Movie", id })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
