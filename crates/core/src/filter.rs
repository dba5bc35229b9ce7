//! Catalog query filter.
//!
//! Narrows the catalog by genre, minimum score, and a free-text query. All
//! predicates are optional and combined with AND. Results keep catalog
//! insertion order.
//!
//! Blank parameters mean "no filter". A `minScore` that does not parse to a
//! finite number is ignored rather than rejected; [`MovieFilter::min_score_rejected`]
//! reports when that happened so callers can log it.

use crate::catalog::{Catalog, MovieRecord};
use crate::types::Score;

/// Parsed filter predicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilter {
    /// Genre name, compared case-insensitively.
    pub genre: Option<String>,
    /// Inclusive lower bound on `score`.
    pub min_score: Option<Score>,
    /// Lower-cased substring matched against title, director, and tagline.
    pub query: Option<String>,
    /// Raw `minScore` input that was ignored because it was not a finite number.
    rejected_min_score: Option<String>,
}

/// Trim a raw parameter and drop it if blank.
fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a minimum score. `None` for anything that is not a finite `f64`.
pub fn parse_min_score(raw: &str) -> Option<Score> {
    raw.trim().parse::<Score>().ok().filter(|v| v.is_finite())
}

impl MovieFilter {
    /// Build a filter from raw query-string values.
    pub fn from_params(genre: Option<&str>, min_score: Option<&str>, query: Option<&str>) -> Self {
        let raw_score = non_blank(min_score);
        let parsed_score = raw_score.and_then(parse_min_score);

        Self {
            genre: non_blank(genre).map(str::to_string),
            min_score: parsed_score,
            query: non_blank(query).map(str::to_lowercase),
            rejected_min_score: match (raw_score, parsed_score) {
                (Some(raw), None) => Some(raw.to_string()),
                _ => None,
            },
        }
    }

    /// The raw `minScore` value that was ignored, if any.
    pub fn min_score_rejected(&self) -> Option<&str> {
        self.rejected_min_score.as_deref()
    }

    /// Whether a single record satisfies every active predicate.
    pub fn matches(&self, movie: &MovieRecord) -> bool {
        if let Some(genre) = &self.genre {
            if !movie.genre.matches(genre) {
                return false;
            }
        }
        if let Some(min) = self.min_score {
            if movie.score < min {
                return false;
            }
        }
        if let Some(q) = &self.query {
            let hit = [&movie.title, &movie.director, &movie.tagline]
                .iter()
                .any(|field| field.to_lowercase().contains(q.as_str()));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Apply the filter to a catalog, preserving insertion order.
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a MovieRecord> {
        catalog.all().iter().filter(|m| self.matches(m)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
