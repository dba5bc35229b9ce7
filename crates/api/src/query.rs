//! Query parameter types for API handlers.

use cinelite_core::filter::MovieFilter;
use serde::Deserialize;

/// `GET /api/movies?genre=&minScore=&q=`.
///
/// Values are kept as raw strings so that malformed input reaches
/// [`MovieFilter::from_params`], which decides what to ignore, instead of
/// failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct MovieQuery {
    pub genre: Option<String>,
    #[serde(rename = "minScore")]
    pub min_score: Option<String>,
    pub q: Option<String>,
}

impl MovieQuery {
    pub fn to_filter(&self) -> MovieFilter {
        MovieFilter::from_params(
            self.genre.as_deref(),
            self.min_score.as_deref(),
            self.q.as_deref(),
        )
    }
}
