/// Catalog primary keys. Unique across the catalog and the only lookup key.
pub type MovieId = i64;

/// Movie ratings on a 0-10 scale.
pub type Score = f64;
