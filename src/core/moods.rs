//! Static mood lookup tables
//!
//! A detected mood label picks a seed genre for the catalog, plus a looser
//! search phrase used when the catalog is queried through text search.

/// Genre used when a mood is not in the table
pub const FALLBACK_GENRE: &str = "pop";

const MOOD_GENRES: &[(&str, &str)] = &[
    ("happy", "pop"),
    ("sad", "indie"),
    ("energetic", "dance"),
    ("calm", "chill"),
    ("angry", "rock"),
    ("neutral", "classical"),
];

const MOOD_SEARCH_TERMS: &[(&str, &str)] = &[
    ("happy", "upbeat cheerful"),
    ("sad", "melancholic emotional"),
    ("energetic", "upbeat energetic dance"),
    ("calm", "peaceful ambient relaxing"),
    ("angry", "intense powerful"),
    ("neutral", "moderate balanced"),
];

fn normalize(mood: &str) -> String {
    mood.trim().to_lowercase()
}

fn lookup(table: &'static [(&'static str, &'static str)], mood: &str) -> Option<&'static str> {
    let key = normalize(mood);
    table
        .iter()
        .find(|(label, _)| *label == key)
        .map(|(_, value)| *value)
}

/// Seed genre for a mood label, case-insensitive
pub fn genre_for(mood: &str) -> &'static str {
    lookup(MOOD_GENRES, mood).unwrap_or(FALLBACK_GENRE)
}

/// Free text search phrase for a mood label; unknown moods search for themselves
pub fn search_term_for(mood: &str) -> String {
    lookup(MOOD_SEARCH_TERMS, mood)
        .map(|s| s.to_string())
        .unwrap_or_else(|| normalize(mood))
}

/// Whether the mood has its own table entry
pub fn is_known(mood: &str) -> bool {
    lookup(MOOD_GENRES, mood).is_some()
}
