//! Mood based song recommendations

use crate::config::{CatalogMode, MAX_RECOMMENDATIONS};
use crate::core::moods;
use crate::models::SongRecord;
use crate::providers::{CatalogProvider, CatalogQuery, ProviderError};
use tracing::debug;

/// Build the catalog query for a mood label
pub fn build_query(mood: &str, limit: usize, mode: CatalogMode) -> CatalogQuery {
    CatalogQuery {
        genre: moods::genre_for(mood).to_string(),
        search_term: moods::search_term_for(mood),
        limit: limit.clamp(1, MAX_RECOMMENDATIONS),
        mode,
    }
}

/// Fetch songs for a mood.
///
/// An empty list is a valid answer. Never returns more than
/// [`MAX_RECOMMENDATIONS`] songs.
pub async fn recommend_songs(
    catalog: &dyn CatalogProvider,
    mood: &str,
    limit: usize,
    mode: CatalogMode,
) -> Result<Vec<SongRecord>, ProviderError> {
    if !moods::is_known(mood) {
        debug!("Unknown mood {:?}, using fallback genre", mood);
    }

    let query = build_query(mood, limit, mode);
    let tracks = catalog.recommend(&query).await?;

    Ok(tracks
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|track| track.into_song(mood))
        .collect())
}
