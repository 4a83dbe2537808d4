//! Song record model

use serde::{Deserialize, Serialize};

/// Placeholder used when the catalog omits a genre or artist
pub const UNKNOWN: &str = "Unknown";

/// A recommended song as shown to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    /// Catalog track id
    pub id: String,
    /// Track title
    pub title: String,
    /// All artist names joined with ", "
    pub artist: String,
    /// First genre reported for the track
    pub genre: String,
    /// Album cover url
    pub image: Option<String>,
    /// Lowercased mood label the song was picked for
    pub mood: String,
    /// 30 second preview clip; absent means "preview unavailable"
    pub preview: Option<String>,
    /// Link to the full song on the catalog
    pub url: String,
}

impl SongRecord {
    pub fn has_preview(&self) -> bool {
        self.preview.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Track as returned by the music catalog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogTrack {
    /// Null for local files the catalog cannot address
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub album: Option<CatalogAlbum>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogArtist {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogAlbum {
    #[serde(default)]
    pub images: Vec<CatalogImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogImage {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

impl CatalogTrack {
    /// Reshape a catalog track into the record the client renders
    pub fn into_song(self, mood: &str) -> SongRecord {
        let artist = self
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let image = self
            .album
            .and_then(|album| album.images.into_iter().next())
            .and_then(|img| img.url)
            .filter(|url| !url.is_empty());

        SongRecord {
            id: self.id.unwrap_or_default(),
            title: self.name.unwrap_or_default(),
            artist: if artist.is_empty() {
                UNKNOWN.to_string()
            } else {
                artist
            },
            genre: self
                .genres
                .into_iter()
                .find(|g| !g.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            image,
            mood: mood.trim().to_lowercase(),
            preview: self.preview_url.filter(|p| !p.is_empty()),
            url: self.external_urls.spotify.unwrap_or_default(),
        }
    }
}
