//! In-memory providers for handler tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{CatalogProvider, CatalogQuery, ImageUpload, ProviderError, VisionProvider};
use crate::models::song::{CatalogArtist, CatalogTrack, ExternalUrls};

/// Vision provider with a canned reply; `None` fails like an upstream 500
pub struct FakeVision {
    reply: Option<String>,
    calls: AtomicUsize,
    pub last_media_type: Mutex<Option<String>>,
}

impl FakeVision {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_media_type: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_media_type: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionProvider for FakeVision {
    async fn complete(
        &self,
        image: &ImageUpload,
        _instruction: &str,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_media_type.lock() = Some(image.media_type.clone());
        self.reply.clone().ok_or(ProviderError::Status {
            status: 500,
            body: "internal".to_string(),
        })
    }
}

/// Catalog provider returning `count` generated tracks, or failing
pub struct FakeCatalog {
    count: Option<usize>,
    calls: AtomicUsize,
    pub last_query: Mutex<Option<CatalogQuery>>,
}

impl FakeCatalog {
    pub fn with_tracks(count: usize) -> Self {
        Self {
            count: Some(count),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            count: None,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogProvider for FakeCatalog {
    async fn recommend(&self, query: &CatalogQuery) -> Result<Vec<CatalogTrack>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock() = Some(query.clone());

        let count = self
            .count
            .ok_or(ProviderError::NotConfigured("SPOTIFY_CLIENT_ID"))?;

        Ok((0..count)
            .map(|i| CatalogTrack {
                id: Some(format!("track-{}", i)),
                name: Some(format!("Song {}", i)),
                artists: vec![CatalogArtist {
                    name: "Artist".to_string(),
                }],
                preview_url: (i % 2 == 0).then(|| format!("https://p.example/{}.mp3", i)),
                external_urls: ExternalUrls {
                    spotify: Some(format!("https://open.example/track/{}", i)),
                },
                ..CatalogTrack::default()
            })
            .collect())
    }
}
