//! External service integrations
//!
//! The vision model that reads a mood from an image and the music catalog
//! that turns a mood into tracks. Handlers only see the traits, so tests can
//! swap in fakes.

pub mod gemini;
pub mod spotify;

#[cfg(test)]
pub(crate) mod fakes;
#[cfg(test)]
pub(crate) mod test_server;

pub use gemini::GeminiProvider;
pub use spotify::SpotifyProvider;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::config::CatalogMode;
use crate::models::CatalogTrack;

/// Error type for outbound calls
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("request failed: {0}")]
    Http(reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

// Request urls can carry credentials, so they never reach a log line
impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Http(e.without_url())
    }
}

impl ProviderError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ProviderError::Status { status: 401, .. })
    }

    /// Short description safe to hand back to clients
    pub fn public_message(&self) -> String {
        match self {
            ProviderError::NotConfigured(what) => format!("{} is not configured", what),
            ProviderError::Http(e) if e.is_timeout() => "upstream request timed out".to_string(),
            ProviderError::Http(_) => "upstream request failed".to_string(),
            ProviderError::Status { status, .. } => format!("upstream returned status {}", status),
            ProviderError::InvalidResponse(_) => "invalid upstream response".to_string(),
        }
    }
}

/// An uploaded image on its way to the vision model
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    /// Declared media type, e.g. `image/png`
    pub media_type: String,
}

/// What to ask the catalog for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub genre: String,
    pub search_term: String,
    pub limit: usize,
    pub mode: CatalogMode,
}

/// Multimodal model that answers a text instruction about an image
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Send the image and instruction, return the raw reply text
    async fn complete(&self, image: &ImageUpload, instruction: &str)
        -> Result<String, ProviderError>;
}

/// Music catalog that can suggest tracks
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn recommend(&self, query: &CatalogQuery) -> Result<Vec<CatalogTrack>, ProviderError>;
}

/// Keep the start of an upstream error body for logs
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 300;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
