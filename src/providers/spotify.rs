//! Spotify catalog provider
//!
//! Client credentials grant for an app token, then either the seed-genre
//! recommendations endpoint or a track search. The token is cached until
//! shortly before it expires; a 401 drops it and retries once.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{truncate_body, CatalogProvider, CatalogQuery, ProviderError};
use crate::config::{CatalogMode, SpotifyConfig};
use crate::models::CatalogTrack;

const USER_AGENT: &str = concat!("moodtunes/", env!("CARGO_PKG_VERSION"));

/// Refresh tokens this long before the catalog would reject them
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Longest token lifetime taken at face value
const MAX_TOKEN_LIFETIME_SECS: i64 = 86_400;

/// Search endpoint page size cap
const SEARCH_MAX_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    tracks: Vec<CatalogTrack>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: Option<SearchTracks>,
}

#[derive(Debug, Deserialize)]
struct SearchTracks {
    #[serde(default)]
    items: Vec<CatalogTrack>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Out of range lifetimes are clamped; a token that cannot be dated is
    /// treated as already expired
    fn new(token: String, expires_in: i64, now: DateTime<Utc>) -> Self {
        let lifetime = expires_in.clamp(0, MAX_TOKEN_LIFETIME_SECS) - TOKEN_EXPIRY_MARGIN_SECS;
        let expires_at = TimeDelta::try_seconds(lifetime.max(0))
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(now);

        Self { token, expires_at }
    }

    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Spotify Web API client
pub struct SpotifyProvider {
    client: Client,
    client_id: String,
    client_secret: String,
    accounts_url: String,
    api_url: String,
    token: RwLock<Option<CachedToken>>,
}

impl SpotifyProvider {
    pub fn new(config: &SpotifyConfig, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            accounts_url: config.accounts_url.trim_end_matches('/').to_string(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        }
    }

    fn cached_token(&self) -> Option<String> {
        let now = Utc::now();
        self.token
            .read()
            .as_ref()
            .filter(|t| t.is_valid(now))
            .map(|t| t.token.clone())
    }

    fn invalidate_token(&self) {
        *self.token.write() = None;
    }

    /// Get a usable bearer token, exchanging credentials when needed
    async fn access_token(&self) -> Result<String, ProviderError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let fetched = self.fetch_token().await?;
        let token = fetched.token.clone();
        *self.token.write() = Some(fetched);
        Ok(token)
    }

    async fn fetch_token(&self) -> Result<CachedToken, ProviderError> {
        if self.client_id.is_empty() {
            return Err(ProviderError::NotConfigured("SPOTIFY_CLIENT_ID"));
        }
        if self.client_secret.is_empty() {
            return Err(ProviderError::NotConfigured("SPOTIFY_CLIENT_SECRET"));
        }

        debug!("Fetching spotify access token");

        let resp = self
            .client
            .post(format!("{}/api/token", self.accounts_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("spotify token request failed status={}", status);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let payload: TokenResponse = resp.json().await?;
        if payload.access_token.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "token response has no access_token".to_string(),
            ));
        }

        Ok(CachedToken::new(
            payload.access_token,
            payload.expires_in,
            Utc::now(),
        ))
    }

    fn build_request(&self, query: &CatalogQuery) -> RequestBuilder {
        match query.mode {
            CatalogMode::Recommendations => self
                .client
                .get(format!("{}/v1/recommendations", self.api_url))
                .query(&[
                    ("seed_genres", query.genre.clone()),
                    ("limit", query.limit.to_string()),
                ]),
            CatalogMode::Search => self
                .client
                .get(format!("{}/v1/search", self.api_url))
                .query(&[
                    (
                        "q",
                        format!("{} genre:{}", query.search_term, query.genre),
                    ),
                    ("type", "track".to_string()),
                    ("limit", query.limit.min(SEARCH_MAX_LIMIT).to_string()),
                ]),
        }
    }

    async fn get_tracks(
        &self,
        token: &str,
        query: &CatalogQuery,
    ) -> Result<Vec<CatalogTrack>, ProviderError> {
        let resp = self.build_request(query).bearer_auth(token).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let tracks = match query.mode {
            CatalogMode::Recommendations => resp.json::<RecommendationsResponse>().await?.tracks,
            CatalogMode::Search => resp
                .json::<SearchResponse>()
                .await?
                .tracks
                .map(|t| t.items)
                .unwrap_or_default(),
        };

        Ok(tracks)
    }
}

#[async_trait]
impl CatalogProvider for SpotifyProvider {
    async fn recommend(&self, query: &CatalogQuery) -> Result<Vec<CatalogTrack>, ProviderError> {
        let token = self.access_token().await?;

        match self.get_tracks(&token, query).await {
            Err(e) if e.is_unauthorized() => {
                debug!("spotify rejected cached token, fetching a new one");
                self.invalidate_token();
                let token = self.access_token().await?;
                self.get_tracks(&token, query).await
            }
            other => other,
        }
    }
}
