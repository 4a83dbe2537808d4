//! Mood based recommendation route

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::core::recommend::recommend_songs;
use crate::models::SongRecord;

/// Tag telling the client how the list was picked
const SOURCE_MOOD_ONLY: &str = "mood-only";

/// The client posts the whole analysis; only the emotion is read
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(rename = "dominantEmotion", default)]
    pub dominant_emotion: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<SongRecord>,
    pub source: &'static str,
}

/// POST /recommendations
#[post("/recommendations")]
pub async fn recommendations(
    state: web::Data<AppState>,
    body: web::Json<RecommendRequest>,
) -> Result<HttpResponse, ApiError> {
    let mood = body
        .into_inner()
        .dominant_emotion
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("dominantEmotion is required".to_string()))?;

    let span = info_span!("recommendations", request_id = %Uuid::new_v4(), mood = %mood);

    async move {
        let spotify = &state.config.spotify;
        let songs = recommend_songs(state.catalog.as_ref(), &mood, spotify.limit, spotify.mode)
            .await
            .map_err(|e| {
                error!("Error getting recommendations: {}", e);
                ApiError::Recommendations {
                    message: e.public_message(),
                }
            })?;

        info!("Found {} songs", songs.len());

        Ok(HttpResponse::Ok().json(RecommendResponse {
            recommendations: songs,
            source: SOURCE_MOOD_ONLY,
        }))
    }
    .instrument(span)
    .await
}

/// Configure recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(recommendations);
}
