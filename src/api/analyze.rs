//! Image mood analysis route

use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse};
use bytes::BytesMut;
use futures::StreamExt;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::core::analysis::{analyze_image, resolve_media_type};
use crate::providers::ImageUpload;

/// Multipart field carrying the image
const IMAGE_FIELD: &str = "image";

/// Read the `image` part of the upload.
///
/// Returns `Ok(None)` when no non-empty image part is present.
async fn read_image_field(
    payload: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<ImageUpload>, ApiError> {
    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| ApiError::InvalidInput(format!("Malformed upload: {}", e)))?;

        let disp = field.content_disposition().clone();
        let name = disp.get_name().unwrap_or_default();

        if name != IMAGE_FIELD {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| ApiError::InvalidInput(format!("Malformed upload: {}", e)))?;
            }
            continue;
        }

        let declared = field.content_type().map(|ct| ct.to_string());
        let mut bytes = BytesMut::new();

        while let Some(chunk) = field.next().await {
            let data =
                chunk.map_err(|e| ApiError::InvalidInput(format!("Malformed upload: {}", e)))?;
            if bytes.len() + data.len() > max_bytes {
                return Err(ApiError::InvalidInput(format!(
                    "Image is larger than {} bytes",
                    max_bytes
                )));
            }
            bytes.extend_from_slice(&data);
        }

        if bytes.is_empty() {
            continue;
        }

        let media_type = resolve_media_type(declared.as_deref(), disp.get_filename())
            .ok_or_else(|| ApiError::InvalidInput("Uploaded file is not an image".to_string()))?;

        return Ok(Some(ImageUpload {
            bytes: bytes.freeze(),
            media_type,
        }));
    }

    Ok(None)
}

/// POST /analyze
#[post("/analyze")]
pub async fn analyze(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let span = info_span!("analyze", request_id = %Uuid::new_v4());

    async move {
        let image = read_image_field(&mut payload, state.config.server.max_upload_bytes)
            .await?
            .ok_or_else(|| ApiError::InvalidInput("No image file provided".to_string()))?;

        let mood = analyze_image(state.vision.as_ref(), &image)
            .await
            .map_err(|e| {
                error!("Error analyzing image: {}", e);
                ApiError::Analysis
            })?;

        info!("Detected mood: {}", mood.dominant_emotion);
        Ok(HttpResponse::Ok().json(mood))
    }
    .instrument(span)
    .await
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(analyze);
}
