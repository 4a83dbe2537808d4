//! Image mood analysis
//!
//! Sends the image with a fixed instruction to the vision model and turns the
//! reply into a [`MoodAnalysis`].

use thiserror::Error;

use crate::models::{MoodAnalysis, MoodParseError};
use crate::providers::{ImageUpload, ProviderError, VisionProvider};

/// Instruction sent along with every image
pub const MOOD_INSTRUCTION: &str = "Analyze this image and describe the mood or emotion it conveys. \
Focus on the overall atmosphere, colors, and any facial expressions if present. \
Provide your response in JSON format with these fields: \
dominantEmotion (single word), \
moodDescription (2-3 sentences), \
suggestedMusicGenres (array of 3 genres that match the mood), \
colorPalette (array of 3 dominant colors in hex format)";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("vision model call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("vision model reply unusable: {0}")]
    Reply(#[from] MoodParseError),
}

/// Ask the vision model for the mood of an image
pub async fn analyze_image(
    vision: &dyn VisionProvider,
    image: &ImageUpload,
) -> Result<MoodAnalysis, AnalysisError> {
    let reply = vision.complete(image, MOOD_INSTRUCTION).await?;
    let mood = MoodAnalysis::from_model_reply(&reply)?;
    Ok(mood)
}

/// Work out the image media type from the declared type and file name.
///
/// Returns `None` when the upload is not an image.
pub fn resolve_media_type(declared: Option<&str>, filename: Option<&str>) -> Option<String> {
    let declared = declared
        .map(|d| d.trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty() && d != "application/octet-stream");

    let media_type = match declared {
        Some(d) => d,
        None => mime_guess::from_path(filename?).first()?.essence_str().to_string(),
    };

    media_type.starts_with("image/").then_some(media_type)
}
