//! Mood analysis model

use palette::Srgb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::fence::strip_code_fence;

/// Number of genres and palette colors the record carries
pub const MOOD_LIST_LEN: usize = 3;

/// Why a model reply could not be turned into a mood record
#[derive(Debug, Error)]
pub enum MoodParseError {
    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dominantEmotion is empty")]
    EmptyEmotion,

    #[error("expected {expected} {field}, got {got}")]
    TooFew {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid hex color {0:?}")]
    InvalidColor(String),
}

/// What the vision model reads from an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodAnalysis {
    /// Single word emotion, e.g. "happy"
    pub dominant_emotion: String,
    pub mood_description: String,
    pub suggested_music_genres: Vec<String>,
    /// Lowercase `#rrggbb` colors
    pub color_palette: Vec<String>,
}

impl MoodAnalysis {
    /// Parse the free text reply of the vision model.
    ///
    /// Two stages: strip an optional fenced code block, then parse strictly.
    /// Anything that does not produce a complete record is an error.
    pub fn from_model_reply(reply: &str) -> Result<Self, MoodParseError> {
        let body = strip_code_fence(reply);
        let raw: MoodAnalysis = serde_json::from_str(body)?;
        raw.validated()
    }

    fn validated(self) -> Result<Self, MoodParseError> {
        let dominant_emotion = self
            .dominant_emotion
            .split_whitespace()
            .next()
            .map(|s| s.to_string())
            .ok_or(MoodParseError::EmptyEmotion)?;

        let genres: Vec<String> = self
            .suggested_music_genres
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .take(MOOD_LIST_LEN)
            .collect();
        if genres.len() < MOOD_LIST_LEN {
            return Err(MoodParseError::TooFew {
                field: "suggestedMusicGenres",
                expected: MOOD_LIST_LEN,
                got: genres.len(),
            });
        }

        let colors = self
            .color_palette
            .iter()
            .take(MOOD_LIST_LEN)
            .map(|c| normalize_hex(c))
            .collect::<Result<Vec<_>, _>>()?;
        if colors.len() < MOOD_LIST_LEN {
            return Err(MoodParseError::TooFew {
                field: "colorPalette",
                expected: MOOD_LIST_LEN,
                got: colors.len(),
            });
        }

        Ok(Self {
            dominant_emotion,
            mood_description: self.mood_description.trim().to_string(),
            suggested_music_genres: genres,
            color_palette: colors,
        })
    }
}

/// Normalize `#abc`, `abc`, `#AABBCC` to `#aabbcc`
pub fn normalize_hex(color: &str) -> Result<String, MoodParseError> {
    let rgb: Srgb<u8> = color
        .trim()
        .parse()
        .map_err(|_| MoodParseError::InvalidColor(color.to_string()))?;

    Ok(format!(
        "#{:02x}{:02x}{:02x}",
        rgb.red, rgb.green, rgb.blue
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r##"{
        "dominantEmotion": "Joyful",
        "moodDescription": "A bright sunny beach. People are laughing.",
        "suggestedMusicGenres": ["pop", "reggae", "surf rock"],
        "colorPalette": ["#FFD700", "#1e90ff", "#fff"]
    }"##;

    #[test]
    fn test_parse_plain_reply() {
        let mood = MoodAnalysis::from_model_reply(REPLY).unwrap();
        assert_eq!(mood.dominant_emotion, "Joyful");
        assert_eq!(mood.suggested_music_genres.len(), 3);
        assert_eq!(mood.color_palette, vec!["#ffd700", "#1e90ff", "#ffffff"]);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let fenced = format!("```json\n{}\n```", REPLY);
        let mood = MoodAnalysis::from_model_reply(&fenced).unwrap();
        assert_eq!(mood.dominant_emotion, "Joyful");

        let bare = format!("  ```\n{}```  \n", REPLY);
        assert!(MoodAnalysis::from_model_reply(&bare).is_ok());
    }

    #[test]
    fn test_serializes_exactly_four_fields() {
        let with_extra = REPLY.replacen('{', r#"{"confidence": 0.9,"#, 1);
        let mood = MoodAnalysis::from_model_reply(&with_extra).unwrap();
        let value = serde_json::to_value(&mood).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 4);
        for key in [
            "dominantEmotion",
            "moodDescription",
            "suggestedMusicGenres",
            "colorPalette",
        ] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
    }

    #[test]
    fn test_emotion_reduced_to_one_token() {
        let reply = REPLY.replace("\"Joyful\"", "\"calm and serene\"");
        let mood = MoodAnalysis::from_model_reply(&reply).unwrap();
        assert_eq!(mood.dominant_emotion, "calm");
    }

    #[test]
    fn test_extra_genres_truncated() {
        let reply = REPLY.replace(r#""surf rock"]"#, r#""surf rock", "ska"]"#);
        let mood = MoodAnalysis::from_model_reply(&reply).unwrap();
        assert_eq!(mood.suggested_music_genres, vec!["pop", "reggae", "surf rock"]);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            MoodAnalysis::from_model_reply("I think this image looks happy!"),
            Err(MoodParseError::Json(_))
        ));
        assert!(MoodAnalysis::from_model_reply("```json\n{\"dominantEmotion\": ```").is_err());
    }

    #[test]
    fn test_rejects_short_lists() {
        let reply = REPLY.replace(r#", "surf rock""#, "");
        assert!(matches!(
            MoodAnalysis::from_model_reply(&reply),
            Err(MoodParseError::TooFew { field: "suggestedMusicGenres", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_color() {
        let reply = REPLY.replace("#fff", "sky blue");
        assert!(matches!(
            MoodAnalysis::from_model_reply(&reply),
            Err(MoodParseError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_rejects_empty_emotion() {
        let reply = REPLY.replace("\"Joyful\"", "\"  \"");
        assert!(matches!(
            MoodAnalysis::from_model_reply(&reply),
            Err(MoodParseError::EmptyEmotion)
        ));
    }

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex("ABC").unwrap(), "#aabbcc");
        assert_eq!(normalize_hex(" #0a0B0c ").unwrap(), "#0a0b0c");
        assert!(normalize_hex("#12345").is_err());
    }
}
