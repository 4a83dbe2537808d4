//! Data models for moodtunes
//!
//! Mood analysis records and song records, plus the catalog shapes they
//! are built from.

pub mod mood;
pub mod song;

pub use mood::{MoodAnalysis, MoodParseError};
pub use song::{CatalogTrack, SongRecord};
