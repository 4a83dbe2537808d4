//! Core pipeline for moodtunes

pub mod analysis;
pub mod fence;
pub mod moods;
pub mod recommend;
