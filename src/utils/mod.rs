//! Utility modules for moodtunes

pub mod tools;
