//! Configuration for moodtunes
//!
//! Settings layering and startup path resolution.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{
    AppConfig, CatalogMode, GeminiConfig, SpotifyConfig, MAX_RECOMMENDATIONS,
};
