//! CLI tools

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::config::AppConfig;
use crate::core::analysis::{analyze_image, resolve_media_type};
use crate::core::recommend::recommend_songs;
use crate::models::{MoodAnalysis, SongRecord};
use crate::providers::{CatalogProvider, ImageUpload, VisionProvider};

/// Read an image from disk into an upload
async fn load_image(path: &Path) -> Result<ImageUpload> {
    let filename = path.file_name().and_then(|n| n.to_str());
    let media_type = resolve_media_type(None, filename)
        .ok_or_else(|| anyhow!("{:?} does not look like an image", path))?;

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;

    if bytes.is_empty() {
        return Err(anyhow!("{:?} is empty", path));
    }

    Ok(ImageUpload {
        bytes: Bytes::from(bytes),
        media_type,
    })
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run the analyze then recommend pipeline on one file
pub async fn run_pipeline(
    path: &Path,
    vision: &dyn VisionProvider,
    catalog: &dyn CatalogProvider,
    config: &AppConfig,
) -> Result<(MoodAnalysis, Vec<SongRecord>)> {
    let image = load_image(path).await?;

    let pb = spinner("Analyzing image...");
    let mood = analyze_image(vision, &image).await;
    pb.finish_and_clear();
    let mood = mood.context("Failed to analyze image")?;

    let pb = spinner(&format!("Finding songs for {}...", mood.dominant_emotion));
    let songs = recommend_songs(
        catalog,
        &mood.dominant_emotion,
        config.spotify.limit,
        config.spotify.mode,
    )
    .await;
    pb.finish_and_clear();
    let songs = songs.context("Failed to get recommendations")?;

    Ok((mood, songs))
}

/// `--analyze <image>`: print the mood and the song list
pub async fn analyze_file(
    path: &Path,
    vision: &dyn VisionProvider,
    catalog: &dyn CatalogProvider,
    config: &AppConfig,
) -> Result<()> {
    let (mood, songs) = run_pipeline(path, vision, catalog, config).await?;

    println!("=== Mood ===\n");
    println!("Emotion:     {}", mood.dominant_emotion);
    println!("Description: {}", mood.mood_description);
    println!("Genres:      {}", mood.suggested_music_genres.join(", "));
    println!("Palette:     {}", mood.color_palette.join(" "));

    println!("\n=== Songs ({}) ===\n", songs.len());
    if songs.is_empty() {
        println!("No songs found for this mood");
    }
    for (i, song) in songs.iter().enumerate() {
        let preview = if song.has_preview() { "" } else { " (no preview)" };
        println!("{:>3}. {} - {}{}", i + 1, song.artist, song.title, preview);
        if !song.url.is_empty() {
            println!("     {}", song.url);
        }
    }

    Ok(())
}
