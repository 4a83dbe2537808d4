//! moodtunes - music recommendations from the mood of a picture
//!
//! An image is described by a vision model, the detected emotion is mapped
//! to a genre, and the song catalog is asked for matching tracks.

mod api;
mod config;
mod core;
mod models;
mod providers;
mod utils;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{AppConfig, Paths};
use crate::providers::{GeminiProvider, SpotifyProvider};

/// moodtunes - Image mood to music
#[derive(Parser, Debug)]
#[command(name = "moodtunes")]
#[command(version)]
#[command(about = "Recommend music that matches the mood of an image")]
struct Args {
    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a web client directory to serve instead of the bundled one
    #[arg(long)]
    client: Option<PathBuf>,

    /// Analyze one image and print the results instead of serving
    #[arg(long, value_name = "IMAGE")]
    analyze: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --debug; http client internals stay quiet either way
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "{},hyper=warn,reqwest=warn,h2=warn",
            log_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let paths = Paths::resolve(args.config, args.client)?;
    if let Some(file) = paths.config_file() {
        info!("Config file: {:?}", file);
    }

    let mut config = AppConfig::load(paths.config_file())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let missing = config.missing_credentials();
    if !missing.is_empty() {
        warn!(
            "Missing credentials: {}. Requests needing them will fail.",
            missing.join(", ")
        );
    }

    let timeout = config.request_timeout();
    let vision = Arc::new(GeminiProvider::new(&config.gemini, timeout));
    let catalog = Arc::new(SpotifyProvider::new(&config.spotify, timeout));

    if let Some(image) = args.analyze {
        return utils::tools::analyze_file(&image, vision.as_ref(), catalog.as_ref(), &config)
            .await;
    }

    start_moodtunes(config, paths, vision, catalog).await
}

async fn start_moodtunes(
    config: AppConfig,
    paths: Paths,
    vision: Arc<GeminiProvider>,
    catalog: Arc<SpotifyProvider>,
) -> Result<()> {
    use actix_cors::Cors;
    use actix_web::{middleware, web, App, HttpServer};

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("moodtunes v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Catalog mode: {:?}", config.spotify.mode);
    match paths.client_dir() {
        Some(dir) => info!("Serving web client from {:?}", dir),
        None => info!("Serving bundled web client"),
    }

    let state = web::Data::new(api::AppState {
        vision,
        catalog,
        config: Arc::new(config),
    });
    let client_dir = paths.client_dir().map(|dir| dir.to_path_buf());

    info!("Server listening on http://{}", addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let client_dir = client_dir.clone();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .app_data(state.clone())
            .configure(move |cfg| api::configure(cfg, client_dir.as_deref()))
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
