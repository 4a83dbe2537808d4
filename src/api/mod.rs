//! HTTP routes for moodtunes

pub mod analyze;
pub mod client;
pub mod error;
pub mod recommendations;

pub use error::ApiError;

use actix_web::{get, web, HttpResponse, Responder};
use std::path::Path;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::providers::{CatalogProvider, VisionProvider};

/// Shared state handed to every handler
pub struct AppState {
    pub vision: Arc<dyn VisionProvider>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub config: Arc<AppConfig>,
}

/// GET /health
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Turn unreadable JSON bodies into the same 400 shape as other bad input
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::InvalidInput(format!("Invalid request body: {}", err)).into()
    })
}

fn pipeline_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(analyze::configure)
        .configure(recommendations::configure);
}

/// Configure all routes.
///
/// The pipeline routes are served both at the root and under `/api`. The
/// web client comes last because a client directory is mounted at `/`.
pub fn configure(cfg: &mut web::ServiceConfig, client_dir: Option<&Path>) {
    cfg.app_data(json_config())
        .service(health)
        .service(web::scope("/api").configure(pipeline_routes))
        .configure(pipeline_routes)
        .configure(|cfg| client::configure(cfg, client_dir));
}
