//! Web client routes
//!
//! The page is embedded in the binary. A client directory given on the
//! command line is served instead.

use actix_files::Files;
use actix_web::{get, web, HttpResponse, Responder};
use std::path::Path;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Embedded assets under `/static/`
const ASSETS: &[(&str, &str)] = &[
    ("app.js", include_str!("../../static/app.js")),
    ("preview_slot.js", include_str!("../../static/preview_slot.js")),
    ("style.css", include_str!("../../static/style.css")),
];

/// GET /
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

/// GET /static/<file>
#[get("/static/{file}")]
pub async fn asset(path: web::Path<String>) -> impl Responder {
    let name = path.into_inner();

    match ASSETS.iter().find(|(asset, _)| *asset == name) {
        Some((_, content)) => {
            let content_type = mime_guess::from_path(&name).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(content_type.to_string())
                .body(*content)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" })),
    }
}

/// Configure client routes
pub fn configure(cfg: &mut web::ServiceConfig, client_dir: Option<&Path>) {
    match client_dir {
        Some(dir) => {
            cfg.service(Files::new("/", dir).index_file("index.html"));
        }
        None => {
            cfg.service(index).service(asset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use tempfile::TempDir;

    #[actix_web::test]
    async fn test_embedded_client() {
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, None))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("/static/app.js"));
        assert!(html.contains("/static/preview_slot.js"));

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/static/app.js").to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.contains("javascript"));

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/static/preview_slot.js").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body).unwrap().contains("class PreviewSlot"));

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/static/missing.js").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_client_dir_override() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<p>custom</p>").unwrap();

        let path = dir.path().to_path_buf();
        let app = test::init_service(
            App::new().configure(|cfg| configure(cfg, Some(path.as_path()))),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "<p>custom</p>");
    }
}
