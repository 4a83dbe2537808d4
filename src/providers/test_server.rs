//! Throwaway upstream servers for provider tests

use actix_web::{web, App, HttpServer};
use std::sync::Arc;

pub type Routes = Arc<dyn Fn(&mut web::ServiceConfig) + Send + Sync>;

/// Start a server on a random local port and return its base url
pub fn spawn(routes: Routes) -> String {
    let server = HttpServer::new(move || {
        let routes = routes.clone();
        App::new().configure(move |cfg| routes(cfg))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    format!("http://{}", addr)
}
