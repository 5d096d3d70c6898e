//! HTTP handlers and route configuration.

mod demo;
mod health;

use actix_web::web;

/// Configure all application routes. Every route here sits behind the
/// rate-limit middleware registered in `main`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(demo::index))
        .route("/status", web::get().to(demo::status))
        .route("/languages", web::get().to(demo::languages))
        .route("/health", web::get().to(health::health_check));
}
