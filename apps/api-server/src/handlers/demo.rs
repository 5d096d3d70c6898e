//! Demo endpoints - trivial routes that exist to exercise the gate.

use actix_web::{HttpResponse, Responder};

/// GET /
pub async fn index() -> impl Responder {
    "Welcome to API"
}

/// GET /status
pub async fn status() -> HttpResponse {
    HttpResponse::Ok().json(["Success", "Fail", "Pending"])
}

/// GET /languages
pub async fn languages() -> HttpResponse {
    HttpResponse::Ok().json(["Java", "Python", "JS"])
}
