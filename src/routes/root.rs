use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Landing endpoint. Returns a short welcome message.
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to the Todo App API"
    }))
}

/// Liveness probe for the process. Does not touch the database.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now()
    }))
}
