use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::store::StoreBackend;

/// Liveness check, mounted outside `/api` and its auth middleware.
///
/// Reports the active store so that an operator can tell a server running on
/// the in-memory fallback apart from one backed by Postgres.
#[get("/health")]
pub async fn health(backend: web::Data<StoreBackend>) -> impl Responder {
    let backend = *backend.get_ref();
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "store": backend,
        "persistent": backend.is_persistent(),
        "checked_at": Utc::now(),
    }))
}
