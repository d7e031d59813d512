use actix_web::{HttpResponse, Responder};
use serde_json::json;

/// Liveness check
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "Ok",
            "message": "Office portal API is running"
        }))
    ),
    tag = "Health"
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "Ok",
        "message": "Office portal API is running"
    }))
}
