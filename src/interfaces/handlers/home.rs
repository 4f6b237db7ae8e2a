use actix_web::{get, HttpResponse, Responder};

use crate::constants::API_PREFIX;

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Portfolio CMS API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "resources": [
            format!("{API_PREFIX}/resources/projects"),
            format!("{API_PREFIX}/resources/blog"),
            format!("{API_PREFIX}/resources/skills"),
        ],
        "health": format!("{API_PREFIX}/health")
    }))
}
