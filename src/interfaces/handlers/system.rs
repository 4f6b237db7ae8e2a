use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;
use std::time::Duration;

use crate::{constants::START_TIME, settings::AppEnvironment, store::BackendKind, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    uptime: String,
    timestamp: String,
    start_at: String,
    version: &'static str,
    database: &'static str,
}

#[derive(Serialize)]
struct StatusResponse {
    configured: bool,
    backend: Option<BackendKind>,
    store_url_set: bool,
    store_key_set: bool,
    environment: AppEnvironment,
    mode: &'static str,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now_utc = Utc::now();
    let uptime = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime.num_seconds().max(0) as u64));

    let database = if state.gateway.is_configured() {
        match state.gateway.ping().await {
            Ok(()) => "OK",
            Err(_) => "Unavailable",
        }
    } else {
        "Not configured"
    };

    HttpResponse::Ok().json(HealthCheckResponse {
        status: "healthy",
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

/// Reports whether writes can reach a store. Never exposes the URL or key.
#[get("/status")]
pub async fn store_status(state: web::Data<AppState>) -> impl Responder {
    let configured = state.gateway.is_configured();
    let summary = &state.config_summary;

    HttpResponse::Ok().json(StatusResponse {
        configured,
        backend: state.gateway.backend_kind(),
        store_url_set: summary.store_url_set,
        store_key_set: summary.store_key_set,
        environment: summary.environment.clone(),
        mode: if configured { "database" } else { "fallback" },
    })
}
