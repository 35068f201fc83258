use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;
use std::time::Duration;

use crate::{constants::START_TIME, repositories::project::ProjectRepository, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    uptime: String,
    timestamp: String,
    start_at: String,
    database: &'static str,
    version: &'static str,
}

pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Portfolio projects API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "projects": "/api/projects"
    }))
}

pub async fn health_check<R: ProjectRepository + 'static>(
    state: web::Data<AppState<R>>,
) -> impl Responder {
    let now_utc = Utc::now();
    let uptime = now_utc.signed_duration_since(*START_TIME);
    let uptime = format_duration(Duration::from_secs(uptime.num_seconds().max(0) as u64));

    let database = match state.project_handler.project_repo.ping().await {
        Ok(()) => "OK",
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            "Unavailable"
        }
    };

    HttpResponse::Ok().json(HealthCheckResponse {
        status: "healthy",
        uptime: uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        database,
        version: env!("CARGO_PKG_VERSION"),
    })
}
