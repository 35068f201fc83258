use actix_web::{web, HttpResponse, Responder};
use tracing::{error, instrument};

use crate::{errors::SecretsError, repositories::project::ProjectRepository, AppState};

#[instrument(skip(state))]
pub async fn get_secret<R: ProjectRepository + 'static>(
    key: web::Path<String>,
    state: web::Data<AppState<R>>,
) -> impl Responder {
    let key = key.into_inner();

    match state.secrets.get(&key).await {
        Ok(Some(value)) => HttpResponse::Ok().json(serde_json::json!({ key: value })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Secret with key \"{}\" not found", key)
        })),
        Err(SecretsError::ConfigMissing) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Configuration file not found"
        })),
        Err(e) => {
            error!("Failed to retrieve secret {}: {}", key, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to retrieve secret"
            }))
        }
    }
}
