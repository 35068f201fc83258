use actix_web::{http::header::ContentType, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::upload::ProjectForm,
    errors::AppError,
    repositories::project::ProjectRepository,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_projects<R: ProjectRepository + 'static>(
    state: web::Data<AppState<R>>,
) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_projects().await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(state))]
pub async fn get_project<R: ProjectRepository + 'static>(
    project_id: web::Path<String>,
    state: web::Data<AppState<R>>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(state, form))]
pub async fn create_project<R: ProjectRepository + 'static>(
    state: web::Data<AppState<R>>,
    form: ProjectForm,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.create_project(form).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(state, form))]
pub async fn update_project<R: ProjectRepository + 'static>(
    project_id: web::Path<String>,
    state: web::Data<AppState<R>>,
    form: ProjectForm,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.update_project(&project_id, form).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(state))]
pub async fn delete_project<R: ProjectRepository + 'static>(
    project_id: web::Path<String>,
    state: web::Data<AppState<R>>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.delete_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(state))]
pub async fn serve_image<R: ProjectRepository + 'static>(
    file_name: web::Path<String>,
    state: web::Data<AppState<R>>,
) -> Result<HttpResponse, AppError> {
    match state.project_handler.read_image(&file_name).await? {
        Some(file) => Ok(HttpResponse::Ok()
            .content_type(file.content_type)
            .body(file.bytes)),
        None => Ok(HttpResponse::NotFound()
            .insert_header(ContentType::plaintext())
            .body("File not found")),
    }
}
