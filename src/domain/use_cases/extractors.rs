use actix_multipart::Multipart;
use actix_web::{
    dev::Payload,
    http::header::{self, HeaderMap},
    web::BytesMut,
    FromRequest, HttpRequest,
};
use futures_util::{future::LocalBoxFuture, StreamExt};
use serde_json::Map;

use crate::{
    constants::{GRID_IMAGE_FIELD, LIST_IMAGE_FIELD, PROJECT_DATA_FIELD},
    entities::{
        project::{decode_project_data, push_form_field, DecodedProject},
        upload::{ProjectForm, UploadLimit, UploadedImage},
    },
    errors::AppError,
};

/// Reads a create/update body: `multipart/form-data` with optional `gridImage`,
/// `listImage` and `projectData` parts, or a plain JSON project object. Any
/// other body carries no fields and decodes to an empty project.
///
/// Unreadable or undecodable bodies surface as 500s, oversized ones as 413s.
impl FromRequest for ProjectForm {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let limit = req.app_data::<UploadLimit>().copied().unwrap_or_default();
        let headers = req.headers().clone();
        let payload = payload.take();

        Box::pin(async move {
            match body_kind(&headers) {
                BodyKind::Json => read_json_form(payload, limit).await,
                BodyKind::Multipart => read_multipart_form(Multipart::new(&headers, payload), limit).await,
                BodyKind::Other => {
                    let data = decode_project_data(None, &Map::new())?;
                    Ok(ProjectForm::without_images(data))
                }
            }
        })
    }
}

#[derive(Debug, PartialEq)]
enum BodyKind {
    Json,
    Multipart,
    Other,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let essence = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if essence == "application/json" || essence.ends_with("+json") {
        BodyKind::Json
    } else if essence.starts_with("multipart/") {
        BodyKind::Multipart
    } else {
        BodyKind::Other
    }
}

async fn read_json_form(mut payload: Payload, limit: UploadLimit) -> Result<ProjectForm, AppError> {
    let mut body = BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::InternalError(format!("Failed to read request body: {}", e)))?;
        if body.len() + chunk.len() > limit.part_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Request body exceeds {} bytes",
                limit.part_bytes
            )));
        }
        body.extend_from_slice(&chunk);
    }

    let payload = serde_json::from_slice(&body)?;
    Ok(ProjectForm::without_images(DecodedProject::Parsed(payload)))
}

async fn read_multipart_form(mut multipart: Multipart, limit: UploadLimit) -> Result<ProjectForm, AppError> {
    let mut grid_image = None;
    let mut list_image = None;
    let mut project_data: Option<String> = None;
    let mut raw_fields = Map::new();
    let mut total = 0usize;

    while let Some(item) = multipart.next().await {
        let mut field = item?;

        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > limit.part_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "Field \"{}\" exceeds {} bytes",
                    name, limit.part_bytes
                )));
            }
            total += chunk.len();
            if total > limit.request_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "Request body exceeds {} bytes",
                    limit.request_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            GRID_IMAGE_FIELD | LIST_IMAGE_FIELD => {
                // a file input left empty by the browser still sends an unnamed, empty part
                if bytes.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
                    continue;
                }

                let image = UploadedImage {
                    field_name: name.clone(),
                    original_filename: file_name,
                    bytes,
                };
                if name == GRID_IMAGE_FIELD {
                    grid_image = Some(image);
                } else {
                    list_image = Some(image);
                }
            }
            "" => {}
            _ => {
                let value = String::from_utf8(bytes)
                    .map_err(|_| AppError::InternalError(format!("Field \"{}\" is not valid UTF-8", name)))?;
                if name == PROJECT_DATA_FIELD {
                    project_data = Some(value.clone());
                }
                push_form_field(&mut raw_fields, &name, value);
            }
        }
    }

    let data = decode_project_data(project_data.as_deref(), &raw_fields)?;
    if !data.is_parsed() {
        tracing::debug!("projectData was not JSON, using raw form fields");
    }

    Ok(ProjectForm { data, grid_image, list_image })
}
