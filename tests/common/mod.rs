#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use actix_web::web;
use async_trait::async_trait;
use portfolio_projects::{
    entities::project::{ImageUrl, Project, ProjectPayload},
    errors::AppError,
    repositories::project::ProjectRepository,
    settings::AppConfig,
    AppState,
};
use tempfile::TempDir;
use uuid::Uuid;

/// Builds the full application around a [`TestContext`].
macro_rules! spawn_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .app_data($ctx.upload_limit)
                .wrap(actix_web::middleware::NormalizePath::trim())
                .configure(portfolio_projects::routes::configure_routes::<common::InMemoryProjectRepo>),
        )
        .await
    };
}

/// `ProjectRepository` kept in memory, with the same merge semantics as the
/// Postgres implementation.
#[derive(Clone, Default)]
pub struct InMemoryProjectRepo {
    projects: Arc<Mutex<Vec<Project>>>,
}

impl InMemoryProjectRepo {
    pub fn len(&self) -> usize {
        self.projects.lock().unwrap().len()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepo {
    async fn find_all(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError> {
        Ok(self.projects.lock().unwrap().iter().find(|p| p.id == *id).cloned())
    }

    async fn insert(&self, payload: &ProjectPayload, image_url: &ImageUrl) -> Result<Project, AppError> {
        let project = Project {
            id: Uuid::new_v4(),
            title: payload.title.clone().unwrap_or_default(),
            description: payload.description.clone().unwrap_or_default(),
            image_url: image_url.clone(),
            link: payload.link.clone().unwrap_or_default(),
            date: payload.date.clone().unwrap_or_default(),
            tags: payload.tags.clone().unwrap_or_default(),
            technologies: payload.technologies.clone().unwrap_or_default(),
        };

        self.projects.lock().unwrap().push(project.clone());
        Ok(project)
    }

    async fn update_by_id(
        &self,
        id: &Uuid,
        payload: &ProjectPayload,
        image_url: &ImageUrl,
    ) -> Result<Option<Project>, AppError> {
        let mut projects = self.projects.lock().unwrap();
        let Some(project) = projects.iter_mut().find(|p| p.id == *id) else {
            return Ok(None);
        };

        if let Some(title) = &payload.title {
            project.title = title.clone();
        }
        if let Some(description) = &payload.description {
            project.description = description.clone();
        }
        if let Some(link) = &payload.link {
            project.link = link.clone();
        }
        if let Some(date) = &payload.date {
            project.date = date.clone();
        }
        if let Some(tags) = &payload.tags {
            project.tags = tags.clone();
        }
        if let Some(technologies) = &payload.technologies {
            project.technologies = technologies.clone();
        }
        project.image_url = image_url.clone();

        Ok(Some(project.clone()))
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError> {
        let mut projects = self.projects.lock().unwrap();
        let position = projects.iter().position(|p| p.id == *id);
        Ok(position.map(|index| projects.remove(index)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct TestContext {
    pub upload_dir: TempDir,
    pub secrets_dir: TempDir,
    pub repo: InMemoryProjectRepo,
    pub state: web::Data<AppState<InMemoryProjectRepo>>,
    pub upload_limit: portfolio_projects::entities::upload::UploadLimit,
}

impl TestContext {
    pub fn new() -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
        let secrets_dir = tempfile::tempdir().expect("Failed to create secrets dir");

        let config = AppConfig::for_testing(
            upload_dir.path().to_path_buf(),
            secrets_dir.path().join("config.json"),
        );

        let repo = InMemoryProjectRepo::default();
        let state = web::Data::new(AppState::with_repository(&config, repo.clone()));

        Self {
            upload_dir,
            secrets_dir,
            repo,
            state,
            upload_limit: portfolio_projects::upload_limit(&config),
        }
    }

    pub fn with_upload_limit(mut self, part_bytes: usize, request_bytes: usize) -> Self {
        self.upload_limit = portfolio_projects::entities::upload::UploadLimit::new(part_bytes, request_bytes);
        self
    }

    pub fn upload_path(&self, stored_name: &str) -> PathBuf {
        self.upload_dir.path().join(stored_name)
    }

    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }

    pub fn write_secrets(&self, contents: &str) {
        std::fs::write(self.secrets_dir.path().join("config.json"), contents)
            .expect("Failed to write secrets file");
    }
}

const BOUNDARY: &str = "X-PROJECTS-TEST-BOUNDARY";

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                name, file_name
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", BOUNDARY)
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        let content_type = self.content_type();
        (content_type, self.body)
    }
}

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

pub fn project_data() -> String {
    serde_json::json!({
        "title": "Ultimate Converter",
        "description": ["Description of project 1.", "Another line of description for project 1."],
        "link": "https://ultimate-converter.example.net",
        "date": "2025-01",
        "tags": ["Website", "Software"],
        "technologies": ["Flask", "FFmpeg", "Python"]
    })
    .to_string()
}

/// `{field}-{millis}-{9 digits}{ext}`
pub fn matches_stored_name(name: &str, field: &str, ext: &str) -> bool {
    let Some(rest) = name.strip_prefix(&format!("{}-", field)) else {
        return false;
    };
    let Some(rest) = rest.strip_suffix(ext) else {
        return false;
    };
    let Some((millis, digits)) = rest.split_once('-') else {
        return false;
    };

    millis.parse::<i64>().is_ok() && digits.len() == 9 && digits.chars().all(|c| c.is_ascii_digit())
}
