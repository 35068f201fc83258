mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, secrets, storage, utils};

use entities::upload::UploadLimit;
use repositories::{project::ProjectRepository, sqlx_repo::SqlxProjectRepo};
use secrets::SecretsStore;
use storage::file_store::LocalFileStore;
use use_cases::project::ProjectHandler;

pub struct AppState<R = SqlxProjectRepo>
where
    R: ProjectRepository,
{
    pub project_handler: ProjectHandler<R>,
    pub secrets: SecretsStore,
}

impl AppState<SqlxProjectRepo> {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        Self::with_repository(config, SqlxProjectRepo::new(pool))
    }
}

impl<R> AppState<R>
where
    R: ProjectRepository,
{
    pub fn with_repository(config: &settings::AppConfig, project_repo: R) -> Self {
        let file_store = LocalFileStore::new(config.upload_dir.clone());

        AppState {
            project_handler: ProjectHandler::new(project_repo, file_store),
            secrets: SecretsStore::new(config.secrets_path.clone()),
        }
    }
}

pub fn upload_limit(config: &settings::AppConfig) -> UploadLimit {
    UploadLimit::new(config.max_upload_bytes, config.max_request_bytes)
}
