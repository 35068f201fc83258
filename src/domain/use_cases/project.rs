use tracing::{debug, info};

use crate::{
    constants::{GRID_IMAGE_FIELD, LIST_IMAGE_FIELD},
    entities::{
        project::{ImageUrl, Project},
        upload::{ProjectForm, UploadedImage},
    },
    errors::AppError,
    repositories::project::ProjectRepository,
    storage::file_store::{LocalFileStore, StoredFile},
    utils::valid_uuid::valid_uuid,
};

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".to_string())
}

pub struct ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub project_repo: R,
    pub file_store: LocalFileStore,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(project_repo: R, file_store: LocalFileStore) -> Self {
        ProjectHandler { project_repo, file_store }
    }

    /// Lists every project
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo.find_all().await
    }

    /// Retrieves a project by its ID
    pub async fn get_project(&self, id: &str) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;

        self.project_repo
            .find_by_id(&valid_id)
            .await?
            .ok_or_else(project_not_found)
    }

    /// Stores the uploaded images and inserts the project
    pub async fn create_project(&self, form: ProjectForm) -> Result<Project, AppError> {
        debug!(parsed = form.data.is_parsed(), "Creating project");
        let payload = form.data.into_payload();

        let (grid, list) = self.store_images(form.grid_image.as_ref(), form.list_image.as_ref()).await?;
        let image_url = ImageUrl::new(grid.unwrap_or_default(), list.unwrap_or_default());

        match self.project_repo.insert(&payload, &image_url).await {
            Ok(project) => {
                info!(project_id = %project.id, "Created project");
                Ok(project)
            }
            Err(e) => {
                self.discard(image_url.stored_names()).await;
                Err(e)
            }
        }
    }

    /// Merges the submitted fields into an existing project. Each image slot is
    /// replaced only when a new file was uploaded for it; the replaced file is
    /// removed once the row is updated.
    pub async fn update_project(&self, id: &str, form: ProjectForm) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;
        debug!(parsed = form.data.is_parsed(), "Updating project {}", valid_id);
        let payload = form.data.into_payload();

        let existing = self.project_repo
            .find_by_id(&valid_id)
            .await?
            .ok_or_else(project_not_found)?;

        let (new_grid, new_list) = self.store_images(form.grid_image.as_ref(), form.list_image.as_ref()).await?;
        let fresh: Vec<&str> = new_grid.iter().chain(new_list.iter()).map(String::as_str).collect();

        let image_url = ImageUrl::new(
            new_grid.clone().unwrap_or_else(|| existing.image_url.grid.clone()),
            new_list.clone().unwrap_or_else(|| existing.image_url.list.clone()),
        );

        let updated = match self.project_repo.update_by_id(&valid_id, &payload, &image_url).await {
            Ok(Some(project)) => project,
            Ok(None) => {
                self.discard(fresh).await;
                return Err(project_not_found());
            }
            Err(e) => {
                self.discard(fresh).await;
                return Err(e);
            }
        };

        if new_grid.is_some() {
            self.file_store.delete(&existing.image_url.grid).await;
        }
        if new_list.is_some() {
            self.file_store.delete(&existing.image_url.list).await;
        }

        info!(project_id = %updated.id, "Updated project");
        Ok(updated)
    }

    /// Deletes a project and, best-effort, its image files
    pub async fn delete_project(&self, id: &str) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;

        let deleted = self.project_repo
            .delete_by_id(&valid_id)
            .await?
            .ok_or_else(project_not_found)?;

        self.discard(deleted.image_url.stored_names()).await;

        info!(project_id = %deleted.id, "Deleted project");
        Ok(deleted)
    }

    /// Reads a stored image for serving
    pub async fn read_image(&self, file_name: &str) -> Result<Option<StoredFile>, AppError> {
        match self.file_store.read(file_name).await {
            Ok(file) => Ok(file),
            Err(crate::errors::FileStoreError::InvalidName(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store_images(
        &self,
        grid: Option<&UploadedImage>,
        list: Option<&UploadedImage>,
    ) -> Result<(Option<String>, Option<String>), AppError> {
        let grid_name = self.store_image(GRID_IMAGE_FIELD, grid).await?;

        match self.store_image(LIST_IMAGE_FIELD, list).await {
            Ok(list_name) => Ok((grid_name, list_name)),
            Err(e) => {
                self.discard(grid_name.as_deref()).await;
                Err(e)
            }
        }
    }

    async fn store_image(
        &self,
        field_name: &str,
        image: Option<&UploadedImage>,
    ) -> Result<Option<String>, AppError> {
        let Some(image) = image else {
            return Ok(None);
        };

        let stored = self.file_store
            .save(field_name, image.original_filename.as_deref(), &image.bytes)
            .await?;

        Ok(Some(stored))
    }

    async fn discard<'a>(&self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.file_store.delete(name).await;
        }
    }
}
