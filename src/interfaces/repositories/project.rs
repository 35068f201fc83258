use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::project::{ImageUrl, Project, ProjectPayload, ProjectRow},
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Every stored project, oldest first
    async fn find_all(&self) -> Result<Vec<Project>, AppError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError>;

    /// Inserts a project; fields missing from `payload` are stored empty
    async fn insert(&self, payload: &ProjectPayload, image_url: &ImageUrl) -> Result<Project, AppError>;

    /// Merges `payload` into the stored project; fields missing from `payload` keep their value
    async fn update_by_id(
        &self,
        id: &Uuid,
        payload: &ProjectPayload,
        image_url: &ImageUrl,
    ) -> Result<Option<Project>, AppError>;

    /// Removes a project and returns what was stored
    async fn delete_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn find_all(&self) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"SELECT * FROM projects ORDER BY created_at ASC, id ASC"#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"SELECT * FROM projects WHERE id = $1"#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Project::from))
    }

    async fn insert(&self, payload: &ProjectPayload, image_url: &ImageUrl) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (
                title, description, image_grid, image_list, link, date, tags, technologies
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#
        )
        .bind(payload.title.clone().unwrap_or_default())
        .bind(payload.description.clone().unwrap_or_default())
        .bind(&image_url.grid)
        .bind(&image_url.list)
        .bind(payload.link.clone().unwrap_or_default())
        .bind(payload.date.clone().unwrap_or_default())
        .bind(payload.tags.clone().unwrap_or_default())
        .bind(payload.technologies.clone().unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_by_id(
        &self,
        id: &Uuid,
        payload: &ProjectPayload,
        image_url: &ImageUrl,
    ) -> Result<Option<Project>, AppError> {
        // COALESCE keeps the stored value for fields the client did not send
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                image_grid = $3,
                image_list = $4,
                link = COALESCE($5, link),
                date = COALESCE($6, date),
                tags = COALESCE($7, tags),
                technologies = COALESCE($8, technologies),
                updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#
        )
        .bind(payload.title.as_deref())
        .bind(payload.description.as_deref())
        .bind(&image_url.grid)
        .bind(&image_url.list)
        .bind(payload.link.as_deref())
        .bind(payload.date.as_deref())
        .bind(payload.tags.as_deref())
        .bind(payload.technologies.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Project::from))
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"DELETE FROM projects WHERE id = $1 RETURNING *"#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Project::from))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
