use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;

use crate::auth::require_ownership;
use crate::error::AppError;
use crate::models::{Project, ProjectInput, User};
use crate::store::ProjectStore;

pub struct ProjectService {
    projects: Arc<dyn ProjectStore>,
}

impl ProjectService {
    pub fn new(projects: Arc<dyn ProjectStore>) -> Self {
        Self { projects }
    }

    /// Loads a project the caller owns.
    pub async fn get(&self, id: Uuid, current: &User) -> Result<Project, AppError> {
        debug!("Loading project {}", id);
        let project = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
        require_ownership(&project, current)?;
        Ok(project)
    }

    /// Only the caller's own projects.
    pub async fn list(&self, current: &User) -> Result<Vec<Project>, AppError> {
        Ok(self.projects.find_by_owner(current.id).await?)
    }

    pub async fn create(&self, input: ProjectInput, current: &User) -> Result<Project, AppError> {
        let project = self.projects.save(Project::new(input, current.id)).await?;
        info!("User {} created project {}", current.id, project.id);
        Ok(project)
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: ProjectInput,
        current: &User,
    ) -> Result<Project, AppError> {
        let mut project = self.get(id, current).await?;
        project.apply(input);
        Ok(self.projects.save(project).await?)
    }

    /// Removes the project and its tasks.
    pub async fn delete(&self, id: Uuid, current: &User) -> Result<(), AppError> {
        let project = self.get(id, current).await?;
        self.projects.delete_by_id(project.id).await?;
        info!("User {} deleted project {}", current.id, project.id);
        Ok(())
    }
}
