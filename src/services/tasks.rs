use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::{debug, info};
use uuid::Uuid;

use crate::auth::{require_ownership, require_task_access};
use crate::error::AppError;
use crate::models::{Project, Task, TaskInput, TaskStatus, User};
use crate::store::{ProjectStore, TaskStore, UserStore};

/// Task operations. Access always goes through the parent project's owner.
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    projects: Arc<dyn ProjectStore>,
    users: Arc<dyn UserStore>,
}

impl TaskService {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        projects: Arc<dyn ProjectStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            tasks,
            projects,
            users,
        }
    }

    pub async fn get(&self, id: Uuid, current: &User) -> Result<Task, AppError> {
        let task = self.load_accessible(id, current).await?;
        Ok(task)
    }

    pub async fn list_by_project(
        &self,
        project_id: Uuid,
        current: &User,
    ) -> Result<Vec<Task>, AppError> {
        let project = self.owned_project(project_id, current).await?;
        Ok(self.tasks.find_by_project(project.id).await?)
    }

    /// New tasks start as `TODO`.
    pub async fn create(
        &self,
        project_id: Uuid,
        input: TaskInput,
        current: &User,
    ) -> Result<Task, AppError> {
        let project = self.owned_project(project_id, current).await?;
        self.check_input(&input).await?;

        let task = self.tasks.save(Task::new(input, project.id)).await?;
        info!("User {} created task {} in project {}", current.id, task.id, project.id);
        Ok(task)
    }

    /// Replaces title, description, deadline and assignee.
    pub async fn update(&self, id: Uuid, input: TaskInput, current: &User) -> Result<Task, AppError> {
        let mut task = self.load_accessible(id, current).await?;
        self.check_input(&input).await?;

        task.apply(input);
        Ok(self.tasks.save(task).await?)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: TaskStatus,
        current: &User,
    ) -> Result<Task, AppError> {
        let mut task = self.load_accessible(id, current).await?;
        task.status = status;
        Ok(self.tasks.save(task).await?)
    }

    pub async fn delete(&self, id: Uuid, current: &User) -> Result<(), AppError> {
        let task = self.load_accessible(id, current).await?;
        self.tasks.delete_by_id(task.id).await?;
        info!("User {} deleted task {}", current.id, task.id);
        Ok(())
    }

    async fn owned_project(&self, project_id: Uuid, current: &User) -> Result<Project, AppError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
        require_ownership(&project, current)?;
        Ok(project)
    }

    /// Resolves the task and its parent, then checks access.
    async fn load_accessible(&self, id: Uuid, current: &User) -> Result<Task, AppError> {
        debug!("Loading task {}", id);
        let task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
        let project = self
            .projects
            .find_by_id(task.project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
        require_task_access(&task, &project, current)?;
        Ok(task)
    }

    async fn check_input(&self, input: &TaskInput) -> Result<(), AppError> {
        validate_deadline(input.deadline, Utc::now().date_naive())?;
        if let Some(assignee) = input.assigned_user_id {
            if !self.users.exists_by_id(assignee).await? {
                return Err(AppError::NotFound("Assigned user not found".into()));
            }
        }
        Ok(())
    }
}

/// Deadlines may be today or later.
fn validate_deadline(deadline: Option<NaiveDate>, today: NaiveDate) -> Result<(), AppError> {
    match deadline {
        Some(date) if date < today => Err(AppError::BadRequest(
            "Deadline cannot be in the past".into(),
        )),
        _ => Ok(()),
    }
}
