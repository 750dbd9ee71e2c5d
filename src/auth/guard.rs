//! Ownership checks.
//!
//! A user may act on a project only if they own it, and on a task only if
//! they own the task's project. Assignment never enters into it. Callers
//! resolve the resources first and report `NotFound` for missing ones, so
//! these functions only ever see things that exist.

use log::warn;

use crate::error::AppError;
use crate::models::{Project, Task, User};

pub fn is_owner(project: &Project, user: &User) -> bool {
    project.owner_id == user.id
}

pub fn require_ownership(project: &Project, user: &User) -> Result<(), AppError> {
    if is_owner(project, user) {
        return Ok(());
    }
    warn!("User {} denied access to project {}", user.id, project.id);
    Err(AppError::Forbidden(
        "You do not have permission to access this project".into(),
    ))
}

/// `project` must be the task's parent; access follows the project's owner.
pub fn require_task_access(task: &Task, project: &Project, user: &User) -> Result<(), AppError> {
    if task.project_id != project.id {
        warn!(
            "Task {} checked against unrelated project {}",
            task.id, project.id
        );
        return Err(AppError::Forbidden(
            "You do not have permission to access this task".into(),
        ));
    }
    require_ownership(project, user)
}
