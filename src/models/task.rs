use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    /// Not started yet. Every new task begins here.
    Todo,
    /// Being worked on.
    Doing,
    /// Finished.
    Done,
}

/// Input for creating or updating a task.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Must not be in the past.
    pub deadline: Option<NaiveDate>,

    /// Informational only; never grants access to the task.
    pub assigned_user_id: Option<Uuid>,
}

/// Payload for the dedicated status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusInput {
    pub status: TaskStatus,
}

/// Represents a task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub deadline: Option<NaiveDate>,
    /// Parent project; fixed at creation. Access to the task is decided by
    /// this project's owner.
    pub project_id: Uuid,
    pub assigned_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// New tasks always start as `TODO`.
    pub fn new(input: TaskInput, project_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: TaskStatus::Todo,
            deadline: input.deadline,
            project_id,
            assigned_user_id: input.assigned_user_id,
            created_at: Utc::now(),
        }
    }

    /// Replaces the editable fields. Status and parent project are untouched;
    /// an absent assignee clears the assignment.
    pub fn apply(&mut self, input: TaskInput) {
        self.title = input.title;
        self.description = input.description;
        self.deadline = input.deadline;
        self.assigned_user_id = input.assigned_user_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: Some("Login screen".to_string()),
            deadline: None,
            assigned_user_id: None,
        }
    }

    #[test]
    fn test_task_creation() {
        let project_id = Uuid::new_v4();
        let task = Task::new(input("Implement login"), project_id);

        assert_eq!(task.title, "Implement login");
        assert_eq!(task.project_id, project_id);
        assert_eq!(task.status, TaskStatus::Todo);
        assert!(task.assigned_user_id.is_none());
    }

    #[test]
    fn test_apply_keeps_status_and_project() {
        let project_id = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let mut task = Task::new(input("Implement login"), project_id);
        task.status = TaskStatus::Doing;

        task.apply(TaskInput {
            assigned_user_id: Some(assignee),
            ..input("Implement login v2")
        });

        assert_eq!(task.title, "Implement login v2");
        assert_eq!(task.status, TaskStatus::Doing);
        assert_eq!(task.project_id, project_id);
        assert_eq!(task.assigned_user_id, Some(assignee));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_value(TaskStatus::Doing).unwrap(), "DOING");
        let parsed: TaskStatusInput = serde_json::from_str(r#"{"status":"DONE"}"#).unwrap();
        assert_eq!(parsed.status, TaskStatus::Done);
        assert!(serde_json::from_str::<TaskStatusInput>(r#"{"status":"REVIEW"}"#).is_err());
    }

    #[test]
    fn test_task_validation() {
        assert!(input("Valid Title").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input(&"a".repeat(201)).validate().is_err());

        let long_description = TaskInput {
            description: Some("b".repeat(1001)),
            ..input("Valid title")
        };
        assert!(long_description.validate().is_err());
    }
}
