use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A project and its single, permanent owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Set at creation and never changed.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(input: ProjectInput, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// Applies an update. The owner is not part of the input and stays put.
    pub fn apply(&mut self, input: ProjectInput) {
        self.name = input.name;
        self.description = input.description;
    }
}

/// Input for creating or updating a project.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}
