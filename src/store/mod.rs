//! Persistence ports.
//!
//! Services depend on these traits rather than a concrete database, so the
//! same authorization logic runs against Postgres in production and against
//! [`InMemoryStore`] in tests or when no `DATABASE_URL` is configured.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Project, Task, User};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Another account already uses this email.
    #[error("email already in use: {0}")]
    DuplicateEmail(String),
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::DuplicateEmail(db_err.message().to_string());
            }
        }
        StoreError::Database(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Which store the process is running against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl StoreBackend {
    /// Whether data survives a restart.
    pub fn is_persistent(self) -> bool {
        matches!(self, StoreBackend::Postgres)
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    /// Lookup by an already normalized email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn exists_by_email(&self, email: &str) -> StoreResult<bool>;
    async fn exists_by_id(&self, id: Uuid) -> StoreResult<bool>;
    async fn find_all(&self) -> StoreResult<Vec<User>>;
    /// Inserts or replaces by id. Fails with [`StoreError::DuplicateEmail`]
    /// when another account holds the email.
    async fn save(&self, user: User) -> StoreResult<User>;
    /// Removes the account, its projects with their tasks, and clears any
    /// task assignments pointing at it. Returns whether anything was removed.
    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Project>>;
    async fn find_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Project>>;
    async fn save(&self, project: Project) -> StoreResult<Project>;
    /// Removes the project and every task in it.
    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Task>>;
    async fn find_by_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>>;
    async fn save(&self, task: Task) -> StoreResult<Task>;
    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool>;
}
