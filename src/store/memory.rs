use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ProjectStore, StoreError, StoreResult, TaskStore, UserStore};
use crate::models::{Project, Task, User};

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
}

/// Process-local store behind a single lock. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_creation<T, F>(mut items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> (chrono::DateTime<chrono::Utc>, Uuid),
{
    items.sort_by_key(key);
    items
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        let state = self.state.read().await;
        Ok(state.users.values().any(|u| u.email == email))
    }

    async fn exists_by_id(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.state.read().await.users.contains_key(&id))
    }

    async fn find_all(&self) -> StoreResult<Vec<User>> {
        let users = self.state.read().await.users.values().cloned().collect();
        Ok(sorted_by_creation(users, |u: &User| (u.created_at, u.id)))
    }

    async fn save(&self, user: User) -> StoreResult<User> {
        let mut state = self.state.write().await;
        // Checked under the write lock so two concurrent registrations cannot
        // both claim the same email.
        let taken = state
            .users
            .values()
            .any(|u| u.email == user.email && u.id != user.id);
        if taken {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }

        let owned: Vec<Uuid> = state
            .projects
            .values()
            .filter(|p| p.owner_id == id)
            .map(|p| p.id)
            .collect();
        state.projects.retain(|_, p| p.owner_id != id);
        state.tasks.retain(|_, t| !owned.contains(&t.project_id));
        for task in state.tasks.values_mut() {
            if task.assigned_user_id == Some(id) {
                task.assigned_user_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.state.read().await.projects.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Project>> {
        let projects = self
            .state
            .read()
            .await
            .projects
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(sorted_by_creation(projects, |p: &Project| (p.created_at, p.id)))
    }

    async fn save(&self, project: Project) -> StoreResult<Project> {
        let mut state = self.state.write().await;
        state.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.projects.remove(&id).is_none() {
            return Ok(false);
        }
        state.tasks.retain(|_, t| t.project_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.state.read().await.tasks.get(&id).cloned())
    }

    async fn find_by_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        let tasks = self
            .state
            .read()
            .await
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        Ok(sorted_by_creation(tasks, |t: &Task| (t.created_at, t.id)))
    }

    async fn save(&self, task: Task) -> StoreResult<Task> {
        let mut state = self.state.write().await;
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.state.write().await.tasks.remove(&id).is_some())
    }
}
