use std::sync::Arc;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::auth::PasswordHasher;
use crate::error::AppError;
use crate::models::{normalize_email, User, UserUpdateInput};
use crate::store::UserStore;

pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    pub async fn find_all(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.find_all().await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User, AppError> {
        debug!("Loading user {}", id);
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Updates name, email and optionally password. Only the account itself
    /// may do this.
    pub async fn update(
        &self,
        id: Uuid,
        input: UserUpdateInput,
        current: &User,
    ) -> Result<User, AppError> {
        let mut user = self.find_by_id(id).await?;
        require_self(&user, current)?;

        let email = normalize_email(&input.email);
        if email != user.email && self.users.exists_by_email(&email).await? {
            return Err(AppError::EmailTaken);
        }

        user.name = input.name.trim().to_string();
        user.email = email;
        if let Some(password) = input.password.as_deref() {
            user.password_hash = self.hasher.hash(password)?;
        }

        let saved = self.users.save(user).await?;
        info!("User {} updated", saved.id);
        Ok(saved)
    }

    /// Deletes the account along with its projects.
    pub async fn delete(&self, id: Uuid, current: &User) -> Result<(), AppError> {
        let user = self.find_by_id(id).await?;
        require_self(&user, current)?;

        if !self.users.delete_by_id(user.id).await? {
            return Err(AppError::NotFound("User not found".into()));
        }
        info!("User {} deleted", user.id);
        Ok(())
    }
}

fn require_self(target: &User, current: &User) -> Result<(), AppError> {
    if target.id == current.id {
        return Ok(());
    }
    warn!("User {} attempted to modify user {}", current.id, target.id);
    Err(AppError::Forbidden(
        "You can only modify your own account".into(),
    ))
}
