use std::sync::Arc;

use actix_web::{
    error::{JsonPayloadError, PathError},
    web, HttpRequest,
};
use log::debug;
use sqlx::PgPool;

use crate::auth::{AuthService, PasswordHasher, TokenService};
use crate::config::Config;
use crate::error::AppError;
use crate::routes;
use crate::services::{ProjectService, TaskService, UserService};
use crate::store::{InMemoryStore, PgStore, ProjectStore, StoreBackend, TaskStore, UserStore};

/// Everything a worker needs, wired once at startup and cloned into each
/// actix worker. All fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub backend: StoreBackend,
    pub tokens: web::Data<TokenService>,
    pub auth: web::Data<AuthService>,
    pub users: web::Data<UserService>,
    pub projects: web::Data<ProjectService>,
    pub tasks: web::Data<TaskService>,
}

impl AppState {
    pub fn new(
        config: &Config,
        backend: StoreBackend,
        users: Arc<dyn UserStore>,
        projects: Arc<dyn ProjectStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Self {
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        let tokens = Arc::new(TokenService::new(&config.jwt));

        Self {
            backend,
            auth: web::Data::new(AuthService::new(users.clone(), hasher, tokens.clone())),
            users: web::Data::new(UserService::new(users.clone(), hasher)),
            projects: web::Data::new(ProjectService::new(projects.clone())),
            tasks: web::Data::new(TaskService::new(tasks, projects, users)),
            tokens: web::Data::from(tokens),
        }
    }

    /// Backed by a fresh process-local store.
    pub fn in_memory(config: &Config) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(config, StoreBackend::Memory, store.clone(), store.clone(), store)
    }

    pub fn postgres(pool: PgPool, config: &Config) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self::new(config, StoreBackend::Postgres, store.clone(), store.clone(), store)
    }

    /// Registers app data and the API routes. Mount inside the `/api` scope.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.tokens.clone())
            .app_data(self.auth.clone())
            .app_data(self.users.clone())
            .app_data(self.projects.clone())
            .app_data(self.tasks.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .configure(routes::config);
    }
}

/// Malformed JSON bodies get the same `{"error": ...}` shape as everything else.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected JSON payload: {}", err);
    AppError::BadRequest(format!("Invalid JSON payload: {}", err)).into()
}

/// Unparseable path segments, such as an id that is not a UUID.
fn path_error(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected path {}: {}", req.path(), err);
    AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
}
