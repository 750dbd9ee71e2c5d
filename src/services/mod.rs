//! Resource services. Each operation takes the calling user explicitly and
//! resolves the target before checking ownership, so a missing resource is
//! `NotFound` and someone else's is `Forbidden`.

pub mod projects;
pub mod tasks;
pub mod users;

pub use projects::ProjectService;
pub use tasks::TaskService;
pub use users::UserService;
