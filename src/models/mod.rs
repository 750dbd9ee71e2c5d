pub mod project;
pub mod task;
pub mod user;

pub use project::{Project, ProjectInput};
pub use task::{Task, TaskInput, TaskStatus, TaskStatusInput};
pub use user::{normalize_email, User, UserResponse, UserUpdateInput};
