use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{TaskInput, TaskStatusInput},
    services::TaskService,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Creates a task in one of the caller's projects.
///
/// Mounted under the projects scope as `/projects/{project_id}/tasks`.
///
/// ## Request Body:
/// A JSON object matching `TaskInput`:
/// - `title`: 1 to 200 characters.
/// - `description` (optional): at most 1000 characters.
/// - `deadline` (optional): `YYYY-MM-DD`, today or later.
/// - `assigned_user_id` (optional): an existing user's id.
///
/// ## Responses:
/// - `201 Created`: the new `Task`, status `TODO`.
/// - `400 Bad Request`: deadline in the past.
/// - `403 Forbidden`: the caller does not own the project.
/// - `404 Not Found`: no such project, or no such assignee.
/// - `422 Unprocessable Entity`: title or description out of bounds.
#[post("/{project_id}/tasks")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks
        .create(path.into_inner(), task_data.into_inner(), &current.0)
        .await?;
    Ok(HttpResponse::Created().json(task))
}

/// Lists the tasks of one of the caller's projects.
#[get("/{project_id}/tasks")]
pub async fn list_project_tasks(
    tasks: web::Data<TaskService>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let list = tasks.list_by_project(path.into_inner(), &current.0).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Retrieves a task. Being its assignee is not enough; the caller must own
/// the task's project.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(path.into_inner(), &current.0).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Replaces title, description, deadline and assignee. Status is untouched.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks
        .update(path.into_inner(), task_data.into_inner(), &current.0)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

#[patch("/{id}/status")]
pub async fn update_task_status(
    tasks: web::Data<TaskService>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    status_data: web::Json<TaskStatusInput>,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .update_status(path.into_inner(), status_data.status, &current.0)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    tasks.delete(path.into_inner(), &current.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
