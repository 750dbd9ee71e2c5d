use crate::{
    auth::CurrentUser, error::AppError, models::ProjectInput, services::ProjectService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Creates a project owned by the caller.
///
/// ## Responses:
/// - `201 Created`: the new `Project`.
/// - `401 Unauthorized`: missing or invalid access token.
/// - `422 Unprocessable Entity`: name empty or too long.
#[post("")]
pub async fn create_project(
    projects: web::Data<ProjectService>,
    current: CurrentUser,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;

    let project = projects
        .create(project_data.into_inner(), &current.0)
        .await?;
    Ok(HttpResponse::Created().json(project))
}

/// Lists the caller's projects. Other users' projects are never included.
#[get("")]
pub async fn list_projects(
    projects: web::Data<ProjectService>,
    current: CurrentUser,
) -> Result<impl Responder, AppError> {
    let owned = projects.list(&current.0).await?;
    Ok(HttpResponse::Ok().json(owned))
}

/// ## Responses:
/// - `200 OK`: the `Project`.
/// - `403 Forbidden`: the caller does not own it.
/// - `404 Not Found`: no such project.
#[get("/{id}")]
pub async fn get_project(
    projects: web::Data<ProjectService>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = projects.get(path.into_inner(), &current.0).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[put("/{id}")]
pub async fn update_project(
    projects: web::Data<ProjectService>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;

    let project = projects
        .update(path.into_inner(), project_data.into_inner(), &current.0)
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

/// Deletes a project and all of its tasks.
#[delete("/{id}")]
pub async fn delete_project(
    projects: web::Data<ProjectService>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    projects.delete(path.into_inner(), &current.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
