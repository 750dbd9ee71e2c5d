use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{UserResponse, UserUpdateInput},
    services::UserService,
};
use actix_web::{delete, get, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Lists all users. Password hashes are never included.
#[get("")]
pub async fn list_users(
    users: web::Data<UserService>,
    _current: CurrentUser,
) -> Result<impl Responder, AppError> {
    let all: Vec<UserResponse> = users
        .find_all()
        .await?
        .iter()
        .map(UserResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(all))
}

#[get("/{id}")]
pub async fn get_user(
    users: web::Data<UserService>,
    _current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let user = users.find_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// Updates the caller's own account.
///
/// ## Responses:
/// - `200 OK`: the updated user.
/// - `400 Bad Request`: the new email is taken.
/// - `403 Forbidden`: the id is someone else's.
/// - `404 Not Found`: no such user.
/// - `422 Unprocessable Entity`: invalid input.
#[put("/{id}")]
pub async fn update_user(
    users: web::Data<UserService>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    user_data: web::Json<UserUpdateInput>,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    let user = users
        .update(path.into_inner(), user_data.into_inner(), &current.0)
        .await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// Deletes the caller's own account, its projects and their tasks.
#[delete("/{id}")]
pub async fn delete_user(
    users: web::Data<UserService>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    users.delete(path.into_inner(), &current.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
