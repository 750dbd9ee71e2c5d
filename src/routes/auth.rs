use crate::{
    auth::{AuthService, LoginRequest, RefreshRequest, RegisterRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns an access/refresh token pair.
///
/// ## Responses:
/// - `201 Created`: `AuthResponse` JSON.
/// - `400 Bad Request`: the email is already registered.
/// - `422 Unprocessable Entity`: invalid email, short password or bad name.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    register_data.validate()?;

    let response = auth
        .register(
            &register_data.email,
            &register_data.password,
            &register_data.name,
        )
        .await?;

    Ok(HttpResponse::Created().json(response))
}

/// Login user
///
/// Authenticates a user and returns an access/refresh token pair.
///
/// ## Responses:
/// - `200 OK`: `AuthResponse` JSON.
/// - `401 Unauthorized`: unknown email or wrong password (same body either way).
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    let response = auth.login(&login_data.email, &login_data.password).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Refresh access token
///
/// Exchanges a refresh token for a new access token. The refresh token is
/// returned unchanged.
///
/// ## Responses:
/// - `200 OK`: `AuthResponse` JSON.
/// - `401 Unauthorized`: the token is invalid, expired, not a refresh token,
///   or its account no longer exists.
#[post("/refresh")]
pub async fn refresh(
    auth: web::Data<AuthService>,
    refresh_data: web::Json<RefreshRequest>,
) -> Result<impl Responder, AppError> {
    refresh_data.validate()?;

    let response = auth.refresh(&refresh_data.refresh_token).await?;

    Ok(HttpResponse::Ok().json(response))
}
