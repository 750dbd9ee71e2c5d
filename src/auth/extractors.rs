use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::auth::token::Claims;
use crate::error::AppError;
use crate::models::User;
use crate::services::UserService;

/// The account behind the request's access token.
///
/// Only usable on routes wrapped by `AuthMiddleware`, which verifies the token
/// and leaves its claims in the request extensions. The account is reloaded
/// so that a token outliving its user is refused.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let users = req.app_data::<web::Data<UserService>>().cloned();

        Box::pin(async move {
            let claims = claims.ok_or_else(|| {
                AppError::Unauthorized(
                    "No authenticated user on request. Ensure AuthMiddleware is active.".into(),
                )
            })?;
            let users = users.ok_or_else(|| {
                AppError::InternalServerError("UserService is not registered".into())
            })?;

            let user_id = claims.user_id().map_err(AppError::InvalidToken)?;
            let user = users.find_by_id(user_id).await.map_err(|e| match e {
                AppError::NotFound(_) => AppError::Unauthorized("Account no longer exists".into()),
                other => other,
            })?;
            Ok::<CurrentUser, ActixError>(CurrentUser(user))
        })
    }
}
