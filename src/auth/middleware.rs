use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::warn;

use crate::auth::token::TokenService;
use crate::error::AppError;

/// Requires a valid access token on every request it wraps and stores the
/// verified [`Claims`](crate::auth::Claims) in the request extensions.
///
/// Mounted per scope, so public routes (`/auth/*`, `/health`) are simply not
/// wrapped. The [`TokenService`] is taken from app data.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let tokens = match req.app_data::<web::Data<TokenService>>() {
            Some(tokens) => tokens.clone(),
            None => {
                let app_err =
                    AppError::InternalServerError("TokenService is not registered".into());
                return Box::pin(async move { Err(Error::from(app_err)) });
            }
        };

        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let token = match bearer {
            Some(token) => token,
            None => {
                let app_err = AppError::Unauthorized("Missing bearer token".into());
                return Box::pin(async move { Err(Error::from(app_err)) });
            }
        };

        match tokens.authenticate_access(token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(token_err) => {
                warn!("Rejected bearer token on {}: {}", req.path(), token_err);
                let app_err = AppError::InvalidToken(token_err);
                Box::pin(async move { Err(Error::from(app_err)) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claims;
    use crate::config::JwtConfig;
    use crate::models::User;
    use actix_web::{http::StatusCode, test, App, HttpRequest, HttpResponse};

    fn token_service() -> TokenService {
        TokenService::new(&JwtConfig {
            secret: "middleware_test_secret_at_least_32_bytes".into(),
            access_ttl_secs: 60,
            refresh_ttl_secs: 120,
        })
    }

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match req.extensions().get::<Claims>() {
            Some(claims) => HttpResponse::Ok().body(claims.sub.clone()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    #[actix_rt::test]
    async fn test_middleware_accepts_access_token() {
        let tokens = web::Data::new(token_service());
        let alice = User::new("alice@x.com", "hash", "Alice");
        let access = tokens.issue_access_token(&alice).unwrap();

        let app = test::init_service(
            App::new().app_data(tokens.clone()).service(
                web::scope("/me")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body, alice.id.to_string().as_bytes());
    }

    #[actix_rt::test]
    async fn test_middleware_rejects_missing_and_refresh_tokens() {
        let tokens = web::Data::new(token_service());
        let alice = User::new("alice@x.com", "hash", "Alice");
        let refresh = tokens.issue_refresh_token(&alice).unwrap();

        let app = test::init_service(
            App::new().app_data(tokens.clone()).service(
                web::scope("/me")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let missing = test::TestRequest::get().uri("/me").to_request();
        let err = test::try_call_service(&app, missing).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);

        let with_refresh = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", refresh)))
            .to_request();
        let err = test::try_call_service(&app, with_refresh).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }
}
