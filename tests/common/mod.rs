#![allow(dead_code)]

use actix_cors::Cors;
use actix_http::Request;
use actix_web::body::{to_bytes, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use tasktrack::config::{Config, JwtConfig};
use tasktrack::routes::health;
use tasktrack::state::AppState;

pub const SECRET: &str = "integration_test_secret_at_least_32_bytes";

pub fn test_config() -> Config {
    Config {
        database_url: None,
        database_max_connections: 1,
        server_port: 0,
        server_host: "127.0.0.1".into(),
        jwt: JwtConfig {
            secret: SECRET.into(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 7 * 24 * 3600,
        },
        bcrypt_cost: 4,
    }
}

/// The full application on a fresh in-memory store.
pub async fn init_app(
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let state = AppState::in_memory(&test_config());
    test::init_service(
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(web::Data::new(state.backend))
            .service(health::health) // health is outside /api and AuthMiddleware
            .service(web::scope("/api").configure(move |cfg| state.configure(cfg))),
    )
    .await
}

/// Calls the app and returns status and JSON body. Errors raised by
/// middleware are rendered the way the server would render them.
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, bytes) = match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            (status, test::read_body(resp).await)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            (status, to_bytes(resp.into_body()).await.unwrap())
        }
    };
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Registers an account and returns its tokens and id.
pub async fn register<S, B>(app: &S, email: &str, password: &str, name: &str) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "password": password, "name": name }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Registration failed: {}", body);

    let access_token = body["access_token"].as_str().unwrap().to_string();
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(bearer(&access_token))
        .to_request();
    let (status, users) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
    let id = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["email"] == email.to_lowercase())
        .map(|u| u["id"].as_str().unwrap().to_string())
        .unwrap();

    TestUser {
        id,
        email: email.to_lowercase(),
        access_token,
        refresh_token,
    }
}

pub async fn create_project<S, B>(app: &S, owner: &TestUser, name: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(bearer(&owner.access_token))
        .set_json(json!({ "name": name, "description": "integration" }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Project creation failed: {}", body);
    body
}
