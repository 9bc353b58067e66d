#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::test;
use jsonwebtoken::Algorithm;
use serde_json::{json, Value};
use todo_api::auth::{TokenIssuer, TokenResponse};
use todo_api::Config;

pub const SECRET: &str = "integration-test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: std::env::var("DATABASE_URL").unwrap_or_default(),
        database_max_connections: 2,
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        secret_key: SECRET.to_string(),
        algorithm: Algorithm::HS256,
        access_token_ttl_minutes: 20,
        refresh_grace_minutes: 30,
        // Lowest cost bcrypt accepts; keeps the suite fast.
        bcrypt_cost: 4,
    }
}

pub fn test_issuer() -> TokenIssuer {
    TokenIssuer::from_config(&test_config())
}

/// Builds the full application around the given store.
macro_rules! test_app {
    ($store:expr, $store_ty:ty) => {{
        let config = crate::common::test_config();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($store))
                .app_data(actix_web::web::Data::new(todo_api::auth::TokenIssuer::from_config(
                    &config,
                )))
                .app_data(actix_web::web::Data::new(config))
                .wrap(actix_web::middleware::Logger::default())
                .configure(todo_api::routes::config::<$store_ty>),
        )
        .await
    }};
}

pub async fn signup<S, B>(app: &S, username: &str, password: &str, email: &str) -> StatusCode
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({
            "username": username,
            "password": password,
            "email": email
        }))
        .to_request();
    test::call_service(app, req).await.status()
}

pub async fn login<S, B>(app: &S, username: &str, password: &str) -> Result<String, StatusCode>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_form([("username", username), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    if resp.status() != StatusCode::OK {
        return Err(resp.status());
    }
    let body: TokenResponse = test::read_body_json(resp).await;
    assert_eq!(body.token_type, "bearer");
    Ok(body.access_token)
}

/// Signs up and logs in, returning the access token.
pub async fn register_and_login<S, B>(app: &S, username: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let email = format!("{}@example.com", username);
    let status = signup(app, username, "pw", &email).await;
    assert_eq!(status, StatusCode::CREATED, "signup of {} failed", username);
    login(app, username, "pw")
        .await
        .unwrap_or_else(|status| panic!("login of {} failed with {}", username, status))
}

/// Sends a request with an optional bearer token and returns the status and JSON body.
pub async fn send<S, B>(
    app: &S,
    req: test::TestRequest,
    token: Option<&str>,
) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = match token {
        Some(token) => req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token))),
        None => req,
    };
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}
