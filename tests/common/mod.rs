use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use social::router::init_router;
use social::state::AppState;
use social_auth::{ExternalProfile, StaticIdentityProvider};
use social_config::{CorsConfig, JwtConfig};
use social_models::{Role, User};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";
pub const TEST_PASSWORD: &str = "123456";

/// Provider token accepted by [`setup_test_app`].
#[allow(dead_code)]
pub const EXTERNAL_TOKEN: &str = "external-token";
#[allow(dead_code)]
pub const EXTERNAL_UID: &str = "external-uid-1";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn setup_test_app() -> TestApp {
    let provider = StaticIdentityProvider::new().with_user(
        EXTERNAL_TOKEN,
        EXTERNAL_UID,
        ExternalProfile {
            email: "grace@example.com".to_string(),
            display_name: "Grace Brewster Hopper".to_string(),
            picture: "https://example.com/grace.png".to_string(),
        },
    );
    let state = AppState::in_memory(
        Arc::new(provider),
        &JwtConfig::new(TEST_SECRET),
        CorsConfig::from_list("http://localhost:3000"),
        Duration::from_secs(5),
    );

    TestApp {
        router: init_router(state.clone()),
        state,
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Stores an account with [`TEST_PASSWORD`] directly through the service.
pub async fn create_test_user(app: &TestApp, role: Role) -> User {
    app.state
        .users
        .create(User {
            email: generate_unique_email(),
            password: Some(TEST_PASSWORD.to_string()),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
            ..User::default()
        })
        .await
        .unwrap()
}

pub fn token_for(app: &TestApp, user: &User) -> String {
    app.state
        .codec
        .issue(&user.id.to_string(), user.role)
        .unwrap()
}

pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    into_test_response(app.router.clone().oneshot(request).await.unwrap()).await
}

/// Sends a request with a raw `Authorization` header value.
#[allow(dead_code)]
pub async fn send_with_authorization(
    app: &TestApp,
    method: Method,
    uri: &str,
    authorization: &str,
) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap();

    into_test_response(app.router.clone().oneshot(request).await.unwrap()).await
}

async fn into_test_response(response: axum::response::Response) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}
