mod common;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use common::{
    EXTERNAL_TOKEN, EXTERNAL_UID, TEST_PASSWORD, create_test_user, send, send_with_authorization,
    setup_test_app, token_for,
};
use serde_json::json;
use social_auth::TOKEN_TTL_SECS;
use social_models::Role;

#[tokio::test]
async fn test_login_success() {
    let app = setup_test_app();
    let user = create_test_user(&app, Role::Client).await;

    let response = send(
        &app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({ "email": user.email, "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["id"], user.id.to_string().as_str());
    assert!(response.body["user"].get("password").is_none());

    let token = response.body["token"].as_str().unwrap();
    let (subject, role) = app.state.codec.verify(token).unwrap();
    assert_eq!(subject, user.id.to_string());
    assert_eq!(role, Role::Client);
}

#[tokio::test]
async fn test_login_token_opens_protected_routes() {
    let app = setup_test_app();
    let user = create_test_user(&app, Role::Client).await;

    let login = send(
        &app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({ "email": user.email, "password": TEST_PASSWORD })),
    )
    .await;
    let token = login.body["token"].as_str().unwrap();

    let response = send(
        &app,
        Method::GET,
        &format!("/api/v1/users/{}", user.id),
        Some(token),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = setup_test_app();
    let user = create_test_user(&app, Role::Client).await;

    let response = send(
        &app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({ "email": user.email, "password": "wrong-password" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Bad email or password");
    assert!(response.body.get("token").is_none());
}

#[tokio::test]
async fn test_login_malformed_email() {
    let app = setup_test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({ "email": "nobody", "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Bad email or password");
}

#[tokio::test]
async fn test_login_empty_password() {
    let app = setup_test_app();
    let user = create_test_user(&app, Role::Client).await;

    let response = send(
        &app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({ "email": user.email, "password": "" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Bad email or password");
}

#[tokio::test]
async fn test_login_empty_email() {
    let app = setup_test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({ "email": "", "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Bad email or password");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = setup_test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({ "email": "ghost@example.com", "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_authorization_header() {
    let app = setup_test_app();

    let response = send(&app, Method::GET, "/api/v1/posts", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "not authorized");
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = setup_test_app();
    let user = create_test_user(&app, Role::Client).await;
    let token = token_for(&app, &user);

    for header in [
        token.clone(),
        format!("Basic {}", token),
        format!("Bearer {} extra", token),
        "Bearer".to_string(),
    ] {
        let response = send_with_authorization(&app, Method::GET, "/api/v1/posts", &header).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "header: {header}");
        assert_eq!(response.body["message"], "invalid authorization format");
    }
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = setup_test_app();
    let user = create_test_user(&app, Role::Client).await;
    let issued = Utc::now().timestamp() - TOKEN_TTL_SECS - 10;
    let token = app
        .state
        .codec
        .issue_at(&user.id.to_string(), Role::Client, issued)
        .unwrap();

    let response = send(&app, Method::GET, "/api/v1/posts", Some(&token), None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "token is expired");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let app = setup_test_app();

    let response = send(&app, Method::GET, "/api/v1/posts", Some("not.a.jwt"), None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "invalid token");
}

#[tokio::test]
async fn test_external_login_creates_client_once() {
    let app = setup_test_app();

    let first = send(
        &app,
        Method::POST,
        "/api/v1/auth/external",
        Some(EXTERNAL_TOKEN),
        None,
    )
    .await;
    assert_eq!(first.status, StatusCode::OK);
    let user = &first.body["user"];
    assert_eq!(user["uid"], EXTERNAL_UID);
    assert_eq!(user["email"], "grace@example.com");
    assert_eq!(user["first_name"], "Grace");
    assert_eq!(user["last_name"], "Brewster Hopper");
    assert_eq!(user["role"], 0);
    assert!(first.body["token"].is_string());

    let second = send(
        &app,
        Method::POST,
        "/api/v1/auth/external",
        Some(EXTERNAL_TOKEN),
        None,
    )
    .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["user"]["id"], user["id"]);
}

#[tokio::test]
async fn test_external_login_rejects_unknown_token() {
    let app = setup_test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/auth/external",
        Some("forged"),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = send(&app, Method::POST, "/api/v1/auth/external", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "not authorized");
}
