//! Router tests exercising authentication, authorization and validation
//! paths in-process. The pool is created lazily and never connected: every
//! request here is rejected before a database call is made.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use biblion_server::{
    config::AppConfig,
    create_router,
    models::user::{Role, UserClaims},
    repository::Repository,
    services::Services,
    AppState,
};

const SECRET: &str = "router-test-secret";

fn test_state() -> AppState {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = SECRET.to_string();

    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");

    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());

    AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    }
}

fn token_for(role: Role) -> String {
    let now = chrono::Utc::now().timestamp();
    UserClaims {
        sub: "test@example.org".to_string(),
        user_id: 1,
        role,
        exp: now + 3600,
        iat: now,
    }
    .create_token(SECRET)
    .expect("token")
}

fn expired_token(role: Role) -> String {
    let now = chrono::Utc::now().timestamp();
    UserClaims {
        sub: "test@example.org".to_string(),
        user_id: 1,
        role,
        exp: now - 3600,
        iat: now - 7200,
    }
    .create_token(SECRET)
    .expect("token")
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = create_router(test_state())
        .oneshot(request)
        .await
        .expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(body) = body {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        return builder.body(Body::from(body.to_string())).expect("request");
    }
    builder.body(Body::empty()).expect("request")
}

#[tokio::test]
async fn health_check_responds() {
    let (status, body) = send(request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    for (method, uri, body) in [
        ("GET", "/borrow", None),
        ("POST", "/borrow", Some(r#"{"bookId":1,"quantity":1}"#)),
        ("POST", "/books", Some(r#"{"title":"T","author":"A","genre":"G","stock":1}"#)),
        ("GET", "/users/all", None),
        ("GET", "/users/profile", None),
    ] {
        let (status, _) = send(request(method, uri, None, body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let (status, _) = send(request("GET", "/borrow", Some("not-a-jwt"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let token = expired_token(Role::Regular);
    let (status, _) = send(request("GET", "/users/profile", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    // A denial from the policy, not the extractor, proves the cookie carried
    // the identity.
    let token = token_for(Role::Regular);
    let req = Request::builder()
        .method("GET")
        .uri("/users/all")
        .header(header::COOKIE, format!("session={token}"))
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn administrators_cannot_borrow_or_return() {
    let token = token_for(Role::Administrator);

    let (status, body) = send(request(
        "POST",
        "/borrow",
        Some(&token),
        Some(r#"{"bookId":1,"quantity":2}"#),
    ))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "NotAuthorized");

    let (status, _) = send(request(
        "PUT",
        "/borrow/return/1",
        Some(&token),
        Some(r#"{"quantity":1}"#),
    ))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn regular_users_cannot_manage_catalog_or_accounts() {
    let token = token_for(Role::Regular);

    for (method, uri, body) in [
        ("POST", "/books", Some(r#"{"title":"T","author":"A","genre":"G","stock":1}"#)),
        ("PUT", "/books/1", Some(r#"{"stock":3}"#)),
        ("DELETE", "/books/1", None),
        ("POST", "/users/create", Some(r#"{"name":"N","email":"n@example.org","password":"secret"}"#)),
        ("GET", "/users/all", None),
        ("PUT", "/users/profile/1", Some(r#"{"name":"N"}"#)),
        ("DELETE", "/users/profile/1", None),
        ("GET", "/borrow", None),
    ] {
        let (status, _) = send(request(method, uri, Some(&token), body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
    }
}

#[tokio::test]
async fn non_positive_quantities_are_rejected() {
    let token = token_for(Role::Regular);

    for quantity in [0, -3] {
        let body = format!(r#"{{"bookId":1,"quantity":{quantity}}}"#);
        let (status, response) =
            send(request("POST", "/borrow", Some(&token), Some(&body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "BadValue");

        let body = format!(r#"{{"quantity":{quantity}}}"#);
        let (status, _) =
            send(request("PUT", "/borrow/return/1", Some(&token), Some(&body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn malformed_ids_are_rejected() {
    let token = token_for(Role::Regular);
    let (status, _) = send(request("GET", "/borrow/not-an-id", Some(&token), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_book_payload_is_rejected() {
    let token = token_for(Role::Administrator);
    let (status, _) = send(request(
        "POST",
        "/books",
        Some(&token),
        Some(r#"{"title":"","author":"A","genre":"G","stock":-1}"#),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let response = create_router(test_state())
        .oneshot(request("POST", "/users/logout", None, None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("set-cookie header");
    assert!(set_cookie.starts_with("session="));
}
