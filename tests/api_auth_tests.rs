// SPDX-License-Identifier: MIT

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without a session cookie
//! 2. Invalid and foreign-signed tokens are rejected
//! 3. Public routes and CORS preflight behave as expected
//!
//! None of these paths reach the database, so they run offline.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use jamvote::middleware::auth::create_session_jwt;
use tower::ServiceExt;

mod common;

const PROTECTED_ROUTES: &[(&str, &str)] = &[
    ("GET", "/user/me"),
    ("GET", "/votes/current"),
    ("POST", "/votes"),
    ("DELETE", "/votes/reset/1"),
];

#[tokio::test]
async fn test_protected_routes_without_cookie() {
    for (method, uri) in PROTECTED_ROUTES {
        let (app, _) = common::create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method(*method)
                    .uri(*uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should 401 without a cookie",
            method,
            uri
        );
    }
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/user/me")
                .header(header::COOKIE, "token=not.a.valid.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_foreign_signature() {
    let (app, _) = common::create_test_app();

    // Structurally valid JWT signed with a key the server does not use
    let token = create_session_jwt("12345", b"some_other_signing_key_entirely").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/votes/current")
                .header(header::COOKIE, format!("token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ping_is_public() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"pong");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("logout should set a removal cookie")
        .to_str()
        .unwrap();

    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("Path=/"));
    // Removal cookie expires in the past
    assert!(set_cookie.contains("Max-Age=0") || set_cookie.contains("Expires="));
}

#[tokio::test]
async fn test_login_redirects_to_discord() {
    let (app, config) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/discord/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();

    assert!(location.starts_with("https://discord.com/oauth2/authorize?"));
    assert!(location.contains(&format!("client_id={}", config.discord_client_id)));
    assert!(location.contains("scope=identify"));
    assert!(location.contains("state="));
}

#[tokio::test]
async fn test_callback_without_code_is_bad_request() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/discord/callback")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_with_provider_error_redirects_to_frontend() {
    let (app, config) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/discord/callback?error=access_denied")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();

    assert!(location.starts_with(&config.frontend_url));
    assert!(location.contains("error=access_denied"));
}

#[tokio::test]
async fn test_cors_preflight_allows_frontend_origin() {
    let (app, config) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/votes")
                .header(header::ORIGIN, config.frontend_url.clone())
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some(config.frontend_url.as_str())
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn test_security_headers_on_responses() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
}
