//! Router-level tests against in-memory repositories.
//!
//! Exercises the full HTTP surface with `tower::ServiceExt::oneshot`,
//! without binding a socket or touching Postgres.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use stride_core::{Email, Role};
use stride_server::routes;
use stride_server::services::auth::hash_password;
use stride_server::state::AppState;

const ADMIN_EMAIL: &str = "admin@stride.test";
const ADMIN_PASSWORD: &str = "admin-pass-1";

struct TestApp {
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        Self {
            router: routes::router().with_state(AppState::in_memory()),
        }
    }

    /// App with one admin account pre-seeded.
    async fn with_admin() -> Self {
        let state = AppState::in_memory();
        let email = Email::parse(ADMIN_EMAIL).unwrap();
        let hash = hash_password(ADMIN_PASSWORD).unwrap();
        state
            .users()
            .create(&email, &hash, Role::Admin)
            .await
            .unwrap();

        Self {
            router: routes::router().with_state(state),
        }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_owned()
    }

    async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }
}

#[tokio::test]
async fn test_register_login_me_logout_flow() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "shopper@stride.test", "password": "hunter22!" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "shopper@stride.test");
    assert_eq!(body["role"], "user");

    let token = app.login("shopper@stride.test", "hunter22!").await;

    let (status, body) = app
        .request(Method::GET, "/auth/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "shopper@stride.test");

    let (status, _) = app
        .request(Method::POST, "/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // the token is dead after logout
    let (status, _) = app
        .request(Method::GET, "/auth/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let app = TestApp::new();
    let body = json!({ "email": "shopper@stride.test", "password": "hunter22!" });

    let (status, _) = app
        .request(Method::POST, "/auth/register", None, Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request(Method::POST, "/auth/register", None, Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_register_never_honors_caller_supplied_role() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "email": "sneaky@stride.test",
                "password": "hunter22!",
                "role": "admin"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn test_login_distinguishes_unknown_email_from_wrong_password() {
    let app = TestApp::new();
    app.request(
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "shopper@stride.test", "password": "hunter22!" })),
    )
    .await;

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "nobody@stride.test", "password": "hunter22!" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "shopper@stride.test", "password": "wrong-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_rejects_missing_and_garbage_tokens() {
    let app = TestApp::new();

    let (status, _) = app.request(Method::GET, "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::GET, "/auth/me", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_product_list_is_public() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_product_writes_require_admin() {
    let app = TestApp::new();
    let product = json!({ "name": "Runner", "price": "140.00", "image": "/runner.png" });

    // no token
    let (status, _) = app
        .request(Method::POST, "/products", None, Some(product.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // regular user token
    app.request(
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "shopper@stride.test", "password": "hunter22!" })),
    )
    .await;
    let token = app.login("shopper@stride.test", "hunter22!").await;

    let (status, _) = app
        .request(Method::POST, "/products", Some(&token), Some(product))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_product_crud_as_admin() {
    let app = TestApp::with_admin().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/products",
            Some(&token),
            Some(json!({ "name": "Runner", "price": "140.00", "image": "/runner.png" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Runner");
    assert_eq!(body["data"]["price"], "140.00");
    let id = body["data"]["id"].clone();

    let (status, body) = app
        .request(
            Method::PATCH,
            "/products",
            Some(&token),
            Some(json!({ "id": id, "name": "Trail", "price": "200.00", "image": "/trail.png" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Trail");
    assert_eq!(body["data"]["price"], "200.00");

    let (status, body) = app.request(Method::GET, "/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .request(
            Method::DELETE,
            "/products",
            Some(&token),
            Some(json!({ "id": id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.request(Method::GET, "/products", None, None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_product_create_rejects_bad_input() {
    let app = TestApp::with_admin().await;
    let token = app.admin_token().await;

    // missing name
    let (status, body) = app
        .request(
            Method::POST,
            "/products",
            Some(&token),
            Some(json!({ "price": "140.00", "image": "/x.png" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // non-positive price
    let (status, _) = app
        .request(
            Method::POST,
            "/products",
            Some(&token),
            Some(json!({ "name": "Runner", "price": "0", "image": "/x.png" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_update_and_delete_missing_id() {
    let app = TestApp::with_admin().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .request(
            Method::PATCH,
            "/products",
            Some(&token),
            Some(json!({ "id": 99, "name": "Trail", "price": "200.00", "image": "/t.png" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            Method::DELETE,
            "/products",
            Some(&token),
            Some(json!({ "id": 99 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_management_requires_admin() {
    let app = TestApp::with_admin().await;

    app.request(
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "shopper@stride.test", "password": "hunter22!" })),
    )
    .await;
    let token = app.login("shopper@stride.test", "hunter22!").await;

    let (status, _) = app.request(Method::GET, "/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request(Method::GET, "/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_promotes_user() {
    let app = TestApp::with_admin().await;
    let admin_token = app.admin_token().await;

    let (_, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "shopper@stride.test", "password": "hunter22!" })),
        )
        .await;
    let user_id = body["id"].clone();

    let (status, body) = app
        .request(
            Method::PATCH,
            "/users",
            Some(&admin_token),
            Some(json!({ "user_id": user_id, "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "admin");

    // the promoted user can now manage the catalog
    let token = app.login("shopper@stride.test", "hunter22!").await;
    let (status, _) = app
        .request(
            Method::POST,
            "/products",
            Some(&token),
            Some(json!({ "name": "Runner", "price": "140.00", "image": "/r.png" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_admin_list_users() {
    let app = TestApp::with_admin().await;
    let token = app.admin_token().await;

    app.request(
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "shopper@stride.test", "password": "hunter22!" })),
    )
    .await;

    let (status, body) = app.request(Method::GET, "/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    // password hashes never leave the server
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[tokio::test]
async fn test_update_role_missing_target() {
    let app = TestApp::with_admin().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .request(
            Method::PATCH,
            "/users",
            Some(&token),
            Some(json!({ "user_id": 99, "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            Method::PATCH,
            "/users",
            Some(&token),
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
