//! HTTP routes.

pub mod auth;
pub mod products;
pub mod users;

use axum::Router;
use axum::routing::get;
use serde::Serialize;

use crate::state::AppState;

/// Success envelope returned by catalog and user-management routes.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T> {
    fn ok(data: T, message: impl Into<String>) -> axum::Json<Self> {
        axum::Json(Self {
            success: true,
            data,
            message: message.into(),
        })
    }
}

/// Build the API router. State is applied by the caller.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", axum::routing::post(auth::register))
        .route("/auth/login", axum::routing::post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", axum::routing::post(auth::logout))
        .route(
            "/products",
            get(products::list)
                .post(products::create)
                .patch(products::update)
                .delete(products::delete),
        )
        .route("/users", get(users::list).patch(users::update_role))
}
