//! Authentication routes.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use stride_core::{Email, Role, UserId};

use crate::error::Result;
use crate::middleware::{BearerToken, RequireUser};
use crate::state::AppState;

/// Registration request body. Unknown fields (including any caller-supplied
/// role) are ignored.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
}

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    let user = state.auth().register(&req.email, &req.password).await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            id: user.id,
            email: user.email,
            role: user.role,
        }),
    ))
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: identity plus a fresh opaque session token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
    pub token: String,
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (user, session) = state.auth().login(&req.email, &req.password).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        id: user.id,
        email: user.email,
        role: user.role,
        token: session.token,
    }))
}

/// `GET /auth/me`
pub async fn me(RequireUser(user): RequireUser) -> Json<AccountResponse> {
    Json(AccountResponse {
        id: user.id,
        email: user.email,
        role: user.role,
    })
}

/// `POST /auth/logout`
///
/// Idempotent: logging out an already-dead token still returns `204`.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode> {
    state.auth().logout(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}
