//! User management routes. Admin only.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use stride_core::{Role, UserId};

use crate::db::RepositoryError;
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::state::AppState;

use super::ApiResponse;

/// `GET /users`
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<User>>>> {
    let users = state.users().list().await?;
    Ok(ApiResponse::ok(users, "Users fetched successfully"))
}

/// Role change request body.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub user_id: Option<UserId>,
    pub role: Option<Role>,
}

/// `PATCH /users`
pub async fn update_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<User>>> {
    let user_id = req
        .user_id
        .ok_or_else(|| ApiError::Validation("user_id is required".to_owned()))?;
    let role = req
        .role
        .ok_or_else(|| ApiError::Validation("role is required".to_owned()))?;

    let user = state
        .users()
        .set_role(user_id, role)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("User".to_owned()),
            other => ApiError::Database(other),
        })?;

    tracing::info!(user_id = %user.id, admin_id = %admin.id, role = ?user.role, "role updated");

    Ok(ApiResponse::ok(user, "User role updated successfully"))
}
