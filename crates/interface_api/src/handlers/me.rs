//! Profile handlers

use axum::{extract::State, Json};

use domain_admin::{ProfileUpdate, UserProfile};

use crate::auth::AuthUser;
use crate::dto::ApiResponse;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::AppState;

/// Returns the caller's profile, creating it on first call
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.profiles.me(user.id, &user.email).await?;
    Ok(ApiResponse::ok(profile))
}

/// Updates the caller's display name
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.profiles.update_me(user.id, update).await?;
    Ok(ApiResponse::ok(profile))
}
