//! Admin handlers
//!
//! Role checks happen in `AdminService` against the stored profile, so
//! these handlers only translate HTTP.

use axum::{extract::State, Json};
use uuid::Uuid;

use core_kernel::{Page, UserId};
use domain_admin::{AuditLogEntry, RemovedReport, UserProfile};
use domain_claims::ClaimView;
use domain_items::ItemKind;

use crate::auth::AuthUser;
use crate::dto::admin::{AuditLogQuery, SetRoleRequest, SetVerificationRequest, UserListQuery};
use crate::dto::claims::ClaimListQuery;
use crate::dto::{ApiResponse, PageParams};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<UserListQuery>,
    ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Json<ApiResponse<Page<UserProfile>>>, ApiError> {
    let users = state
        .admin
        .list_users(user.id, query.into(), page.page()?)
        .await?;
    Ok(ApiResponse::ok(users))
}

pub async fn set_role(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(target): ApiPath<Uuid>,
    ApiJson(request): ApiJson<SetRoleRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state
        .admin
        .set_role(user.id, UserId::from_uuid(target), request.role)
        .await?;
    Ok(ApiResponse::ok(profile))
}

pub async fn set_verification(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(target): ApiPath<Uuid>,
    ApiJson(request): ApiJson<SetVerificationRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state
        .admin
        .set_verified(user.id, UserId::from_uuid(target), request.verified)
        .await?;
    Ok(ApiResponse::ok(profile))
}

pub async fn list_claims(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<ClaimListQuery>,
    ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Json<ApiResponse<Page<ClaimView>>>, ApiError> {
    let claims = state
        .admin
        .list_claims(user.id, query.status, page.page()?)
        .await?;
    Ok(ApiResponse::ok(claims))
}

/// Removes a report; `kind` is `found`, `lost` or `share`
pub async fn remove_report(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath((kind, id)): ApiPath<(String, Uuid)>,
) -> Result<Json<ApiResponse<RemovedReport>>, ApiError> {
    let kind: ItemKind = kind.parse()?;
    let removed = state.admin.remove_report(user.id, kind, id).await?;
    Ok(ApiResponse::ok(removed))
}

pub async fn list_audit_logs(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<AuditLogQuery>,
    ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Json<ApiResponse<Page<AuditLogEntry>>>, ApiError> {
    let entries = state
        .admin
        .list_audit_logs(user.id, query.into(), page.page()?)
        .await?;
    Ok(ApiResponse::ok(entries))
}
