//! Claims handlers

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use core_kernel::{ClaimId, FoundItemId, Page};
use domain_claims::{ClaimView, CreateClaimRequest, FoundItemClaim};

use crate::auth::AuthUser;
use crate::dto::claims::{ClaimListQuery, UpdateStatusRequest};
use crate::dto::{ApiResponse, PageParams};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::AppState;

/// Files a claim on a found item
pub async fn create_claim(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(item_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<CreateClaimRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FoundItemClaim>>), ApiError> {
    let claim = state
        .claims
        .create_claim(user.id, FoundItemId::from_uuid(item_id), request)
        .await?;
    Ok(ApiResponse::created(claim))
}

/// Lists claims on one found item (reporter only)
pub async fn list_for_item(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(item_id): ApiPath<Uuid>,
    ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Json<ApiResponse<Page<ClaimView>>>, ApiError> {
    let claims = state
        .claims
        .claims_for_item(FoundItemId::from_uuid(item_id), user.id, page.page()?)
        .await?;
    Ok(ApiResponse::ok(claims))
}

/// Claims the caller filed
pub async fn claims_made(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<ClaimListQuery>,
    ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Json<ApiResponse<Page<ClaimView>>>, ApiError> {
    let claims = state
        .claims
        .claims_made(user.id, query.status, page.page()?)
        .await?;
    Ok(ApiResponse::ok(claims))
}

/// Claims on items the caller reported
pub async fn claims_received(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<ClaimListQuery>,
    ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Json<ApiResponse<Page<ClaimView>>>, ApiError> {
    let claims = state
        .claims
        .claims_received(user.id, query.status, page.page()?)
        .await?;
    Ok(ApiResponse::ok(claims))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<ClaimView>>, ApiError> {
    let claim = state.claims.get_claim(ClaimId::from_uuid(id), user.id).await?;
    Ok(ApiResponse::ok(claim))
}

/// Approves or rejects a claim
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<FoundItemClaim>>, ApiError> {
    let claim = state
        .claims
        .update_status(ClaimId::from_uuid(id), user.id, request.status)
        .await?;
    Ok(ApiResponse::ok(claim))
}

/// Withdraws a pending claim
pub async fn delete_claim(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.claims.delete_claim(ClaimId::from_uuid(id), user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
