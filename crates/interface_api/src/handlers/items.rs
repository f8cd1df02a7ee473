//! Item report handlers
//!
//! Found, lost and share items share one set of generic handlers; the
//! [`ItemResource`] impls pick the service and id type per kind.

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use core_kernel::{FoundItemId, LostItemId, Page, ShareItemId};
use domain_items::{FoundItem, ItemRecord, ItemService, LostItem, ShareItem};

use crate::auth::AuthUser;
use crate::dto::items::ItemListQuery;
use crate::dto::{ApiResponse, PageParams};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::AppState;

/// An item kind exposed over HTTP
pub trait ItemResource: ItemRecord {
    fn service(state: &AppState) -> &ItemService<Self>;

    fn id_from(id: Uuid) -> Self::Id;
}

impl ItemResource for FoundItem {
    fn service(state: &AppState) -> &ItemService<Self> {
        &state.found_items
    }

    fn id_from(id: Uuid) -> FoundItemId {
        FoundItemId::from_uuid(id)
    }
}

impl ItemResource for LostItem {
    fn service(state: &AppState) -> &ItemService<Self> {
        &state.lost_items
    }

    fn id_from(id: Uuid) -> LostItemId {
        LostItemId::from_uuid(id)
    }
}

impl ItemResource for ShareItem {
    fn service(state: &AppState) -> &ItemService<Self> {
        &state.share_items
    }

    fn id_from(id: Uuid) -> ShareItemId {
        ShareItemId::from_uuid(id)
    }
}

/// Files a report owned by the caller
pub async fn create<T: ItemResource>(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(new): ApiJson<T::New>,
) -> Result<(StatusCode, Json<ApiResponse<T>>), ApiError> {
    let item = T::service(&state).report(user.id, new).await?;
    Ok(ApiResponse::created(item))
}

/// Lists reports
pub async fn list<T: ItemResource>(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ItemListQuery>,
    ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Json<ApiResponse<Page<T>>>, ApiError> {
    let items = T::service(&state)
        .list(query.into_filter::<T>()?, page.page()?)
        .await?;
    Ok(ApiResponse::ok(items))
}

/// Gets a report by ID
pub async fn get<T: ItemResource>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<T>>, ApiError> {
    let item = T::service(&state).get(T::id_from(id)).await?;
    Ok(ApiResponse::ok(item))
}

/// Updates a report (reporter only)
pub async fn update<T: ItemResource>(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<T::Update>,
) -> Result<Json<ApiResponse<T>>, ApiError> {
    let item = T::service(&state)
        .update(user.id, T::id_from(id), update)
        .await?;
    Ok(ApiResponse::ok(item))
}

/// Deletes a report (reporter only)
pub async fn delete<T: ItemResource>(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    T::service(&state).delete(user.id, T::id_from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
