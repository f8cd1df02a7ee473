//! Request and response data transfer objects
//!
//! Domain types serialize directly; this module only holds what the HTTP
//! surface adds: the success envelope, query strings and small bodies.

pub mod items;
pub mod claims;
pub mod admin;

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use core_kernel::PageRequest;

use crate::error::ApiError;

/// Success envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }

    pub fn created(data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Self::ok(data))
    }
}

/// `limit` / `offset` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PageParams {
    pub fn page(&self) -> Result<PageRequest, ApiError> {
        Ok(PageRequest::from_query(self.limit, self.offset)?)
    }
}
