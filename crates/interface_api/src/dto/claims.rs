//! Claims DTOs

use serde::Deserialize;

use domain_claims::ClaimStatus;

/// Body of `PUT /claims/:id/status`
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ClaimStatus,
}

/// Optional status filter on claim listings
#[derive(Debug, Default, Deserialize)]
pub struct ClaimListQuery {
    pub status: Option<ClaimStatus>,
}
