//! Claim request payloads and query filters

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{FoundItemId, UserId};

use crate::claim::ClaimStatus;

/// Payload for claiming a found item
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateClaimRequest {
    #[validate(length(max = 1000))]
    pub message: Option<String>,
    #[validate(length(max = 200))]
    pub contact_info: Option<String>,
}

/// Filter for claim listings
///
/// `owner_id` matches the owner of the claimed item, which is how the
/// "claims received" view is expressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimQuery {
    pub claimer_id: Option<UserId>,
    pub owner_id: Option<UserId>,
    pub found_item_id: Option<FoundItemId>,
    pub status: Option<ClaimStatus>,
}

impl ClaimQuery {
    /// Claims filed by `claimer_id`
    pub fn made_by(claimer_id: UserId) -> Self {
        Self {
            claimer_id: Some(claimer_id),
            ..Default::default()
        }
    }

    /// Claims against items reported by `owner_id`
    pub fn received_by(owner_id: UserId) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Default::default()
        }
    }

    /// Claims against one item
    pub fn for_item(found_item_id: FoundItemId) -> Self {
        Self {
            found_item_id: Some(found_item_id),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: Option<ClaimStatus>) -> Self {
        self.status = status;
        self
    }
}
