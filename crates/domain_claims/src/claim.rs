//! Claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, CoreError, FoundItemId, UserId};
use domain_items::{FoundItem, FoundItemStatus};

use crate::error::ClaimError;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    /// Waiting for the item owner's decision
    Pending,
    /// Accepted by the item owner
    Approved,
    /// Declined by the item owner, or superseded by another approval
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ClaimStatus::Pending)
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!((*self, target), (Pending, Approved) | (Pending, Rejected))
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ClaimStatus::Pending),
            "approved" => Ok(ClaimStatus::Approved),
            "rejected" => Ok(ClaimStatus::Rejected),
            other => Err(CoreError::validation(format!("unknown claim status '{}'", other))),
        }
    }
}

/// A claim against a found item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundItemClaim {
    /// Unique identifier
    pub id: ClaimId,
    /// The claimed item
    pub found_item_id: FoundItemId,
    /// The user asserting ownership
    pub claimer_id: UserId,
    /// Status
    pub status: ClaimStatus,
    /// Note to the item owner (identifying marks, where it was lost)
    pub message: Option<String>,
    /// How the owner can reach the claimant
    pub contact_info: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl FoundItemClaim {
    /// Creates a new pending claim
    pub fn new(
        found_item_id: FoundItemId,
        claimer_id: UserId,
        message: Option<String>,
        contact_info: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ClaimId::new_v7(),
            found_item_id,
            claimer_id,
            status: ClaimStatus::Pending,
            message,
            contact_info,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Records the owner's decision
    ///
    /// # Errors
    ///
    /// - `ClaimError::Validation` if `target` is `Pending`
    /// - `ClaimError::InvalidState` if the claim was already decided
    pub fn decide(&mut self, target: ClaimStatus) -> Result<(), ClaimError> {
        if target == ClaimStatus::Pending {
            return Err(ClaimError::Validation(
                "status must be approved or rejected".to_string(),
            ));
        }
        if !self.status.can_transition_to(target) {
            return Err(ClaimError::InvalidState {
                status: self.status,
            });
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// The parts of a found item shown alongside a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundItemSummary {
    pub id: FoundItemId,
    pub title: String,
    pub owner_id: UserId,
    pub status: FoundItemStatus,
}

impl From<&FoundItem> for FoundItemSummary {
    fn from(item: &FoundItem) -> Self {
        Self {
            id: item.id,
            title: item.details.title.clone(),
            owner_id: item.owner_id,
            status: item.status,
        }
    }
}

/// A claim joined with the item it targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimView {
    #[serde(flatten)]
    pub claim: FoundItemClaim,
    pub found_item: FoundItemSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claim_is_pending() {
        let claim = FoundItemClaim::new(FoundItemId::new(), UserId::new(), None, None);
        assert!(claim.is_pending());
        assert_eq!(claim.created_at, claim.updated_at);
    }

    #[test]
    fn test_decide_cannot_target_pending() {
        let mut claim = FoundItemClaim::new(FoundItemId::new(), UserId::new(), None, None);
        assert!(matches!(
            claim.decide(ClaimStatus::Pending),
            Err(ClaimError::Validation(_))
        ));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("approved".parse::<ClaimStatus>().unwrap(), ClaimStatus::Approved);
        assert!("cancelled".parse::<ClaimStatus>().is_err());
    }
}
