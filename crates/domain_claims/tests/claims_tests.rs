//! Tests for the claim aggregate and its views

use core_kernel::{FoundItemId, UserId};

use domain_claims::{
    ClaimError, ClaimQuery, ClaimStatus, ClaimView, CreateClaimRequest, FoundItemClaim,
    FoundItemSummary,
};
use domain_items::FoundItemStatus;
use validator::Validate;

// ============================================================================
// Claim Status Tests
// ============================================================================

mod status_tests {
    use super::*;

    #[test]
    fn test_only_pending_moves() {
        assert!(ClaimStatus::Pending.can_transition_to(ClaimStatus::Approved));
        assert!(ClaimStatus::Pending.can_transition_to(ClaimStatus::Rejected));
        assert!(!ClaimStatus::Approved.can_transition_to(ClaimStatus::Rejected));
        assert!(!ClaimStatus::Rejected.can_transition_to(ClaimStatus::Approved));
    }

    #[test]
    fn test_serialized_as_lowercase() {
        let json = serde_json::to_string(&ClaimStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }
}

// ============================================================================
// Claim Aggregate Tests
// ============================================================================

mod claim_tests {
    use super::*;

    #[test]
    fn test_decide_updates_timestamp() {
        let mut claim = FoundItemClaim::new(FoundItemId::new(), UserId::new(), None, None);
        let created = claim.updated_at;

        claim.decide(ClaimStatus::Approved).unwrap();

        assert_eq!(claim.status, ClaimStatus::Approved);
        assert!(claim.updated_at >= created);
    }

    #[test]
    fn test_redeciding_reports_current_status() {
        let mut claim = FoundItemClaim::new(FoundItemId::new(), UserId::new(), None, None);
        claim.decide(ClaimStatus::Rejected).unwrap();

        let err = claim.decide(ClaimStatus::Approved).unwrap_err();
        assert!(matches!(
            err,
            ClaimError::InvalidState {
                status: ClaimStatus::Rejected
            }
        ));
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    fn test_view_flattens_claim_fields() {
        let claim = FoundItemClaim::new(
            FoundItemId::new(),
            UserId::new(),
            Some("Engraved initials".to_string()),
            None,
        );
        let view = ClaimView {
            found_item: FoundItemSummary {
                id: claim.found_item_id,
                title: "Silver ring".to_string(),
                owner_id: UserId::new(),
                status: FoundItemStatus::Available,
            },
            claim,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["message"], "Engraved initials");
        assert_eq!(json["found_item"]["title"], "Silver ring");
    }
}

// ============================================================================
// Request and Query Tests
// ============================================================================

mod request_tests {
    use super::*;

    #[test]
    fn test_empty_request_is_valid() {
        assert!(CreateClaimRequest::default().validate().is_ok());
    }

    #[test]
    fn test_contact_limit() {
        let request = CreateClaimRequest {
            message: None,
            contact_info: Some("c".repeat(201)),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_query_constructors() {
        let user = UserId::new();
        let made = ClaimQuery::made_by(user).with_status(Some(ClaimStatus::Pending));
        assert_eq!(made.claimer_id, Some(user));
        assert_eq!(made.status, Some(ClaimStatus::Pending));
        assert!(made.owner_id.is_none());

        let received = ClaimQuery::received_by(user);
        assert_eq!(received.owner_id, Some(user));
        assert!(received.claimer_id.is_none());
    }
}
