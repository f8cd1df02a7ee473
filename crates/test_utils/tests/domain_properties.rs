//! Cross-domain properties over the in-memory backend
//!
//! Each case drives the services through a fresh [`InMemoryBackend`], so
//! ownership, status and role rules are checked the way the HTTP layer
//! reaches them.

use proptest::prelude::*;
use tokio::runtime::Runtime;

use core_kernel::{ErrorKind, FoundItemId, PageRequest, UserId};
use domain_admin::{AdminError, Role};
use domain_claims::{ClaimError, ClaimStatus, FoundItemClaim};
use domain_items::{
    FoundItemStatus, FoundItemUpdate, ItemError, ItemFilter, LostItemUpdate, ShareItemUpdate,
};
use test_utils::{
    assert_claim_status, assert_error_kind, assert_page, claim_status_strategy,
    found_status_strategy, item_details_strategy, lost_status_strategy, role_strategy,
    share_status_strategy, ClaimFixtures, ClaimRequestBuilder, InMemoryBackend,
    ItemReportBuilder, ProfileBuilder,
};

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// ============================================================================
// Claim Status Properties
// ============================================================================

mod claim_status {
    use super::*;

    proptest! {
        #[test]
        fn test_display_parse_roundtrip(status in claim_status_strategy()) {
            let parsed: ClaimStatus = status.to_string().parse().unwrap();
            prop_assert_eq!(parsed, status);
        }

        #[test]
        fn test_decisions_are_terminal(
            first in claim_status_strategy(),
            second in claim_status_strategy(),
        ) {
            let mut claim = FoundItemClaim::new(FoundItemId::new(), UserId::new(), None, None);
            if claim.decide(first).is_ok() {
                prop_assert!(!claim.is_pending());
                let before = claim.status;
                prop_assert!(claim.decide(second).is_err());
                prop_assert_eq!(claim.status, before);
            } else {
                prop_assert!(claim.is_pending());
            }
        }
    }
}

// ============================================================================
// Item Status Properties
// ============================================================================

mod item_status {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_found_updates_follow_lifecycle(
            from in found_status_strategy(),
            to in found_status_strategy(),
        ) {
            let (result, stored) = runtime().block_on(async {
                let backend = InMemoryBackend::new();
                let owner = UserId::new();
                let item = backend
                    .found_service()
                    .report(owner, ItemReportBuilder::new().found())
                    .await
                    .unwrap();
                backend.found.modify(item.id, |i| i.status = from).await.unwrap();

                let update = FoundItemUpdate { status: Some(to), ..Default::default() };
                let result = backend.found_service().update(owner, item.id, update).await;
                (result, backend.found.snapshot(item.id).await.unwrap().status)
            });

            if from.can_transition_to(to) {
                prop_assert_eq!(result.unwrap().status, to);
                prop_assert_eq!(stored, to);
            } else {
                assert_error_kind(&result, ErrorKind::Conflict, ItemError::kind);
                prop_assert_eq!(stored, from);
            }
        }

        #[test]
        fn test_lost_updates_follow_lifecycle(
            from in lost_status_strategy(),
            to in lost_status_strategy(),
        ) {
            let result = runtime().block_on(async {
                let backend = InMemoryBackend::new();
                let owner = UserId::new();
                let item = backend
                    .lost_service()
                    .report(owner, ItemReportBuilder::new().lost())
                    .await
                    .unwrap();
                backend.lost.modify(item.id, |i| i.status = from).await.unwrap();

                let update = LostItemUpdate { status: Some(to), ..Default::default() };
                backend.lost_service().update(owner, item.id, update).await
            });

            if from.can_transition_to(to) {
                prop_assert_eq!(result.unwrap().status, to);
            } else {
                assert_error_kind(&result, ErrorKind::Conflict, ItemError::kind);
            }
        }

        #[test]
        fn test_share_updates_follow_lifecycle(
            from in share_status_strategy(),
            to in share_status_strategy(),
        ) {
            let result = runtime().block_on(async {
                let backend = InMemoryBackend::new();
                let owner = UserId::new();
                let item = backend
                    .share_service()
                    .report(owner, ItemReportBuilder::new().with_condition("good").share())
                    .await
                    .unwrap();
                backend.share.modify(item.id, |i| i.status = from).await.unwrap();

                let update = ShareItemUpdate { status: Some(to), ..Default::default() };
                backend.share_service().update(owner, item.id, update).await
            });

            if from.can_transition_to(to) {
                prop_assert_eq!(result.unwrap().status, to);
            } else {
                assert_error_kind(&result, ErrorKind::Conflict, ItemError::kind);
            }
        }

        #[test]
        fn test_generated_reports_are_accepted(details in item_details_strategy()) {
            let title = details.title.clone();
            let stored = runtime().block_on(async {
                InMemoryBackend::new()
                    .found_service()
                    .report(UserId::new(), ItemReportBuilder::new().with_details(details).found())
                    .await
            });
            let stored = stored.unwrap();
            prop_assert_eq!(stored.details.title, title);
            prop_assert_eq!(stored.status, FoundItemStatus::Available);
        }
    }

    #[test]
    fn test_report_kinds_use_separate_stores() {
        runtime().block_on(async {
            let backend = InMemoryBackend::new();
            let owner = UserId::new();
            backend
                .lost_service()
                .report(owner, ItemReportBuilder::new().lost())
                .await
                .unwrap();

            let lost = backend
                .lost_service()
                .list(ItemFilter::by_owner(owner), PageRequest::default())
                .await
                .unwrap();
            let shared = backend
                .share_service()
                .list(ItemFilter::by_owner(owner), PageRequest::default())
                .await
                .unwrap();
            assert_page(&lost, 1, 1);
            assert_page(&shared, 0, 0);
        });
    }
}

// ============================================================================
// Claim Request Handling
// ============================================================================

mod claim_requests {
    use super::*;

    #[test]
    fn test_claim_text_is_trimmed_and_blank_dropped() {
        runtime().block_on(async {
            let backend = InMemoryBackend::new();
            let item = backend
                .found_service()
                .report(UserId::new(), ItemReportBuilder::new().found())
                .await
                .unwrap();

            let request = ClaimRequestBuilder::new()
                .with_message("  Has my initials on the strap  ")
                .with_contact("   ")
                .build();
            let claim = backend
                .claim_service()
                .create_claim(UserId::new(), item.id, request)
                .await
                .unwrap();

            assert_claim_status(&claim, ClaimStatus::Pending);
            assert_eq!(claim.message.as_deref(), Some("Has my initials on the strap"));
            assert!(claim.contact_info.is_none());
        });
    }

    #[test]
    fn test_oversized_message_is_rejected() {
        runtime().block_on(async {
            let backend = InMemoryBackend::new();
            let item = backend
                .found_service()
                .report(UserId::new(), ItemReportBuilder::new().found())
                .await
                .unwrap();

            let result = backend
                .claim_service()
                .create_claim(UserId::new(), item.id, ClaimFixtures::oversized_message())
                .await;
            assert_error_kind(&result, ErrorKind::Validation, ClaimError::kind);
        });
    }
}

// ============================================================================
// Role Properties
// ============================================================================

mod roles {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn test_only_admins_change_roles(
            actor_role in role_strategy(),
            target_role in role_strategy(),
        ) {
            let result = runtime().block_on(async {
                let backend = InMemoryBackend::new();
                let actor = backend
                    .seed_profile(ProfileBuilder::new().with_role(actor_role).build())
                    .await
                    .unwrap();
                let target = backend
                    .seed_profile(ProfileBuilder::new().with_name("Target").verified().build())
                    .await
                    .unwrap();

                backend
                    .admin_service()
                    .set_role(actor.id, target.id, target_role)
                    .await
            });

            if actor_role == Role::Admin {
                prop_assert_eq!(result.unwrap().role, target_role);
            } else {
                assert_error_kind(&result, ErrorKind::Forbidden, AdminError::kind);
            }
        }

        #[test]
        fn test_verification_requires_moderator(actor_role in role_strategy()) {
            let result = runtime().block_on(async {
                let backend = InMemoryBackend::new();
                let actor = backend.seed_role(actor_role).await.unwrap();
                let target = backend.seed_role(Role::User).await.unwrap();
                backend.admin_service().set_verified(actor.id, target.id, true).await
            });

            if actor_role.can_moderate() {
                prop_assert!(result.unwrap().is_verified);
            } else {
                assert_error_kind(&result, ErrorKind::Forbidden, AdminError::kind);
            }
        }
    }
}
