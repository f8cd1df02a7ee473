//! PostgreSQL adapter integration tests
//!
//! These start a PostgreSQL container and are ignored by default. Run them
//! with `cargo test -p infra_db -- --ignored` on a host with Docker.

use std::sync::Arc;

use core_kernel::{ClaimId, ErrorKind, HealthCheckable, AdapterHealth, PageRequest, UserId};
use domain_admin::{
    AuditAction, AuditFilter, AuditLogEntry, AuditLogPort, ProfilePort, Role, TargetType,
    UserFilter,
};
use domain_claims::{ClaimError, ClaimPort, ClaimQuery, ClaimService, ClaimStatus};
use domain_items::{
    FoundItem, FoundItemStatus, FoundItemUpdate, ItemError, ItemFilter, ItemPort, ItemService, LostItem,
    ShareItem,
};
use infra_db::{
    PostgresAuditLogAdapter, PostgresClaimAdapter, PostgresItemAdapter, PostgresProfileAdapter,
};
use test_utils::{
    assert_claim_status, assert_page, get_shared_test_database, ClaimFixtures,
    ItemReportBuilder, ProfileFixtures,
};

async fn services() -> (ItemService<FoundItem>, ClaimService, PostgresClaimAdapter) {
    let db = get_shared_test_database().await;
    let found: Arc<dyn ItemPort<FoundItem>> =
        Arc::new(PostgresItemAdapter::<FoundItem>::new(db.pool.clone()));
    let claims = PostgresClaimAdapter::new(db.pool.clone());
    (
        ItemService::new(Arc::clone(&found)),
        ClaimService::new(Arc::new(claims.clone()), found),
        claims,
    )
}

mod items {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_found_item_roundtrip_and_update() {
        let (found, _, _) = services().await;
        let owner = UserId::new();

        let item = found
            .report(owner, ItemReportBuilder::new().with_title("Grey hoodie").found())
            .await
            .unwrap();
        let fetched = found.get(item.id).await.unwrap();
        assert_eq!(fetched.details.title, "Grey hoodie");
        assert_eq!(fetched.status, FoundItemStatus::Available);

        let updated = found
            .update(
                owner,
                item.id,
                FoundItemUpdate {
                    status: Some(FoundItemStatus::Resolved),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, FoundItemStatus::Resolved);
        assert!(updated.updated_at >= item.updated_at);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_locked_update_rechecks_status_transition() {
        let db = get_shared_test_database().await;
        let port = PostgresItemAdapter::<FoundItem>::new(db.pool.clone());
        let owner = UserId::new();
        let item = ItemService::new(Arc::new(port.clone()))
            .report(owner, ItemReportBuilder::new().with_title("Umbrella").found())
            .await
            .unwrap();
        let to_status = |status| FoundItemUpdate {
            status: Some(status),
            ..Default::default()
        };

        port.update(item.id, to_status(FoundItemStatus::Claimed)).await.unwrap();
        port.update(item.id, to_status(FoundItemStatus::Resolved)).await.unwrap();
        let reopened = port.update(item.id, to_status(FoundItemStatus::Available)).await;

        assert!(matches!(reopened, Err(ItemError::InvalidState(_))));
        assert_eq!(port.get(item.id).await.unwrap().status, FoundItemStatus::Resolved);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_list_filters_and_escapes_search() {
        let db = get_shared_test_database().await;
        let lost = ItemService::<LostItem>::new(Arc::new(PostgresItemAdapter::new(db.pool.clone())));
        let owner = UserId::new();

        lost.report(owner, ItemReportBuilder::new().with_title("100% wool scarf").lost())
            .await
            .unwrap();
        lost.report(owner, ItemReportBuilder::new().with_title("Wallet").lost())
            .await
            .unwrap();

        let all = lost
            .list(ItemFilter::by_owner(owner), PageRequest::default())
            .await
            .unwrap();
        assert_page(&all, 2, 2);

        let percent = lost
            .list(
                ItemFilter {
                    search: Some("100%".to_string()),
                    ..ItemFilter::by_owner(owner)
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_page(&percent, 1, 1);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_delete_missing_share_item_is_not_found() {
        let db = get_shared_test_database().await;
        let share = PostgresItemAdapter::<ShareItem>::new(db.pool.clone());
        let item = ItemService::new(Arc::new(share.clone()))
            .report(UserId::new(), ItemReportBuilder::new().share())
            .await
            .unwrap();

        share.delete(item.id).await.unwrap();
        let err = share.delete(item.id).await.unwrap_err();
        assert!(err.is_not_found());
    }
}

mod claims {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_duplicate_claim_is_conflict() {
        let (found, claims, _) = services().await;
        let item = found
            .report(UserId::new(), ItemReportBuilder::new().found())
            .await
            .unwrap();
        let claimer = UserId::new();

        claims
            .create_claim(claimer, item.id, ClaimFixtures::request())
            .await
            .unwrap();
        let second = claims
            .create_claim(claimer, item.id, ClaimFixtures::request())
            .await;
        assert!(matches!(second, Err(ClaimError::AlreadyClaimed)));
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_approval_claims_item_and_rejects_siblings() {
        let (found, claims, port) = services().await;
        let owner = UserId::new();
        let item = found
            .report(owner, ItemReportBuilder::new().found())
            .await
            .unwrap();

        let winner = claims
            .create_claim(UserId::new(), item.id, ClaimFixtures::request())
            .await
            .unwrap();
        let loser = claims
            .create_claim(UserId::new(), item.id, ClaimFixtures::request())
            .await
            .unwrap();

        let approved = claims
            .update_status(winner.id, owner, ClaimStatus::Approved)
            .await
            .unwrap();
        assert_claim_status(&approved, ClaimStatus::Approved);
        assert_claim_status(&port.get(loser.id).await.unwrap(), ClaimStatus::Rejected);
        assert_eq!(found.get(item.id).await.unwrap().status, FoundItemStatus::Claimed);

        let again = claims
            .update_status(loser.id, owner, ClaimStatus::Approved)
            .await;
        assert!(matches!(again, Err(ClaimError::InvalidState { .. })));
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_concurrent_approvals_have_one_winner() {
        let (found, claims, port) = services().await;
        let owner = UserId::new();
        let item = found
            .report(owner, ItemReportBuilder::new().found())
            .await
            .unwrap();

        let mut ids = Vec::new();
        for _ in 0..4 {
            let claim = claims
                .create_claim(UserId::new(), item.id, ClaimFixtures::request())
                .await
                .unwrap();
            ids.push(claim.id);
        }

        let handles: Vec<_> = ids
            .iter()
            .map(|id| {
                let port = port.clone();
                let id = *id;
                tokio::spawn(async move { port.record_decision(id, ClaimStatus::Approved).await })
            })
            .collect();

        let mut approvals = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                approvals += 1;
            }
        }
        assert_eq!(approvals, 1);

        let views = port
            .list(ClaimQuery::for_item(item.id), PageRequest::default())
            .await
            .unwrap();
        let approved = views
            .items
            .iter()
            .filter(|v| v.claim.status == ClaimStatus::Approved)
            .count();
        assert_eq!(approved, 1);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_delete_pending_only() {
        let (found, claims, port) = services().await;
        let owner = UserId::new();
        let claimer = UserId::new();
        let item = found
            .report(owner, ItemReportBuilder::new().found())
            .await
            .unwrap();

        let claim = claims
            .create_claim(claimer, item.id, ClaimFixtures::request())
            .await
            .unwrap();
        claims
            .update_status(claim.id, owner, ClaimStatus::Rejected)
            .await
            .unwrap();

        let result = port.delete_pending(claim.id).await;
        assert!(matches!(result, Err(ClaimError::InvalidState { .. })));

        let missing = port.delete_pending(ClaimId::new()).await.unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_claims_cascade_with_item() {
        let (found, claims, port) = services().await;
        let owner = UserId::new();
        let item = found
            .report(owner, ItemReportBuilder::new().found())
            .await
            .unwrap();
        let claim = claims
            .create_claim(UserId::new(), item.id, ClaimFixtures::request())
            .await
            .unwrap();

        found.delete(owner, item.id).await.unwrap();
        assert!(matches!(port.get(claim.id).await, Err(ClaimError::NotFound { .. })));
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_health_check() {
        let (_, _, port) = services().await;
        assert_eq!(port.health_check().await.status, AdapterHealth::Healthy);
    }
}

mod admin {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_profile_upsert_keeps_role() {
        let db = get_shared_test_database().await;
        let profiles = PostgresProfileAdapter::new(db.pool.clone());

        let profile = ProfileFixtures::user();
        profiles.upsert(profile.clone()).await.unwrap();
        profiles.set_role(profile.id, Role::Moderator).await.unwrap();

        let mut again = profile.clone();
        again.email = "changed@example.edu".to_string();
        let stored = profiles.upsert(again).await.unwrap();

        assert_eq!(stored.role, Role::Moderator);
        assert_eq!(stored.email, "changed@example.edu");

        let moderators = profiles
            .list(
                UserFilter {
                    search: Some(stored.email.clone()),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert!(moderators.items.iter().any(|p| p.id == profile.id));
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_audit_log_filter_by_actor() {
        let db = get_shared_test_database().await;
        let audit = PostgresAuditLogAdapter::new(db.pool.clone());
        let actor = UserId::new();

        audit
            .record(AuditLogEntry::new(
                actor,
                AuditAction::VerificationChanged,
                TargetType::User,
                *UserId::new().as_uuid(),
                serde_json::json!({ "verified": true }),
            ))
            .await
            .unwrap();

        let page = audit
            .list(
                AuditFilter {
                    actor_id: Some(actor),
                    action: None,
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_page(&page, 1, 1);
        assert_eq!(page.items[0].details["verified"], true);
    }
}

mod isolated {
    use super::*;
    use test_utils::{db_test, DatabaseTestAssertions};

    db_test!(test_fresh_database_totals_are_exact, |pool| {
        let found = ItemService::<FoundItem>::new(Arc::new(PostgresItemAdapter::new(pool.clone())));
        for title in ["Keys", "Gloves"] {
            found
                .report(UserId::new(), ItemReportBuilder::new().with_title(title).found())
                .await
                .unwrap();
        }

        let page = found
            .list(ItemFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_page(&page, 2, 2);

        sqlx::query("DELETE FROM found_items")
            .execute(&pool)
            .await
            .unwrap()
            .assert_rows_affected(2);
    });
}
