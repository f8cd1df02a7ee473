//! Claim workflow service
//!
//! Orchestrates claim filing, owner decisions, withdrawal and the claim
//! read views over a [`ClaimPort`] and the found-item [`ItemPort`].

use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use core_kernel::{ClaimId, FoundItemId, Page, PageRequest, UserId};
use domain_items::{FoundItem, ItemPort};

use crate::claim::{ClaimStatus, ClaimView, FoundItemClaim, FoundItemSummary};
use crate::dto::{ClaimQuery, CreateClaimRequest};
use crate::error::ClaimError;
use crate::ports::ClaimPort;

/// Service for the found-item claim lifecycle
#[derive(Clone)]
pub struct ClaimService {
    claims: Arc<dyn ClaimPort>,
    items: Arc<dyn ItemPort<FoundItem>>,
}

impl ClaimService {
    pub fn new(claims: Arc<dyn ClaimPort>, items: Arc<dyn ItemPort<FoundItem>>) -> Self {
        Self { claims, items }
    }

    /// Returns the underlying claim port
    pub fn port(&self) -> Arc<dyn ClaimPort> {
        Arc::clone(&self.claims)
    }

    /// Files a claim on a found item
    ///
    /// Checks run in this order: existing claim by the claimant, item
    /// existence, item availability, self-claim.
    ///
    /// # Errors
    ///
    /// - `ClaimError::Validation` for an oversized message or contact
    /// - `ClaimError::AlreadyClaimed` if `claimant` already claimed the item
    /// - `ClaimError::NotFound` if the item does not exist
    /// - `ClaimError::NotAvailable` if the item is not `available`
    /// - `ClaimError::SelfClaim` if `claimant` reported the item
    #[instrument(skip_all, fields(claimant = %claimant, item_id = %found_item_id))]
    pub async fn create_claim(
        &self,
        claimant: UserId,
        found_item_id: FoundItemId,
        request: CreateClaimRequest,
    ) -> Result<FoundItemClaim, ClaimError> {
        request.validate()?;

        if self
            .claims
            .find_by_item_and_claimer(found_item_id, claimant)
            .await?
            .is_some()
        {
            return Err(ClaimError::AlreadyClaimed);
        }

        let item = self.load_item(found_item_id).await?;
        if !item.status.accepts_claims() {
            return Err(ClaimError::NotAvailable);
        }
        if item.owner_id == claimant {
            warn!("Reporter attempted to claim their own item");
            return Err(ClaimError::SelfClaim);
        }

        let claim = FoundItemClaim::new(
            found_item_id,
            claimant,
            normalize(request.message),
            normalize(request.contact_info),
        );
        let claim = self.claims.insert(claim).await?;

        info!(claim_id = %claim.id, "Claim filed");
        Ok(claim)
    }

    /// Approves or rejects a claim on behalf of the item owner
    ///
    /// # Errors
    ///
    /// - `ClaimError::Validation` if `status` is `pending`
    /// - `ClaimError::NotFound` if the claim does not exist
    /// - `ClaimError::Forbidden` if `actor` did not report the item
    /// - `ClaimError::InvalidState` if the claim was already decided
    /// - `ClaimError::NotAvailable` when approving while the item is not available
    #[instrument(skip_all, fields(claim_id = %claim_id, actor = %actor, status = %status))]
    pub async fn update_status(
        &self,
        claim_id: ClaimId,
        actor: UserId,
        status: ClaimStatus,
    ) -> Result<FoundItemClaim, ClaimError> {
        if status == ClaimStatus::Pending {
            return Err(ClaimError::Validation(
                "status must be approved or rejected".to_string(),
            ));
        }

        let claim = self.claims.get(claim_id).await?;
        let item = self.load_item(claim.found_item_id).await?;
        if item.owner_id != actor {
            warn!("Non-owner attempted to decide a claim");
            return Err(ClaimError::Forbidden(
                "only the item's reporter can decide its claims".to_string(),
            ));
        }
        if !claim.is_pending() {
            return Err(ClaimError::InvalidState {
                status: claim.status,
            });
        }

        let decided = self.claims.record_decision(claim_id, status).await?;
        info!(item_id = %decided.found_item_id, "Claim decided");
        Ok(decided)
    }

    /// Withdraws a pending claim on behalf of its claimant
    ///
    /// # Errors
    ///
    /// - `ClaimError::NotFound` if the claim does not exist
    /// - `ClaimError::Forbidden` if `actor` did not file the claim
    /// - `ClaimError::InvalidState` if the claim was already decided
    #[instrument(skip_all, fields(claim_id = %claim_id, actor = %actor))]
    pub async fn delete_claim(&self, claim_id: ClaimId, actor: UserId) -> Result<(), ClaimError> {
        let claim = self.claims.get(claim_id).await?;
        if claim.claimer_id != actor {
            return Err(ClaimError::Forbidden(
                "only the claimant can withdraw a claim".to_string(),
            ));
        }
        if !claim.is_pending() {
            return Err(ClaimError::InvalidState {
                status: claim.status,
            });
        }

        self.claims.delete_pending(claim_id).await?;
        info!("Claim withdrawn");
        Ok(())
    }

    /// Fetches one claim, visible to its claimant and the item's reporter
    pub async fn get_claim(&self, claim_id: ClaimId, actor: UserId) -> Result<ClaimView, ClaimError> {
        let claim = self.claims.get(claim_id).await?;
        let item = self.load_item(claim.found_item_id).await?;
        if claim.claimer_id != actor && item.owner_id != actor {
            return Err(ClaimError::Forbidden(
                "claims are visible to the claimant and the item's reporter".to_string(),
            ));
        }
        Ok(ClaimView {
            claim,
            found_item: FoundItemSummary::from(&item),
        })
    }

    /// Claims filed by `user`
    pub async fn claims_made(
        &self,
        user: UserId,
        status: Option<ClaimStatus>,
        page: PageRequest,
    ) -> Result<Page<ClaimView>, ClaimError> {
        self.claims
            .list(ClaimQuery::made_by(user).with_status(status), page)
            .await
    }

    /// Claims against items `user` reported
    pub async fn claims_received(
        &self,
        user: UserId,
        status: Option<ClaimStatus>,
        page: PageRequest,
    ) -> Result<Page<ClaimView>, ClaimError> {
        self.claims
            .list(ClaimQuery::received_by(user).with_status(status), page)
            .await
    }

    /// Claims on one item, visible to its reporter only
    pub async fn claims_for_item(
        &self,
        found_item_id: FoundItemId,
        actor: UserId,
        page: PageRequest,
    ) -> Result<Page<ClaimView>, ClaimError> {
        let item = self.load_item(found_item_id).await?;
        if item.owner_id != actor {
            return Err(ClaimError::Forbidden(
                "only the item's reporter can list its claims".to_string(),
            ));
        }
        self.claims.list(ClaimQuery::for_item(found_item_id), page).await
    }

    /// Unrestricted listing; callers must have checked moderator rights
    pub async fn all_claims(
        &self,
        query: ClaimQuery,
        page: PageRequest,
    ) -> Result<Page<ClaimView>, ClaimError> {
        self.claims.list(query, page).await
    }

    async fn load_item(&self, id: FoundItemId) -> Result<FoundItem, ClaimError> {
        self.items.get(id).await.map_err(|e| {
            if e.is_not_found() {
                ClaimError::item_not_found(id)
            } else {
                e.into()
            }
        })
    }
}

/// Treats blank optional text as absent
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use domain_items::{FoundItemStatus, ItemDetails, ItemRecord, MockItemPort, NewFoundItem};

    use crate::ports::mock::MockClaimPort;

    struct Harness {
        items: MockItemPort<FoundItem>,
        claims: MockClaimPort,
        service: ClaimService,
    }

    fn harness() -> Harness {
        let items = MockItemPort::<FoundItem>::new();
        let claims = MockClaimPort::new(items.clone());
        let service = ClaimService::new(Arc::new(claims.clone()), Arc::new(items.clone()));
        Harness {
            items,
            claims,
            service,
        }
    }

    async fn found_item(h: &Harness, owner: UserId) -> FoundItem {
        let item = FoundItem::from_new(
            owner,
            NewFoundItem {
                details: ItemDetails {
                    title: "Blue umbrella".to_string(),
                    description: None,
                    category: "accessories".to_string(),
                    location: Some("Library entrance".to_string()),
                    image_url: None,
                },
                date_found: NaiveDate::from_ymd_opt(2024, 9, 12).unwrap(),
            },
        );
        h.items.create(item).await.unwrap()
    }

    fn request(message: &str) -> CreateClaimRequest {
        CreateClaimRequest {
            message: Some(message.to_string()),
            contact_info: Some("555-0100".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_claim_is_pending() {
        let h = harness();
        let owner = UserId::new();
        let item = found_item(&h, owner).await;

        let claim = h
            .service
            .create_claim(UserId::new(), item.id, request("Has a sticker on the handle"))
            .await
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.found_item_id, item.id);
        assert_eq!(h.claims.len().await, 1);
    }

    #[tokio::test]
    async fn test_blank_message_is_stored_as_absent() {
        let h = harness();
        let item = found_item(&h, UserId::new()).await;

        let claim = h
            .service
            .create_claim(
                UserId::new(),
                item.id,
                CreateClaimRequest {
                    message: Some("   ".to_string()),
                    contact_info: None,
                },
            )
            .await
            .unwrap();
        assert!(claim.message.is_none());
    }

    #[tokio::test]
    async fn test_oversized_message_is_rejected() {
        let h = harness();
        let item = found_item(&h, UserId::new()).await;

        let result = h
            .service
            .create_claim(UserId::new(), item.id, request(&"x".repeat(1001)))
            .await;
        assert!(matches!(result, Err(ClaimError::Validation(_))));
        assert!(h.claims.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_claim_is_rejected() {
        let h = harness();
        let item = found_item(&h, UserId::new()).await;
        let claimant = UserId::new();

        h.service
            .create_claim(claimant, item.id, request("first"))
            .await
            .unwrap();
        let second = h.service.create_claim(claimant, item.id, request("again")).await;

        assert!(matches!(second, Err(ClaimError::AlreadyClaimed)));
        assert_eq!(h.claims.len().await, 1);
    }

    #[tokio::test]
    async fn test_claim_on_missing_item_is_not_found() {
        let h = harness();
        let result = h
            .service
            .create_claim(UserId::new(), FoundItemId::new(), request("mine"))
            .await;
        assert!(matches!(
            result,
            Err(ClaimError::NotFound { entity: "FoundItem", .. })
        ));
    }

    #[tokio::test]
    async fn test_claim_on_unavailable_item_is_rejected() {
        let h = harness();
        let item = found_item(&h, UserId::new()).await;
        h.items
            .modify(item.id, |i| i.status = FoundItemStatus::Resolved)
            .await
            .unwrap();

        let result = h.service.create_claim(UserId::new(), item.id, request("mine")).await;
        assert!(matches!(result, Err(ClaimError::NotAvailable)));
    }

    #[tokio::test]
    async fn test_self_claim_is_rejected() {
        let h = harness();
        let owner = UserId::new();
        let item = found_item(&h, owner).await;

        let result = h.service.create_claim(owner, item.id, request("mine")).await;
        assert!(matches!(result, Err(ClaimError::SelfClaim)));
    }

    #[tokio::test]
    async fn test_approval_claims_item_and_rejects_siblings() {
        let h = harness();
        let owner = UserId::new();
        let item = found_item(&h, owner).await;

        let winner = h
            .service
            .create_claim(UserId::new(), item.id, request("initials on the strap"))
            .await
            .unwrap();
        let other = h
            .service
            .create_claim(UserId::new(), item.id, request("I think it is mine"))
            .await
            .unwrap();

        let approved = h
            .service
            .update_status(winner.id, owner, ClaimStatus::Approved)
            .await
            .unwrap();

        assert_eq!(approved.status, ClaimStatus::Approved);
        assert_eq!(
            h.items.snapshot(item.id).await.unwrap().status,
            FoundItemStatus::Claimed
        );
        assert_eq!(
            h.claims.get(other.id).await.unwrap().status,
            ClaimStatus::Rejected
        );
    }

    #[tokio::test]
    async fn test_new_claims_refused_after_approval() {
        let h = harness();
        let owner = UserId::new();
        let item = found_item(&h, owner).await;
        let claim = h
            .service
            .create_claim(UserId::new(), item.id, request("mine"))
            .await
            .unwrap();
        h.service
            .update_status(claim.id, owner, ClaimStatus::Approved)
            .await
            .unwrap();

        let late = h.service.create_claim(UserId::new(), item.id, request("late")).await;
        assert!(matches!(late, Err(ClaimError::NotAvailable)));
    }

    #[tokio::test]
    async fn test_rejection_leaves_item_available() {
        let h = harness();
        let owner = UserId::new();
        let item = found_item(&h, owner).await;
        let claim = h
            .service
            .create_claim(UserId::new(), item.id, request("mine"))
            .await
            .unwrap();

        let rejected = h
            .service
            .update_status(claim.id, owner, ClaimStatus::Rejected)
            .await
            .unwrap();

        assert_eq!(rejected.status, ClaimStatus::Rejected);
        assert_eq!(
            h.items.snapshot(item.id).await.unwrap().status,
            FoundItemStatus::Available
        );
    }

    #[tokio::test]
    async fn test_only_owner_decides() {
        let h = harness();
        let owner = UserId::new();
        let claimant = UserId::new();
        let item = found_item(&h, owner).await;
        let claim = h.service.create_claim(claimant, item.id, request("mine")).await.unwrap();

        let by_claimant = h
            .service
            .update_status(claim.id, claimant, ClaimStatus::Approved)
            .await;
        assert!(matches!(by_claimant, Err(ClaimError::Forbidden(_))));

        let bystander = UserId::new();
        let by_bystander = h
            .service
            .update_status(claim.id, bystander, ClaimStatus::Approved)
            .await;
        assert!(matches!(by_bystander, Err(ClaimError::Forbidden(_))));
        assert!(h.claims.get(claim.id).await.unwrap().is_pending());
    }

    #[tokio::test]
    async fn test_claimant_cannot_reclaim_after_approval() {
        let h = harness();
        let owner = UserId::new();
        let claimant = UserId::new();
        let item = found_item(&h, owner).await;
        let claim = h.service.create_claim(claimant, item.id, request("mine")).await.unwrap();
        h.service
            .update_status(claim.id, owner, ClaimStatus::Approved)
            .await
            .unwrap();

        let again = h.service.create_claim(claimant, item.id, request("mine again")).await;
        assert!(matches!(again, Err(ClaimError::AlreadyClaimed)));
        assert_eq!(again.unwrap_err().kind(), core_kernel::ErrorKind::Conflict);
        assert_eq!(h.claims.len().await, 1);
    }

    #[tokio::test]
    async fn test_decided_claim_cannot_change() {
        let h = harness();
        let owner = UserId::new();
        let item = found_item(&h, owner).await;
        let claim = h
            .service
            .create_claim(UserId::new(), item.id, request("mine"))
            .await
            .unwrap();
        h.service
            .update_status(claim.id, owner, ClaimStatus::Rejected)
            .await
            .unwrap();

        let again = h
            .service
            .update_status(claim.id, owner, ClaimStatus::Approved)
            .await;
        assert!(matches!(
            again,
            Err(ClaimError::InvalidState {
                status: ClaimStatus::Rejected
            })
        ));
    }

    #[tokio::test]
    async fn test_pending_is_not_a_decision() {
        let h = harness();
        let result = h
            .service
            .update_status(ClaimId::new(), UserId::new(), ClaimStatus::Pending)
            .await;
        assert!(matches!(result, Err(ClaimError::Validation(_))));
    }

    #[tokio::test]
    async fn test_decide_unknown_claim_is_not_found() {
        let h = harness();
        let result = h
            .service
            .update_status(ClaimId::new(), UserId::new(), ClaimStatus::Approved)
            .await;
        assert!(matches!(result, Err(ClaimError::NotFound { entity: "Claim", .. })));
    }

    #[tokio::test]
    async fn test_approval_refused_once_item_is_resolved() {
        let h = harness();
        let owner = UserId::new();
        let item = found_item(&h, owner).await;
        let claim = h
            .service
            .create_claim(UserId::new(), item.id, request("mine"))
            .await
            .unwrap();
        h.items
            .modify(item.id, |i| i.status = FoundItemStatus::Resolved)
            .await
            .unwrap();

        let result = h
            .service
            .update_status(claim.id, owner, ClaimStatus::Approved)
            .await;
        assert!(matches!(result, Err(ClaimError::NotAvailable)));
    }

    #[tokio::test]
    async fn test_claimant_withdraws_pending_claim() {
        let h = harness();
        let claimant = UserId::new();
        let item = found_item(&h, UserId::new()).await;
        let claim = h.service.create_claim(claimant, item.id, request("mine")).await.unwrap();

        assert!(matches!(
            h.service.delete_claim(claim.id, UserId::new()).await,
            Err(ClaimError::Forbidden(_))
        ));
        h.service.delete_claim(claim.id, claimant).await.unwrap();
        assert!(h.claims.is_empty().await);

        // Withdrawal frees the claimant to file again
        h.service
            .create_claim(claimant, item.id, request("second try"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_decided_claim_cannot_be_withdrawn() {
        let h = harness();
        let owner = UserId::new();
        let claimant = UserId::new();
        let item = found_item(&h, owner).await;
        let claim = h.service.create_claim(claimant, item.id, request("mine")).await.unwrap();
        h.service
            .update_status(claim.id, owner, ClaimStatus::Approved)
            .await
            .unwrap();

        let result = h.service.delete_claim(claim.id, claimant).await;
        assert!(matches!(result, Err(ClaimError::InvalidState { .. })));
    }

    #[tokio::test]
    async fn test_claim_visibility() {
        let h = harness();
        let owner = UserId::new();
        let claimant = UserId::new();
        let item = found_item(&h, owner).await;
        let claim = h.service.create_claim(claimant, item.id, request("mine")).await.unwrap();

        let as_owner = h.service.get_claim(claim.id, owner).await.unwrap();
        assert_eq!(as_owner.found_item.title, "Blue umbrella");
        h.service.get_claim(claim.id, claimant).await.unwrap();
        assert!(matches!(
            h.service.get_claim(claim.id, UserId::new()).await,
            Err(ClaimError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_made_and_received_views() {
        let h = harness();
        let alice = UserId::new();
        let bob = UserId::new();
        let alices_item = found_item(&h, alice).await;
        let bobs_item = found_item(&h, bob).await;

        h.service
            .create_claim(bob, alices_item.id, request("mine"))
            .await
            .unwrap();
        let alice_claim = h
            .service
            .create_claim(alice, bobs_item.id, request("mine"))
            .await
            .unwrap();
        h.service
            .update_status(alice_claim.id, bob, ClaimStatus::Rejected)
            .await
            .unwrap();

        let made = h
            .service
            .claims_made(alice, None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(made.total, 1);
        assert_eq!(made.items[0].found_item.owner_id, bob);

        let received = h
            .service
            .claims_received(alice, Some(ClaimStatus::Pending), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(received.total, 1);
        assert_eq!(received.items[0].claim.claimer_id, bob);

        let rejected_made = h
            .service
            .claims_made(alice, Some(ClaimStatus::Pending), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(rejected_made.total, 0);
    }

    #[tokio::test]
    async fn test_claims_for_item_owner_only() {
        let h = harness();
        let owner = UserId::new();
        let item = found_item(&h, owner).await;
        h.service
            .create_claim(UserId::new(), item.id, request("a"))
            .await
            .unwrap();
        h.service
            .create_claim(UserId::new(), item.id, request("b"))
            .await
            .unwrap();

        let page = h
            .service
            .claims_for_item(item.id, owner, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(matches!(
            h.service
                .claims_for_item(item.id, UserId::new(), PageRequest::default())
                .await,
            Err(ClaimError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_approvals_leave_one_winner() {
        let h = harness();
        let owner = UserId::new();
        let item = found_item(&h, owner).await;
        let mut ids = Vec::new();
        for _ in 0..4 {
            let claim = h
                .service
                .create_claim(UserId::new(), item.id, request("mine"))
                .await
                .unwrap();
            ids.push(claim.id);
        }

        let tasks: Vec<_> = ids
            .iter()
            .map(|id| {
                let service = h.service.clone();
                let id = *id;
                tokio::spawn(async move { service.update_status(id, owner, ClaimStatus::Approved).await })
            })
            .collect();

        let mut approved = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                approved += 1;
            }
        }
        assert_eq!(approved, 1);

        let all = h
            .service
            .claims_for_item(item.id, owner, PageRequest::default())
            .await
            .unwrap();
        let winners = all
            .items
            .iter()
            .filter(|v| v.claim.status == ClaimStatus::Approved)
            .count();
        assert_eq!(winners, 1);
        assert!(all.items.iter().all(|v| !v.claim.is_pending()));
    }
}
