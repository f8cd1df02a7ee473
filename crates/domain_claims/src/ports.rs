//! Claims Domain Ports
//!
//! [`ClaimPort`] is the storage interface for found-item claims. Unlike the
//! item ports, its write operations carry the claim invariants themselves,
//! because they must hold under concurrent requests:
//!
//! - `insert` re-checks item availability and relies on the
//!   (found_item_id, claimer_id) uniqueness to reject duplicates;
//! - `record_decision` only updates a claim that is still pending, and an
//!   approval moves the item to `claimed` and rejects sibling claims in the
//!   same unit of work;
//! - `delete_pending` only deletes a claim that is still pending.
//!
//! The service performs the same checks up front to produce precise errors;
//! the port is what makes them race-free. Methods therefore return
//! [`ClaimError`] rather than a bare `PortError`.

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, FoundItemId, HealthCheckable, Page, PageRequest, UserId};

use crate::claim::{ClaimStatus, ClaimView, FoundItemClaim};
use crate::dto::ClaimQuery;
use crate::error::ClaimError;

/// The main port trait for claim storage
#[async_trait]
pub trait ClaimPort: DomainPort + HealthCheckable {
    /// Retrieves a claim by ID
    ///
    /// # Returns
    ///
    /// The claim if found, or `ClaimError::NotFound`
    async fn get(&self, id: ClaimId) -> Result<FoundItemClaim, ClaimError>;

    /// Finds the claim `claimer_id` filed against `found_item_id`, if any
    async fn find_by_item_and_claimer(
        &self,
        found_item_id: FoundItemId,
        claimer_id: UserId,
    ) -> Result<Option<FoundItemClaim>, ClaimError>;

    /// Persists a new pending claim
    ///
    /// # Errors
    ///
    /// - `ClaimError::AlreadyClaimed` if the claimant already has a claim on the item
    /// - `ClaimError::NotFound` if the item vanished
    /// - `ClaimError::NotAvailable` if the item stopped accepting claims
    async fn insert(&self, claim: FoundItemClaim) -> Result<FoundItemClaim, ClaimError>;

    /// Moves a pending claim to `status` (approved or rejected)
    ///
    /// Approval also marks the found item `claimed` and rejects every other
    /// pending claim on it, atomically with the claim update.
    ///
    /// # Errors
    ///
    /// - `ClaimError::NotFound` if the claim does not exist
    /// - `ClaimError::InvalidState` if the claim is no longer pending
    /// - `ClaimError::NotAvailable` when approving a claim on an unavailable item
    async fn record_decision(
        &self,
        id: ClaimId,
        status: ClaimStatus,
    ) -> Result<FoundItemClaim, ClaimError>;

    /// Deletes a claim that is still pending
    async fn delete_pending(&self, id: ClaimId) -> Result<(), ClaimError>;

    /// Lists claims with their item summaries, newest first
    async fn list(&self, query: ClaimQuery, page: PageRequest) -> Result<Page<ClaimView>, ClaimError>;
}

/// Mock implementation of ClaimPort for testing
///
/// Shares its found-item store with a `MockItemPort<FoundItem>` so approval
/// cascades are visible through the item port. A single write lock on the
/// claim map serialises every write, standing in for a database transaction.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};
    use domain_items::{FoundItem, FoundItemStatus, MockItemPort};

    use crate::claim::FoundItemSummary;

    /// In-memory mock implementation of ClaimPort
    #[derive(Debug, Clone)]
    pub struct MockClaimPort {
        claims: Arc<RwLock<HashMap<ClaimId, FoundItemClaim>>>,
        items: MockItemPort<FoundItem>,
    }

    impl MockClaimPort {
        /// Creates a mock claim store over `items`
        pub fn new(items: MockItemPort<FoundItem>) -> Self {
            Self {
                claims: Arc::new(RwLock::new(HashMap::new())),
                items,
            }
        }

        /// Number of stored claims
        pub async fn len(&self) -> usize {
            self.claims.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }
    }

    impl DomainPort for MockClaimPort {}

    #[async_trait]
    impl HealthCheckable for MockClaimPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-claim-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl ClaimPort for MockClaimPort {
        async fn get(&self, id: ClaimId) -> Result<FoundItemClaim, ClaimError> {
            self.claims
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| ClaimError::claim_not_found(id))
        }

        async fn find_by_item_and_claimer(
            &self,
            found_item_id: FoundItemId,
            claimer_id: UserId,
        ) -> Result<Option<FoundItemClaim>, ClaimError> {
            Ok(self
                .claims
                .read()
                .await
                .values()
                .find(|c| c.found_item_id == found_item_id && c.claimer_id == claimer_id)
                .cloned())
        }

        async fn insert(&self, claim: FoundItemClaim) -> Result<FoundItemClaim, ClaimError> {
            let mut claims = self.claims.write().await;

            if claims.values().any(|c| {
                c.found_item_id == claim.found_item_id && c.claimer_id == claim.claimer_id
            }) {
                return Err(ClaimError::AlreadyClaimed);
            }

            let item = self
                .items
                .snapshot(claim.found_item_id)
                .await
                .ok_or_else(|| ClaimError::item_not_found(claim.found_item_id))?;
            if !item.status.accepts_claims() {
                return Err(ClaimError::NotAvailable);
            }

            claims.insert(claim.id, claim.clone());
            Ok(claim)
        }

        async fn record_decision(
            &self,
            id: ClaimId,
            status: ClaimStatus,
        ) -> Result<FoundItemClaim, ClaimError> {
            let mut claims = self.claims.write().await;

            let mut claim = claims
                .get(&id)
                .cloned()
                .ok_or_else(|| ClaimError::claim_not_found(id))?;

            if status == ClaimStatus::Approved && claim.is_pending() {
                let item = self
                    .items
                    .snapshot(claim.found_item_id)
                    .await
                    .ok_or_else(|| ClaimError::item_not_found(claim.found_item_id))?;
                if !item.status.accepts_claims() {
                    return Err(ClaimError::NotAvailable);
                }
            }

            claim.decide(status)?;

            if status == ClaimStatus::Approved {
                self.items
                    .modify(claim.found_item_id, |item| {
                        item.status = FoundItemStatus::Claimed;
                        item.updated_at = Utc::now();
                    })
                    .await?;

                for sibling in claims.values_mut().filter(|c| {
                    c.found_item_id == claim.found_item_id && c.id != claim.id && c.is_pending()
                }) {
                    sibling.decide(ClaimStatus::Rejected)?;
                }
            }

            claims.insert(claim.id, claim.clone());
            Ok(claim)
        }

        async fn delete_pending(&self, id: ClaimId) -> Result<(), ClaimError> {
            let mut claims = self.claims.write().await;
            let claim = claims
                .get(&id)
                .ok_or_else(|| ClaimError::claim_not_found(id))?;
            if !claim.is_pending() {
                return Err(ClaimError::InvalidState {
                    status: claim.status,
                });
            }
            claims.remove(&id);
            Ok(())
        }

        async fn list(
            &self,
            query: ClaimQuery,
            page: PageRequest,
        ) -> Result<Page<ClaimView>, ClaimError> {
            let claims = self.claims.read().await;
            let mut views = Vec::new();

            for claim in claims.values() {
                if query.claimer_id.is_some_and(|id| id != claim.claimer_id)
                    || query.found_item_id.is_some_and(|id| id != claim.found_item_id)
                    || query.status.is_some_and(|s| s != claim.status)
                {
                    continue;
                }
                // Claims cascade-delete with their item
                let Some(item) = self.items.snapshot(claim.found_item_id).await else {
                    continue;
                };
                if query.owner_id.is_some_and(|id| id != item.owner_id) {
                    continue;
                }
                views.push(ClaimView {
                    claim: claim.clone(),
                    found_item: FoundItemSummary::from(&item),
                });
            }

            views.sort_by_key(|v| std::cmp::Reverse((v.claim.created_at, *v.claim.id.as_uuid())));
            Ok(page.slice(views))
        }
    }
}
