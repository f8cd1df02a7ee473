//! PostgreSQL Claim Adapter
//!
//! Implements `ClaimPort` over the `ClaimsRepository`, translating the
//! repository's transaction outcomes into claim domain errors.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, ClaimId, DomainPort, FoundItemId, HealthCheckResult, HealthCheckable, Page,
    PageRequest, PortError, UserId,
};
use domain_claims::{
    ClaimError, ClaimPort, ClaimQuery, ClaimStatus, ClaimView, FoundItemClaim, FoundItemSummary,
};

use crate::error::DatabaseError;
use crate::repositories::claims::{
    ClaimRow, ClaimViewRow, ClaimsRepository, DecisionOutcome, DeleteOutcome, InsertOutcome,
};

/// PostgreSQL-backed implementation of the ClaimPort trait
///
/// # Error Handling
///
/// Transaction outcomes map onto the claim errors:
/// - duplicate (found_item_id, claimer_id) -> `ClaimError::AlreadyClaimed`
/// - item not `available` -> `ClaimError::NotAvailable`
/// - claim no longer pending -> `ClaimError::InvalidState`
///
/// Other database errors pass through `PortError` as `ClaimError::Storage`.
#[derive(Debug, Clone)]
pub struct PostgresClaimAdapter {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &ClaimsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimAdapter {}

#[async_trait]
impl HealthCheckable for PostgresClaimAdapter {
    /// Checks database connectivity with a `SELECT 1`
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: "postgres-claim-adapter".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: "postgres-claim-adapter".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl ClaimPort for PostgresClaimAdapter {
    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get(&self, id: ClaimId) -> Result<FoundItemClaim, ClaimError> {
        match self.repository.get_by_id(*id.as_uuid()).await {
            Ok(row) => Ok(row_to_claim(row)),
            Err(e) if e.is_not_found() => Err(ClaimError::claim_not_found(id)),
            Err(e) => Err(storage(e)),
        }
    }

    #[instrument(skip(self), fields(item_id = %found_item_id, claimer = %claimer_id))]
    async fn find_by_item_and_claimer(
        &self,
        found_item_id: FoundItemId,
        claimer_id: UserId,
    ) -> Result<Option<FoundItemClaim>, ClaimError> {
        let row = self
            .repository
            .find_by_item_and_claimer(*found_item_id.as_uuid(), *claimer_id.as_uuid())
            .await
            .map_err(storage)?;
        Ok(row.map(row_to_claim))
    }

    #[instrument(skip_all, fields(claim_id = %claim.id, item_id = %claim.found_item_id))]
    async fn insert(&self, claim: FoundItemClaim) -> Result<FoundItemClaim, ClaimError> {
        match self.repository.insert(&claim).await.map_err(storage)? {
            InsertOutcome::Inserted(row) => Ok(row_to_claim(row)),
            InsertOutcome::Duplicate => {
                debug!("Unique constraint rejected duplicate claim");
                Err(ClaimError::AlreadyClaimed)
            }
            InsertOutcome::ItemMissing => Err(ClaimError::item_not_found(claim.found_item_id)),
            InsertOutcome::ItemUnavailable => Err(ClaimError::NotAvailable),
        }
    }

    #[instrument(skip(self), fields(claim_id = %id, status = %status))]
    async fn record_decision(
        &self,
        id: ClaimId,
        status: ClaimStatus,
    ) -> Result<FoundItemClaim, ClaimError> {
        if status == ClaimStatus::Pending {
            return Err(ClaimError::Validation(
                "status must be approved or rejected".to_string(),
            ));
        }
        match self
            .repository
            .decide(*id.as_uuid(), status)
            .await
            .map_err(storage)?
        {
            DecisionOutcome::Decided(row) => Ok(row_to_claim(row)),
            DecisionOutcome::ClaimMissing => Err(ClaimError::claim_not_found(id)),
            DecisionOutcome::AlreadyDecided(status) => Err(ClaimError::InvalidState { status }),
            DecisionOutcome::ItemUnavailable => Err(ClaimError::NotAvailable),
        }
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn delete_pending(&self, id: ClaimId) -> Result<(), ClaimError> {
        match self
            .repository
            .delete_pending(*id.as_uuid())
            .await
            .map_err(storage)?
        {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::ClaimMissing => Err(ClaimError::claim_not_found(id)),
            DeleteOutcome::NotPending(status) => Err(ClaimError::InvalidState { status }),
        }
    }

    #[instrument(skip(self, query))]
    async fn list(
        &self,
        query: ClaimQuery,
        page: PageRequest,
    ) -> Result<Page<ClaimView>, ClaimError> {
        let (rows, total) = self.repository.list(&query, page).await.map_err(storage)?;
        let views = rows.into_iter().map(row_to_view).collect();
        Ok(Page::new(views, total, page))
    }
}

fn storage(e: DatabaseError) -> ClaimError {
    ClaimError::from(PortError::from(e))
}

/// Converts a database claim row to a domain claim
fn row_to_claim(row: ClaimRow) -> FoundItemClaim {
    FoundItemClaim {
        id: ClaimId::from_uuid(row.id),
        found_item_id: FoundItemId::from_uuid(row.found_item_id),
        claimer_id: UserId::from_uuid(row.claimer_id),
        status: row.status.into(),
        message: row.message,
        contact_info: row.contact_info,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn row_to_view(row: ClaimViewRow) -> ClaimView {
    let claim = row_to_claim(row.claim);
    ClaimView {
        found_item: FoundItemSummary {
            id: claim.found_item_id,
            title: row.item_title,
            owner_id: UserId::from_uuid(row.item_owner_id),
            status: row.item_status.into(),
        },
        claim,
    }
}
