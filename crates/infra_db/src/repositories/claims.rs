//! Found-item claims repository
//!
//! Every write runs in one transaction. Transactions that touch both tables
//! lock the found item row before any claim row, so approvals, new claims
//! and sibling rejections on the same item serialise without deadlocking.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use core_kernel::PageRequest;
use domain_claims::{ClaimQuery, ClaimStatus, FoundItemClaim};

use crate::error::DatabaseError;
use crate::repositories::items::DbFoundItemStatus;

const CLAIM_COLUMNS: &str =
    "id, found_item_id, claimer_id, status, message, contact_info, created_at, updated_at";

/// Repository for managing found-item claims
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a claim by its identifier
    ///
    /// # Returns
    ///
    /// The claim record or NotFound error
    pub async fn get_by_id(&self, claim_id: Uuid) -> Result<ClaimRow, DatabaseError> {
        sqlx::query_as::<_, ClaimRow>(&format!(
            "SELECT {} FROM found_item_claims WHERE id = $1",
            CLAIM_COLUMNS
        ))
        .bind(claim_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))
    }

    /// Finds the claim a user filed against an item
    pub async fn find_by_item_and_claimer(
        &self,
        found_item_id: Uuid,
        claimer_id: Uuid,
    ) -> Result<Option<ClaimRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ClaimRow>(&format!(
            "SELECT {} FROM found_item_claims WHERE found_item_id = $1 AND claimer_id = $2",
            CLAIM_COLUMNS
        ))
        .bind(found_item_id)
        .bind(claimer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Inserts a pending claim if the item still accepts claims
    ///
    /// Holds a share lock on the item row so a concurrent approval either
    /// sees this claim or commits before it is inserted.
    pub async fn insert(&self, claim: &FoundItemClaim) -> Result<InsertOutcome, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let item_status: Option<DbFoundItemStatus> =
            sqlx::query_scalar("SELECT status FROM found_items WHERE id = $1 FOR SHARE")
                .bind(claim.found_item_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        match item_status {
            None => return Ok(InsertOutcome::ItemMissing),
            Some(DbFoundItemStatus::Available) => {}
            Some(_) => return Ok(InsertOutcome::ItemUnavailable),
        }

        let inserted = sqlx::query_as::<_, ClaimRow>(&format!(
            r#"
            INSERT INTO found_item_claims (
                id, found_item_id, claimer_id, status, message, contact_info, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            CLAIM_COLUMNS
        ))
        .bind(claim.id.as_uuid())
        .bind(claim.found_item_id.as_uuid())
        .bind(claim.claimer_id.as_uuid())
        .bind(DbClaimStatus::from(claim.status))
        .bind(&claim.message)
        .bind(&claim.contact_info)
        .bind(claim.created_at)
        .bind(claim.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from);

        match inserted {
            Ok(row) => {
                tx.commit().await?;
                Ok(InsertOutcome::Inserted(row))
            }
            Err(e) if e.is_duplicate() => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(e),
        }
    }

    /// Records an owner decision on a pending claim
    ///
    /// An approval also marks the item `claimed` and rejects every other
    /// pending claim on it, all in the same transaction.
    pub async fn decide(
        &self,
        claim_id: Uuid,
        status: ClaimStatus,
    ) -> Result<DecisionOutcome, DatabaseError> {
        let found_item_id: Option<Uuid> =
            sqlx::query_scalar("SELECT found_item_id FROM found_item_claims WHERE id = $1")
                .bind(claim_id)
                .fetch_optional(&self.pool)
                .await?;
        let Some(found_item_id) = found_item_id else {
            return Ok(DecisionOutcome::ClaimMissing);
        };

        let mut tx = self.pool.begin().await?;

        let item_status: Option<DbFoundItemStatus> =
            sqlx::query_scalar("SELECT status FROM found_items WHERE id = $1 FOR UPDATE")
                .bind(found_item_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(item_status) = item_status else {
            return Ok(DecisionOutcome::ClaimMissing);
        };

        let current: Option<DbClaimStatus> =
            sqlx::query_scalar("SELECT status FROM found_item_claims WHERE id = $1 FOR UPDATE")
                .bind(claim_id)
                .fetch_optional(&mut *tx)
                .await?;
        match current {
            None => return Ok(DecisionOutcome::ClaimMissing),
            Some(DbClaimStatus::Pending) => {}
            Some(decided) => return Ok(DecisionOutcome::AlreadyDecided(decided.into())),
        }

        let now = Utc::now();
        if status == ClaimStatus::Approved {
            if item_status != DbFoundItemStatus::Available {
                return Ok(DecisionOutcome::ItemUnavailable);
            }

            sqlx::query("UPDATE found_items SET status = $2, updated_at = $3 WHERE id = $1")
                .bind(found_item_id)
                .bind(DbFoundItemStatus::Claimed)
                .bind(now)
                .execute(&mut *tx)
                .await?;

            let rejected = sqlx::query(
                r#"
                UPDATE found_item_claims
                SET status = $3, updated_at = $4
                WHERE found_item_id = $1 AND id <> $2 AND status = $5
                "#,
            )
            .bind(found_item_id)
            .bind(claim_id)
            .bind(DbClaimStatus::Rejected)
            .bind(now)
            .bind(DbClaimStatus::Pending)
            .execute(&mut *tx)
            .await?;
            debug!(rejected = rejected.rows_affected(), "Rejected sibling claims");
        }

        let row = sqlx::query_as::<_, ClaimRow>(&format!(
            "UPDATE found_item_claims SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            CLAIM_COLUMNS
        ))
        .bind(claim_id)
        .bind(DbClaimStatus::from(status))
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(DecisionOutcome::Decided(row))
    }

    /// Deletes a claim only while it is pending
    pub async fn delete_pending(&self, claim_id: Uuid) -> Result<DeleteOutcome, DatabaseError> {
        let result = sqlx::query("DELETE FROM found_item_claims WHERE id = $1 AND status = $2")
            .bind(claim_id)
            .bind(DbClaimStatus::Pending)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            return Ok(DeleteOutcome::Deleted);
        }

        let status: Option<DbClaimStatus> =
            sqlx::query_scalar("SELECT status FROM found_item_claims WHERE id = $1")
                .bind(claim_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(match status {
            None => DeleteOutcome::ClaimMissing,
            Some(status) => DeleteOutcome::NotPending(status.into()),
        })
    }

    /// Lists claims joined with their item, newest first, with the total match count
    pub async fn list(
        &self,
        query: &ClaimQuery,
        page: PageRequest,
    ) -> Result<(Vec<ClaimViewRow>, u64), DatabaseError> {
        let mut count = QueryBuilder::new(
            "SELECT COUNT(*) FROM found_item_claims c JOIN found_items f ON f.id = c.found_item_id",
        );
        push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new(
            r#"
            SELECT
                c.id, c.found_item_id, c.claimer_id, c.status, c.message, c.contact_info,
                c.created_at, c.updated_at,
                f.title AS item_title, f.owner_id AS item_owner_id, f.status AS item_status
            FROM found_item_claims c
            JOIN found_items f ON f.id = c.found_item_id
            "#,
        );
        push_filters(&mut qb, query);
        qb.push(" ORDER BY c.created_at DESC, c.id DESC LIMIT ");
        qb.push_bind(i64::from(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(i64::from(page.offset()));

        let rows = qb
            .build_query_as::<ClaimViewRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, u64::try_from(total).unwrap_or_default()))
    }
}

fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, query: &ClaimQuery) {
    qb.push(" WHERE TRUE");
    if let Some(claimer_id) = query.claimer_id {
        qb.push(" AND c.claimer_id = ");
        qb.push_bind(*claimer_id.as_uuid());
    }
    if let Some(owner_id) = query.owner_id {
        qb.push(" AND f.owner_id = ");
        qb.push_bind(*owner_id.as_uuid());
    }
    if let Some(found_item_id) = query.found_item_id {
        qb.push(" AND c.found_item_id = ");
        qb.push_bind(*found_item_id.as_uuid());
    }
    if let Some(status) = query.status {
        qb.push(" AND c.status = ");
        qb.push_bind(DbClaimStatus::from(status));
    }
}

// ============================================================================
// Type definitions
// ============================================================================

/// Claim status as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "snake_case")]
pub enum DbClaimStatus {
    Pending,
    Approved,
    Rejected,
}

impl From<ClaimStatus> for DbClaimStatus {
    fn from(status: ClaimStatus) -> Self {
        match status {
            ClaimStatus::Pending => Self::Pending,
            ClaimStatus::Approved => Self::Approved,
            ClaimStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<DbClaimStatus> for ClaimStatus {
    fn from(status: DbClaimStatus) -> Self {
        match status {
            DbClaimStatus::Pending => Self::Pending,
            DbClaimStatus::Approved => Self::Approved,
            DbClaimStatus::Rejected => Self::Rejected,
        }
    }
}

/// Database row for a claim
#[derive(Debug, Clone, FromRow)]
pub struct ClaimRow {
    pub id: Uuid,
    pub found_item_id: Uuid,
    pub claimer_id: Uuid,
    pub status: DbClaimStatus,
    pub message: Option<String>,
    pub contact_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for a claim joined with its item
#[derive(Debug, Clone, FromRow)]
pub struct ClaimViewRow {
    #[sqlx(flatten)]
    pub claim: ClaimRow,
    pub item_title: String,
    pub item_owner_id: Uuid,
    pub item_status: DbFoundItemStatus,
}

/// Result of [`ClaimsRepository::insert`]
#[derive(Debug)]
pub enum InsertOutcome {
    Inserted(ClaimRow),
    Duplicate,
    ItemMissing,
    ItemUnavailable,
}

/// Result of [`ClaimsRepository::decide`]
#[derive(Debug)]
pub enum DecisionOutcome {
    Decided(ClaimRow),
    ClaimMissing,
    AlreadyDecided(ClaimStatus),
    ItemUnavailable,
}

/// Result of [`ClaimsRepository::delete_pending`]
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted,
    ClaimMissing,
    NotPending(ClaimStatus),
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::UserId;

    #[test]
    fn test_status_mapping_roundtrip() {
        for status in [ClaimStatus::Pending, ClaimStatus::Approved, ClaimStatus::Rejected] {
            assert_eq!(ClaimStatus::from(DbClaimStatus::from(status)), status);
        }
    }

    #[test]
    fn test_received_filter_joins_on_owner() {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM found_item_claims c");
        push_filters(
            &mut qb,
            &ClaimQuery::received_by(UserId::new()).with_status(Some(ClaimStatus::Pending)),
        );
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM found_item_claims c WHERE TRUE AND f.owner_id = $1 AND c.status = $2"
        );
    }
}
