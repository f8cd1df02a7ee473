//! Item report repository
//!
//! The three report tables share their shape, so one generic repository
//! serves them. [`ItemTable`] supplies the per-table SQL fragments and the
//! row mapping; filtering, pagination and the update round trip are common.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Encode, FromRow, PgPool, Postgres, QueryBuilder, Type};
use std::marker::PhantomData;
use tracing::debug;
use uuid::Uuid;

use core_kernel::{CoreError, FoundItemId, LostItemId, PageRequest, ShareItemId, UserId};
use domain_items::{
    FoundItem, FoundItemStatus, ItemDetails, ItemFilter, ItemRecord, LostItem, LostItemStatus,
    ShareItem, ShareItemStatus,
};

use crate::error::DatabaseError;
use crate::repositories::escape_like;

/// Columns common to every item table, in select order
const DETAIL_COLUMNS: &str =
    "id, owner_id, title, description, category, location, image_url, status, created_at, updated_at";

/// Per-table mapping for an item kind
pub trait ItemTable: ItemRecord {
    /// Table name
    const TABLE: &'static str;
    /// Full select list, `DETAIL_COLUMNS` plus the kind's own columns
    const COLUMNS: &'static str;

    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;
    type DbStatus: for<'q> Encode<'q, Postgres> + Type<Postgres> + Send + 'static;

    fn db_status(status: Self::Status) -> Self::DbStatus;

    fn uuid(id: Self::Id) -> Uuid;

    fn from_row(row: Self::Row) -> Self;

    /// Pushes a complete `INSERT` statement for this record, without `RETURNING`
    fn push_insert(&self, qb: &mut QueryBuilder<'static, Postgres>);

    /// Pushes `UPDATE <table> SET ...` for every mutable column, without `WHERE`
    fn push_update(&self, qb: &mut QueryBuilder<'static, Postgres>);
}

/// Repository for one item table
#[derive(Debug)]
pub struct ItemRepository<T: ItemTable> {
    pool: PgPool,
    _kind: PhantomData<fn() -> T>,
}

impl<T: ItemTable> Clone for ItemRepository<T> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<T: ItemTable> ItemRepository<T> {
    /// Creates a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _kind: PhantomData,
        }
    }

    /// Retrieves a report by its identifier
    pub async fn get_by_id(&self, id: Uuid) -> Result<T, DatabaseError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {} FROM {} WHERE id = ",
            T::COLUMNS,
            T::TABLE
        ));
        qb.push_bind(id);

        let row = qb
            .build_query_as::<T::Row>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found(T::KIND.entity_name(), id))?;
        Ok(T::from_row(row))
    }

    /// Inserts a new report and returns the stored row
    pub async fn insert(&self, item: &T) -> Result<T, DatabaseError> {
        let mut qb = QueryBuilder::new("");
        item.push_insert(&mut qb);
        qb.push(format!(" RETURNING {}", T::COLUMNS));

        let row = qb.build_query_as::<T::Row>().fetch_one(&self.pool).await?;
        debug!(table = T::TABLE, "Inserted item row");
        Ok(T::from_row(row))
    }

    /// Lists reports matching `filter`, newest first, with the total match count
    pub async fn list(
        &self,
        filter: &ItemFilter<T::Status>,
        page: PageRequest,
    ) -> Result<(Vec<T>, u64), DatabaseError> {
        let mut count = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", T::TABLE));
        push_filters::<T>(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", T::COLUMNS, T::TABLE));
        push_filters::<T>(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        qb.push_bind(i64::from(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(i64::from(page.offset()));

        let rows = qb.build_query_as::<T::Row>().fetch_all(&self.pool).await?;
        Ok((
            rows.into_iter().map(T::from_row).collect(),
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    /// Loads a report under a row lock, applies `update` and writes it back
    ///
    /// The read-modify-write runs in one transaction so concurrent updates
    /// of the same report serialise. The status transition is checked
    /// against the locked row, not the caller's earlier read.
    pub async fn update(&self, id: Uuid, update: T::Update) -> Result<UpdateOutcome<T>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let mut select = QueryBuilder::new(format!(
            "SELECT {} FROM {} WHERE id = ",
            T::COLUMNS,
            T::TABLE
        ));
        select.push_bind(id);
        select.push(" FOR UPDATE");
        let Some(row) = select
            .build_query_as::<T::Row>()
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(UpdateOutcome::Missing);
        };

        let mut item = T::from_row(row);
        if let Err(rejection) = item.check_update(&update) {
            debug!(table = T::TABLE, %rejection, "Update rejected on locked row");
            return Ok(UpdateOutcome::Rejected(rejection));
        }
        item.apply_update(update);

        let mut qb = QueryBuilder::new("");
        item.push_update(&mut qb);
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {}", T::COLUMNS));
        let row = qb.build_query_as::<T::Row>().fetch_one(&mut *tx).await?;

        tx.commit().await?;
        Ok(UpdateOutcome::Updated(T::from_row(row)))
    }

    /// Deletes a report
    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut qb = QueryBuilder::new(format!("DELETE FROM {} WHERE id = ", T::TABLE));
        qb.push_bind(id);
        let result = qb.build().execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(T::KIND.entity_name(), id));
        }
        Ok(())
    }
}

/// Result of [`ItemRepository::update`]
#[derive(Debug)]
pub enum UpdateOutcome<T> {
    Updated(T),
    Missing,
    Rejected(CoreError),
}

fn push_filters<T: ItemTable>(
    qb: &mut QueryBuilder<'static, Postgres>,
    filter: &ItemFilter<T::Status>,
) {
    qb.push(" WHERE TRUE");
    if let Some(owner_id) = filter.owner_id {
        qb.push(" AND owner_id = ");
        qb.push_bind(*owner_id.as_uuid());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ");
        qb.push_bind(T::db_status(status));
    }
    if let Some(category) = &filter.category {
        qb.push(" AND lower(category) = lower(");
        qb.push_bind(category.clone());
        qb.push(")");
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR description ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

fn push_detail_values(
    qb: &mut QueryBuilder<'static, Postgres>,
    id: Uuid,
    owner_id: UserId,
    details: &ItemDetails,
) {
    qb.push_bind(id);
    qb.push(", ");
    qb.push_bind(*owner_id.as_uuid());
    qb.push(", ");
    qb.push_bind(details.title.clone());
    qb.push(", ");
    qb.push_bind(details.description.clone());
    qb.push(", ");
    qb.push_bind(details.category.clone());
    qb.push(", ");
    qb.push_bind(details.location.clone());
    qb.push(", ");
    qb.push_bind(details.image_url.clone());
}

fn push_detail_assignments(qb: &mut QueryBuilder<'static, Postgres>, details: &ItemDetails) {
    qb.push("title = ");
    qb.push_bind(details.title.clone());
    qb.push(", description = ");
    qb.push_bind(details.description.clone());
    qb.push(", category = ");
    qb.push_bind(details.category.clone());
    qb.push(", location = ");
    qb.push_bind(details.location.clone());
    qb.push(", image_url = ");
    qb.push_bind(details.image_url.clone());
}

// ============================================================================
// Found items
// ============================================================================

/// Found item status as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "found_item_status", rename_all = "snake_case")]
pub enum DbFoundItemStatus {
    Available,
    Claimed,
    Resolved,
}

impl From<FoundItemStatus> for DbFoundItemStatus {
    fn from(status: FoundItemStatus) -> Self {
        match status {
            FoundItemStatus::Available => Self::Available,
            FoundItemStatus::Claimed => Self::Claimed,
            FoundItemStatus::Resolved => Self::Resolved,
        }
    }
}

impl From<DbFoundItemStatus> for FoundItemStatus {
    fn from(status: DbFoundItemStatus) -> Self {
        match status {
            DbFoundItemStatus::Available => Self::Available,
            DbFoundItemStatus::Claimed => Self::Claimed,
            DbFoundItemStatus::Resolved => Self::Resolved,
        }
    }
}

/// Database row for found item
#[derive(Debug, Clone, FromRow)]
pub struct FoundItemRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub status: DbFoundItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub date_found: NaiveDate,
}

impl ItemTable for FoundItem {
    const TABLE: &'static str = "found_items";
    const COLUMNS: &'static str =
        "id, owner_id, title, description, category, location, image_url, status, created_at, updated_at, date_found";

    type Row = FoundItemRow;
    type DbStatus = DbFoundItemStatus;

    fn db_status(status: FoundItemStatus) -> DbFoundItemStatus {
        status.into()
    }

    fn uuid(id: FoundItemId) -> Uuid {
        *id.as_uuid()
    }

    fn from_row(row: FoundItemRow) -> Self {
        FoundItem {
            id: FoundItemId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            details: ItemDetails {
                title: row.title,
                description: row.description,
                category: row.category,
                location: row.location,
                image_url: row.image_url,
            },
            date_found: row.date_found,
            status: row.status.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn push_insert(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(format!("INSERT INTO found_items ({}, date_found) VALUES (", DETAIL_COLUMNS));
        push_detail_values(qb, *self.id.as_uuid(), self.owner_id, &self.details);
        qb.push(", ");
        qb.push_bind(DbFoundItemStatus::from(self.status));
        qb.push(", ");
        qb.push_bind(self.created_at);
        qb.push(", ");
        qb.push_bind(self.updated_at);
        qb.push(", ");
        qb.push_bind(self.date_found);
        qb.push(")");
    }

    fn push_update(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push("UPDATE found_items SET ");
        push_detail_assignments(qb, &self.details);
        qb.push(", date_found = ");
        qb.push_bind(self.date_found);
        qb.push(", status = ");
        qb.push_bind(DbFoundItemStatus::from(self.status));
        qb.push(", updated_at = ");
        qb.push_bind(self.updated_at);
    }
}

// ============================================================================
// Lost items
// ============================================================================

/// Lost item status as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "lost_item_status", rename_all = "snake_case")]
pub enum DbLostItemStatus {
    Missing,
    Recovered,
}

impl From<LostItemStatus> for DbLostItemStatus {
    fn from(status: LostItemStatus) -> Self {
        match status {
            LostItemStatus::Missing => Self::Missing,
            LostItemStatus::Recovered => Self::Recovered,
        }
    }
}

impl From<DbLostItemStatus> for LostItemStatus {
    fn from(status: DbLostItemStatus) -> Self {
        match status {
            DbLostItemStatus::Missing => Self::Missing,
            DbLostItemStatus::Recovered => Self::Recovered,
        }
    }
}

/// Database row for lost item
#[derive(Debug, Clone, FromRow)]
pub struct LostItemRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub status: DbLostItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub date_lost: NaiveDate,
}

impl ItemTable for LostItem {
    const TABLE: &'static str = "lost_items";
    const COLUMNS: &'static str =
        "id, owner_id, title, description, category, location, image_url, status, created_at, updated_at, date_lost";

    type Row = LostItemRow;
    type DbStatus = DbLostItemStatus;

    fn db_status(status: LostItemStatus) -> DbLostItemStatus {
        status.into()
    }

    fn uuid(id: LostItemId) -> Uuid {
        *id.as_uuid()
    }

    fn from_row(row: LostItemRow) -> Self {
        LostItem {
            id: LostItemId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            details: ItemDetails {
                title: row.title,
                description: row.description,
                category: row.category,
                location: row.location,
                image_url: row.image_url,
            },
            date_lost: row.date_lost,
            status: row.status.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn push_insert(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(format!("INSERT INTO lost_items ({}, date_lost) VALUES (", DETAIL_COLUMNS));
        push_detail_values(qb, *self.id.as_uuid(), self.owner_id, &self.details);
        qb.push(", ");
        qb.push_bind(DbLostItemStatus::from(self.status));
        qb.push(", ");
        qb.push_bind(self.created_at);
        qb.push(", ");
        qb.push_bind(self.updated_at);
        qb.push(", ");
        qb.push_bind(self.date_lost);
        qb.push(")");
    }

    fn push_update(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push("UPDATE lost_items SET ");
        push_detail_assignments(qb, &self.details);
        qb.push(", date_lost = ");
        qb.push_bind(self.date_lost);
        qb.push(", status = ");
        qb.push_bind(DbLostItemStatus::from(self.status));
        qb.push(", updated_at = ");
        qb.push_bind(self.updated_at);
    }
}

// ============================================================================
// Share items
// ============================================================================

/// Share item status as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "share_item_status", rename_all = "snake_case")]
pub enum DbShareItemStatus {
    Available,
    Reserved,
    Given,
}

impl From<ShareItemStatus> for DbShareItemStatus {
    fn from(status: ShareItemStatus) -> Self {
        match status {
            ShareItemStatus::Available => Self::Available,
            ShareItemStatus::Reserved => Self::Reserved,
            ShareItemStatus::Given => Self::Given,
        }
    }
}

impl From<DbShareItemStatus> for ShareItemStatus {
    fn from(status: DbShareItemStatus) -> Self {
        match status {
            DbShareItemStatus::Available => Self::Available,
            DbShareItemStatus::Reserved => Self::Reserved,
            DbShareItemStatus::Given => Self::Given,
        }
    }
}

/// Database row for share item
#[derive(Debug, Clone, FromRow)]
pub struct ShareItemRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub status: DbShareItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub condition: Option<String>,
}

impl ItemTable for ShareItem {
    const TABLE: &'static str = "share_items";
    const COLUMNS: &'static str =
        "id, owner_id, title, description, category, location, image_url, status, created_at, updated_at, condition";

    type Row = ShareItemRow;
    type DbStatus = DbShareItemStatus;

    fn db_status(status: ShareItemStatus) -> DbShareItemStatus {
        status.into()
    }

    fn uuid(id: ShareItemId) -> Uuid {
        *id.as_uuid()
    }

    fn from_row(row: ShareItemRow) -> Self {
        ShareItem {
            id: ShareItemId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            details: ItemDetails {
                title: row.title,
                description: row.description,
                category: row.category,
                location: row.location,
                image_url: row.image_url,
            },
            condition: row.condition,
            status: row.status.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn push_insert(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(format!("INSERT INTO share_items ({}, condition) VALUES (", DETAIL_COLUMNS));
        push_detail_values(qb, *self.id.as_uuid(), self.owner_id, &self.details);
        qb.push(", ");
        qb.push_bind(DbShareItemStatus::from(self.status));
        qb.push(", ");
        qb.push_bind(self.created_at);
        qb.push(", ");
        qb.push_bind(self.updated_at);
        qb.push(", ");
        qb.push_bind(self.condition.clone());
        qb.push(")");
    }

    fn push_update(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push("UPDATE share_items SET ");
        push_detail_assignments(qb, &self.details);
        qb.push(", condition = ");
        qb.push_bind(self.condition.clone());
        qb.push(", status = ");
        qb.push_bind(DbShareItemStatus::from(self.status));
        qb.push(", updated_at = ");
        qb.push_bind(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_render_in_order() {
        let filter = ItemFilter::<FoundItemStatus> {
            category: Some("Keys".to_string()),
            status: Some(FoundItemStatus::Available),
            search: Some("red".to_string()),
            owner_id: Some(UserId::new()),
        };
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM found_items");
        push_filters::<FoundItem>(&mut qb, &filter);

        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM found_items WHERE TRUE AND owner_id = $1 AND status = $2 \
             AND lower(category) = lower($3) AND (title ILIKE $4 OR description ILIKE $5)"
        );
    }

    #[test]
    fn test_insert_binds_every_column() {
        let item = FoundItem::from_new(
            UserId::new(),
            domain_items::NewFoundItem {
                details: ItemDetails {
                    title: "Keys".to_string(),
                    description: None,
                    category: "keys".to_string(),
                    location: None,
                    image_url: None,
                },
                date_found: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            },
        );
        let mut qb = QueryBuilder::new("");
        item.push_insert(&mut qb);
        assert!(qb.sql().ends_with("$9, $10, $11)"));
    }
}
