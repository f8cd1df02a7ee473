//! Profile and audit log repositories

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use core_kernel::PageRequest;
use domain_admin::{AuditAction, AuditFilter, AuditLogEntry, Role, TargetType, UserFilter, UserProfile};

use crate::error::DatabaseError;
use crate::repositories::escape_like;

const PROFILE_COLUMNS: &str = "id, email, name, role, is_verified, created_at, updated_at";
const AUDIT_COLUMNS: &str = "id, actor_id, action, target_type, target_id, details, created_at";

/// Repository for user profiles
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ProfileRow, DatabaseError> {
        sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("UserProfile", id))
    }

    /// Inserts a profile, or refreshes the email of an existing one
    pub async fn upsert(&self, profile: &UserProfile) -> Result<ProfileRow, DatabaseError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            INSERT INTO profiles (id, email, name, role, is_verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                updated_at = CASE
                    WHEN profiles.email <> EXCLUDED.email THEN EXCLUDED.updated_at
                    ELSE profiles.updated_at
                END
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(profile.id.as_uuid())
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(DbUserRole::from(profile.role))
        .bind(profile.is_verified)
        .bind(profile.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Lists profiles matching `filter`, newest first, with the total match count
    pub async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<(Vec<ProfileRow>, u64), DatabaseError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM profiles");
        push_user_filters(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {} FROM profiles", PROFILE_COLUMNS));
        push_user_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        qb.push_bind(i64::from(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(i64::from(page.offset()));

        let rows = qb.build_query_as::<ProfileRow>().fetch_all(&self.pool).await?;
        Ok((rows, u64::try_from(total).unwrap_or_default()))
    }

    pub async fn set_name(&self, id: Uuid, name: &str) -> Result<ProfileRow, DatabaseError> {
        self.update_column(id, "name", name.to_string()).await
    }

    pub async fn set_role(&self, id: Uuid, role: Role) -> Result<ProfileRow, DatabaseError> {
        self.update_column(id, "role", DbUserRole::from(role)).await
    }

    pub async fn set_verified(&self, id: Uuid, verified: bool) -> Result<ProfileRow, DatabaseError> {
        self.update_column(id, "is_verified", verified).await
    }

    async fn update_column<V>(
        &self,
        id: Uuid,
        column: &'static str,
        value: V,
    ) -> Result<ProfileRow, DatabaseError>
    where
        V: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + 'static,
    {
        let mut qb = QueryBuilder::new(format!("UPDATE profiles SET {} = ", column));
        qb.push_bind(value);
        qb.push(", updated_at = NOW() WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {}", PROFILE_COLUMNS));

        qb.build_query_as::<ProfileRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("UserProfile", id))
    }
}

fn push_user_filters(qb: &mut QueryBuilder<'static, Postgres>, filter: &UserFilter) {
    qb.push(" WHERE TRUE");
    if let Some(role) = filter.role {
        qb.push(" AND role = ");
        qb.push_bind(DbUserRole::from(role));
    }
    if let Some(verified) = filter.is_verified {
        qb.push(" AND is_verified = ");
        qb.push_bind(verified);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (email ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR name ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

/// Repository for the append-only audit log
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: &AuditLogEntry) -> Result<AuditLogRow, DatabaseError> {
        let row = sqlx::query_as::<_, AuditLogRow>(&format!(
            r#"
            INSERT INTO admin_audit_logs (id, actor_id, action, target_type, target_id, details, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            AUDIT_COLUMNS
        ))
        .bind(entry.id.as_uuid())
        .bind(entry.actor_id.as_uuid())
        .bind(DbAuditAction::from(entry.action))
        .bind(DbAuditTargetType::from(entry.target_type))
        .bind(entry.target_id)
        .bind(&entry.details)
        .bind(entry.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(
        &self,
        filter: &AuditFilter,
        page: PageRequest,
    ) -> Result<(Vec<AuditLogRow>, u64), DatabaseError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM admin_audit_logs");
        push_audit_filters(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {} FROM admin_audit_logs", AUDIT_COLUMNS));
        push_audit_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        qb.push_bind(i64::from(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(i64::from(page.offset()));

        let rows = qb.build_query_as::<AuditLogRow>().fetch_all(&self.pool).await?;
        Ok((rows, u64::try_from(total).unwrap_or_default()))
    }
}

fn push_audit_filters(qb: &mut QueryBuilder<'static, Postgres>, filter: &AuditFilter) {
    qb.push(" WHERE TRUE");
    if let Some(actor_id) = filter.actor_id {
        qb.push(" AND actor_id = ");
        qb.push_bind(*actor_id.as_uuid());
    }
    if let Some(action) = filter.action {
        qb.push(" AND action = ");
        qb.push_bind(DbAuditAction::from(action));
    }
}

// ============================================================================
// Type definitions
// ============================================================================

/// User role as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum DbUserRole {
    User,
    Moderator,
    Admin,
}

impl From<Role> for DbUserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Moderator => Self::Moderator,
            Role::Admin => Self::Admin,
        }
    }
}

impl From<DbUserRole> for Role {
    fn from(role: DbUserRole) -> Self {
        match role {
            DbUserRole::User => Self::User,
            DbUserRole::Moderator => Self::Moderator,
            DbUserRole::Admin => Self::Admin,
        }
    }
}

/// Audit action as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "snake_case")]
pub enum DbAuditAction {
    RoleChanged,
    VerificationChanged,
    ReportRemoved,
}

impl From<AuditAction> for DbAuditAction {
    fn from(action: AuditAction) -> Self {
        match action {
            AuditAction::RoleChanged => Self::RoleChanged,
            AuditAction::VerificationChanged => Self::VerificationChanged,
            AuditAction::ReportRemoved => Self::ReportRemoved,
        }
    }
}

impl From<DbAuditAction> for AuditAction {
    fn from(action: DbAuditAction) -> Self {
        match action {
            DbAuditAction::RoleChanged => Self::RoleChanged,
            DbAuditAction::VerificationChanged => Self::VerificationChanged,
            DbAuditAction::ReportRemoved => Self::ReportRemoved,
        }
    }
}

/// Audit target type as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "audit_target_type", rename_all = "snake_case")]
pub enum DbAuditTargetType {
    User,
    FoundItem,
    LostItem,
    ShareItem,
}

impl From<TargetType> for DbAuditTargetType {
    fn from(target: TargetType) -> Self {
        match target {
            TargetType::User => Self::User,
            TargetType::FoundItem => Self::FoundItem,
            TargetType::LostItem => Self::LostItem,
            TargetType::ShareItem => Self::ShareItem,
        }
    }
}

impl From<DbAuditTargetType> for TargetType {
    fn from(target: DbAuditTargetType) -> Self {
        match target {
            DbAuditTargetType::User => Self::User,
            DbAuditTargetType::FoundItem => Self::FoundItem,
            DbAuditTargetType::LostItem => Self::LostItem,
            DbAuditTargetType::ShareItem => Self::ShareItem,
        }
    }
}

/// Database row for a profile
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: DbUserRole,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for an audit log entry
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogRow {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub action: DbAuditAction,
    pub target_type: DbAuditTargetType,
    pub target_id: Uuid,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_filter_sql() {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM profiles");
        push_user_filters(
            &mut qb,
            &UserFilter {
                role: Some(Role::Moderator),
                is_verified: Some(false),
                search: None,
            },
        );
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM profiles WHERE TRUE AND role = $1 AND is_verified = $2"
        );
    }

    #[test]
    fn test_role_mapping_roundtrip() {
        for role in [Role::User, Role::Moderator, Role::Admin] {
            assert_eq!(Role::from(DbUserRole::from(role)), role);
        }
    }
}
