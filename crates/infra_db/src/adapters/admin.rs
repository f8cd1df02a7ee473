//! PostgreSQL profile and audit log adapters

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{AuditLogId, DomainPort, Page, PageRequest, PortError, UserId};
use domain_admin::{
    AuditFilter, AuditLogEntry, AuditLogPort, ProfilePort, Role, UserFilter, UserProfile,
};

use crate::repositories::profiles::{AuditLogRepository, AuditLogRow, ProfileRepository, ProfileRow};

/// PostgreSQL-backed implementation of the ProfilePort trait
#[derive(Debug, Clone)]
pub struct PostgresProfileAdapter {
    repository: ProfileRepository,
}

impl PostgresProfileAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ProfileRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresProfileAdapter {}

#[async_trait]
impl ProfilePort for PostgresProfileAdapter {
    #[instrument(skip(self), fields(user = %id))]
    async fn get(&self, id: UserId) -> Result<UserProfile, PortError> {
        Ok(row_to_profile(self.repository.get_by_id(*id.as_uuid()).await?))
    }

    #[instrument(skip_all, fields(user = %profile.id))]
    async fn upsert(&self, profile: UserProfile) -> Result<UserProfile, PortError> {
        Ok(row_to_profile(self.repository.upsert(&profile).await?))
    }

    #[instrument(skip(self, filter))]
    async fn list(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, PortError> {
        let (rows, total) = self.repository.list(&filter, page).await?;
        Ok(Page::new(rows.into_iter().map(row_to_profile).collect(), total, page))
    }

    #[instrument(skip(self, name), fields(user = %id))]
    async fn set_name(&self, id: UserId, name: String) -> Result<UserProfile, PortError> {
        Ok(row_to_profile(self.repository.set_name(*id.as_uuid(), &name).await?))
    }

    #[instrument(skip(self), fields(user = %id))]
    async fn set_role(&self, id: UserId, role: Role) -> Result<UserProfile, PortError> {
        Ok(row_to_profile(self.repository.set_role(*id.as_uuid(), role).await?))
    }

    #[instrument(skip(self), fields(user = %id))]
    async fn set_verified(&self, id: UserId, verified: bool) -> Result<UserProfile, PortError> {
        Ok(row_to_profile(
            self.repository.set_verified(*id.as_uuid(), verified).await?,
        ))
    }
}

/// PostgreSQL-backed implementation of the AuditLogPort trait
#[derive(Debug, Clone)]
pub struct PostgresAuditLogAdapter {
    repository: AuditLogRepository,
}

impl PostgresAuditLogAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AuditLogRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresAuditLogAdapter {}

#[async_trait]
impl AuditLogPort for PostgresAuditLogAdapter {
    #[instrument(skip_all, fields(action = %entry.action))]
    async fn record(&self, entry: AuditLogEntry) -> Result<AuditLogEntry, PortError> {
        Ok(row_to_entry(self.repository.insert(&entry).await?))
    }

    #[instrument(skip(self, filter))]
    async fn list(
        &self,
        filter: AuditFilter,
        page: PageRequest,
    ) -> Result<Page<AuditLogEntry>, PortError> {
        let (rows, total) = self.repository.list(&filter, page).await?;
        Ok(Page::new(rows.into_iter().map(row_to_entry).collect(), total, page))
    }
}

fn row_to_profile(row: ProfileRow) -> UserProfile {
    UserProfile {
        id: UserId::from_uuid(row.id),
        email: row.email,
        name: row.name,
        role: row.role.into(),
        is_verified: row.is_verified,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn row_to_entry(row: AuditLogRow) -> AuditLogEntry {
    AuditLogEntry {
        id: AuditLogId::from_uuid(row.id),
        actor_id: UserId::from_uuid(row.actor_id),
        action: row.action.into(),
        target_type: row.target_type.into(),
        target_id: row.target_id,
        details: row.details,
        created_at: row.created_at,
    }
}
