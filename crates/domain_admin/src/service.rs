//! Profile and administration services

use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{FoundItemId, LostItemId, Page, PageRequest, ShareItemId, UserId};
use domain_claims::{ClaimQuery, ClaimService, ClaimStatus, ClaimView};
use domain_items::{FoundItem, ItemKind, ItemRecord, ItemService, LostItem, ShareItem};

use crate::audit::{AuditAction, AuditFilter, AuditLogEntry, TargetType};
use crate::error::AdminError;
use crate::ports::{AuditLogPort, ProfilePort};
use crate::profile::{ProfileUpdate, Role, UserFilter, UserProfile};

/// Self-service profile operations
#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfilePort>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfilePort>) -> Self {
        Self { profiles }
    }

    /// Returns the caller's profile, creating it on first sight
    #[instrument(skip_all, fields(user = %user))]
    pub async fn me(&self, user: UserId, email: &str) -> Result<UserProfile, AdminError> {
        Ok(self.profiles.upsert(UserProfile::new(user, email)).await?)
    }

    /// Applies a self-service update to the caller's profile
    #[instrument(skip_all, fields(user = %user))]
    pub async fn update_me(
        &self,
        user: UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AdminError> {
        update.validate()?;
        let current = self.get(user).await?;
        match update.name {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(AdminError::Validation("name must not be blank".to_string()));
                }
                Ok(self.profiles.set_name(user, name).await?)
            }
            None => Ok(current),
        }
    }

    async fn get(&self, user: UserId) -> Result<UserProfile, AdminError> {
        self.profiles.get(user).await.map_err(|e| {
            if e.is_not_found() {
                AdminError::profile_not_found(user)
            } else {
                e.into()
            }
        })
    }
}

/// What a moderator took down
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovedReport {
    pub kind: ItemKind,
    pub id: Uuid,
    pub owner_id: UserId,
    pub title: String,
}

/// Role-gated moderation operations
///
/// Every method takes the acting user and checks their stored role first.
#[derive(Clone)]
pub struct AdminService {
    profiles: Arc<dyn ProfilePort>,
    audit: Arc<dyn AuditLogPort>,
    claims: ClaimService,
    found: ItemService<FoundItem>,
    lost: ItemService<LostItem>,
    share: ItemService<ShareItem>,
}

impl AdminService {
    pub fn new(
        profiles: Arc<dyn ProfilePort>,
        audit: Arc<dyn AuditLogPort>,
        claims: ClaimService,
        found: ItemService<FoundItem>,
        lost: ItemService<LostItem>,
        share: ItemService<ShareItem>,
    ) -> Self {
        Self {
            profiles,
            audit,
            claims,
            found,
            lost,
            share,
        }
    }

    /// Lists users (moderator+)
    pub async fn list_users(
        &self,
        actor: UserId,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, AdminError> {
        self.require(actor, Role::Moderator).await?;
        Ok(self.profiles.list(filter, page).await?)
    }

    /// Changes a user's role (admin only)
    ///
    /// # Errors
    ///
    /// - `AdminError::Forbidden` if `actor` is not an admin, or targets themself
    /// - `AdminError::NotFound` if the target has no profile
    #[instrument(skip_all, fields(actor = %actor, target = %target, role = %role))]
    pub async fn set_role(
        &self,
        actor: UserId,
        target: UserId,
        role: Role,
    ) -> Result<UserProfile, AdminError> {
        self.require(actor, Role::Admin).await?;
        if actor == target {
            return Err(AdminError::Forbidden(
                "admins cannot change their own role".to_string(),
            ));
        }

        let before = self.profile(target).await?;
        let updated = self.profiles.set_role(target, role).await?;
        info!(from = %before.role, "Role changed");

        self.record(AuditLogEntry::new(
            actor,
            AuditAction::RoleChanged,
            TargetType::User,
            *target.as_uuid(),
            json!({ "from": before.role, "to": role }),
        ))
        .await;
        Ok(updated)
    }

    /// Sets a user's verification flag (moderator+)
    #[instrument(skip_all, fields(actor = %actor, target = %target, verified = verified))]
    pub async fn set_verified(
        &self,
        actor: UserId,
        target: UserId,
        verified: bool,
    ) -> Result<UserProfile, AdminError> {
        self.require(actor, Role::Moderator).await?;

        let before = self.profile(target).await?;
        let updated = self.profiles.set_verified(target, verified).await?;
        info!("Verification changed");

        self.record(AuditLogEntry::new(
            actor,
            AuditAction::VerificationChanged,
            TargetType::User,
            *target.as_uuid(),
            json!({ "from": before.is_verified, "to": verified }),
        ))
        .await;
        Ok(updated)
    }

    /// Lists every claim, optionally by status (moderator+)
    pub async fn list_claims(
        &self,
        actor: UserId,
        status: Option<ClaimStatus>,
        page: PageRequest,
    ) -> Result<Page<ClaimView>, AdminError> {
        self.require(actor, Role::Moderator).await?;
        Ok(self
            .claims
            .all_claims(ClaimQuery::default().with_status(status), page)
            .await?)
    }

    /// Removes an item report of any owner (moderator+)
    #[instrument(skip_all, fields(actor = %actor, kind = kind.as_str(), item_id = %id))]
    pub async fn remove_report(
        &self,
        actor: UserId,
        kind: ItemKind,
        id: Uuid,
    ) -> Result<RemovedReport, AdminError> {
        self.require(actor, Role::Moderator).await?;

        let (owner_id, title, target_type) = match kind {
            ItemKind::Found => {
                let item = self.found.remove(FoundItemId::from_uuid(id)).await?;
                (item.owner_id(), item.details().title.clone(), TargetType::FoundItem)
            }
            ItemKind::Lost => {
                let item = self.lost.remove(LostItemId::from_uuid(id)).await?;
                (item.owner_id(), item.details().title.clone(), TargetType::LostItem)
            }
            ItemKind::Share => {
                let item = self.share.remove(ShareItemId::from_uuid(id)).await?;
                (item.owner_id(), item.details().title.clone(), TargetType::ShareItem)
            }
        };

        self.record(AuditLogEntry::new(
            actor,
            AuditAction::ReportRemoved,
            target_type,
            id,
            json!({ "owner_id": owner_id, "title": title }),
        ))
        .await;

        Ok(RemovedReport {
            kind,
            id,
            owner_id,
            title,
        })
    }

    /// Lists audit log entries (admin only)
    pub async fn list_audit_logs(
        &self,
        actor: UserId,
        filter: AuditFilter,
        page: PageRequest,
    ) -> Result<Page<AuditLogEntry>, AdminError> {
        self.require(actor, Role::Admin).await?;
        Ok(self.audit.list(filter, page).await?)
    }

    /// Checks that `actor` holds at least `minimum`
    ///
    /// A user without a profile is treated as a plain user.
    async fn require(&self, actor: UserId, minimum: Role) -> Result<Role, AdminError> {
        let role = match self.profiles.get(actor).await {
            Ok(profile) => profile.role,
            Err(e) if e.is_not_found() => Role::User,
            Err(e) => return Err(e.into()),
        };
        if role < minimum {
            warn!(actor = %actor, role = %role, required = %minimum, "Insufficient role");
            return Err(AdminError::Forbidden(format!("requires {} role", minimum)));
        }
        Ok(role)
    }

    async fn profile(&self, id: UserId) -> Result<UserProfile, AdminError> {
        self.profiles.get(id).await.map_err(|e| {
            if e.is_not_found() {
                AdminError::profile_not_found(id)
            } else {
                e.into()
            }
        })
    }

    /// Appends an audit entry for a mutation that already succeeded
    ///
    /// A failed write is logged, not returned, so the caller still sees the
    /// committed change.
    async fn record(&self, entry: AuditLogEntry) {
        let action = entry.action;
        if let Err(e) = self.audit.record(entry).await {
            error!(error = %e, action = %action, "Failed to write audit log entry");
        }
    }
}
