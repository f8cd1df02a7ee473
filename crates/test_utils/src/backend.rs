//! In-memory backend
//!
//! Wires every domain port to its mock so service and HTTP tests can run
//! without a database. The claim store shares the found-item store, the
//! same way the PostgreSQL adapters share one database.

use std::sync::Arc;

use core_kernel::PortError;
use domain_admin::{
    AdminService, MockAuditLogPort, MockProfilePort, ProfilePort, ProfileService, Role,
    UserProfile,
};
use domain_claims::{ClaimService, MockClaimPort};
use domain_items::{FoundItem, ItemService, LostItem, MockItemPort, ShareItem};

/// Every mock port, cloneable handles onto shared state
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    pub found: MockItemPort<FoundItem>,
    pub lost: MockItemPort<LostItem>,
    pub share: MockItemPort<ShareItem>,
    pub claims: MockClaimPort,
    pub profiles: MockProfilePort,
    pub audit: MockAuditLogPort,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        let found = MockItemPort::new();
        Self {
            claims: MockClaimPort::new(found.clone()),
            found,
            lost: MockItemPort::new(),
            share: MockItemPort::new(),
            profiles: MockProfilePort::new(),
            audit: MockAuditLogPort::new(),
        }
    }

    pub fn found_service(&self) -> ItemService<FoundItem> {
        ItemService::new(Arc::new(self.found.clone()))
    }

    pub fn lost_service(&self) -> ItemService<LostItem> {
        ItemService::new(Arc::new(self.lost.clone()))
    }

    pub fn share_service(&self) -> ItemService<ShareItem> {
        ItemService::new(Arc::new(self.share.clone()))
    }

    pub fn claim_service(&self) -> ClaimService {
        ClaimService::new(Arc::new(self.claims.clone()), Arc::new(self.found.clone()))
    }

    pub fn profile_service(&self) -> ProfileService {
        ProfileService::new(Arc::new(self.profiles.clone()))
    }

    pub fn admin_service(&self) -> AdminService {
        AdminService::new(
            Arc::new(self.profiles.clone()),
            Arc::new(self.audit.clone()),
            self.claim_service(),
            self.found_service(),
            self.lost_service(),
            self.share_service(),
        )
    }

    /// Stores `profile`, then forces its role
    ///
    /// `upsert` never changes the role of an existing profile, so seeding
    /// goes through `set_role` afterwards.
    pub async fn seed_profile(&self, profile: UserProfile) -> Result<UserProfile, PortError> {
        let role = profile.role;
        let stored = self.profiles.upsert(profile).await?;
        if stored.role == role {
            return Ok(stored);
        }
        self.profiles.set_role(stored.id, role).await
    }

    /// Seeds a fresh profile with `role`
    pub async fn seed_role(&self, role: Role) -> Result<UserProfile, PortError> {
        self.seed_profile(crate::ProfileFixtures::with_role(role)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemFixtures;
    use core_kernel::PageRequest;
    use domain_claims::CreateClaimRequest;
    use domain_items::FoundItemStatus;

    #[tokio::test]
    async fn test_claim_approval_visible_through_item_service() {
        let backend = InMemoryBackend::new();
        let owner = backend.seed_role(Role::User).await.unwrap();
        let claimer = backend.seed_role(Role::User).await.unwrap();

        let item = backend
            .found_service()
            .report(owner.id, ItemFixtures::new_found_item())
            .await
            .unwrap();
        let claim = backend
            .claim_service()
            .create_claim(claimer.id, item.id, CreateClaimRequest::default())
            .await
            .unwrap();
        backend
            .claim_service()
            .update_status(claim.id, owner.id, domain_claims::ClaimStatus::Approved)
            .await
            .unwrap();

        let item = backend.found_service().get(item.id).await.unwrap();
        assert_eq!(item.status, FoundItemStatus::Claimed);
    }

    #[tokio::test]
    async fn test_seed_role_persists_role() {
        let backend = InMemoryBackend::new();
        let admin = backend.seed_role(Role::Admin).await.unwrap();

        let users = backend
            .admin_service()
            .list_users(admin.id, Default::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(users.total, 1);
        assert_eq!(users.items[0].role, Role::Admin);
    }
}
