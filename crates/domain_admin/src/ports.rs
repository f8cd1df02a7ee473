//! Administration Domain Ports
//!
//! [`ProfilePort`] stores user profiles and [`AuditLogPort`] the append-only
//! audit trail. PostgreSQL adapters live in `infra_db`.

use async_trait::async_trait;

use core_kernel::{DomainPort, Page, PageRequest, PortError, UserId};

use crate::audit::{AuditFilter, AuditLogEntry};
use crate::profile::{Role, UserFilter, UserProfile};

/// Storage operations for user profiles
#[async_trait]
pub trait ProfilePort: DomainPort {
    /// Retrieves a profile, or `PortError::NotFound`
    async fn get(&self, id: UserId) -> Result<UserProfile, PortError>;

    /// Inserts `profile` if no profile exists for its id
    ///
    /// An existing profile keeps its name, role and verification flag; only
    /// the email is refreshed. Returns the stored profile.
    async fn upsert(&self, profile: UserProfile) -> Result<UserProfile, PortError>;

    /// Lists profiles matching `filter`, newest first
    async fn list(&self, filter: UserFilter, page: PageRequest)
        -> Result<Page<UserProfile>, PortError>;

    async fn set_name(&self, id: UserId, name: String) -> Result<UserProfile, PortError>;

    async fn set_role(&self, id: UserId, role: Role) -> Result<UserProfile, PortError>;

    async fn set_verified(&self, id: UserId, verified: bool) -> Result<UserProfile, PortError>;
}

/// Storage operations for the audit trail
#[async_trait]
pub trait AuditLogPort: DomainPort {
    /// Appends an entry
    async fn record(&self, entry: AuditLogEntry) -> Result<AuditLogEntry, PortError>;

    /// Lists entries matching `filter`, newest first
    async fn list(&self, filter: AuditFilter, page: PageRequest)
        -> Result<Page<AuditLogEntry>, PortError>;
}

/// In-memory implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of ProfilePort
    #[derive(Debug, Clone, Default)]
    pub struct MockProfilePort {
        profiles: Arc<RwLock<HashMap<UserId, UserProfile>>>,
    }

    impl MockProfilePort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with profiles for testing
        pub async fn with_profiles(profiles: Vec<UserProfile>) -> Self {
            let port = Self::new();
            {
                let mut map = port.profiles.write().await;
                for profile in profiles {
                    map.insert(profile.id, profile);
                }
            }
            port
        }

        async fn modify(
            &self,
            id: UserId,
            f: impl FnOnce(&mut UserProfile) + Send,
        ) -> Result<UserProfile, PortError> {
            let mut profiles = self.profiles.write().await;
            let profile = profiles
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("UserProfile", id))?;
            f(profile);
            profile.updated_at = Utc::now();
            Ok(profile.clone())
        }
    }

    impl DomainPort for MockProfilePort {}

    #[async_trait]
    impl ProfilePort for MockProfilePort {
        async fn get(&self, id: UserId) -> Result<UserProfile, PortError> {
            self.profiles
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("UserProfile", id))
        }

        async fn upsert(&self, profile: UserProfile) -> Result<UserProfile, PortError> {
            let mut profiles = self.profiles.write().await;
            let stored = profiles
                .entry(profile.id)
                .and_modify(|existing| {
                    if existing.email != profile.email {
                        existing.email = profile.email.clone();
                        existing.updated_at = Utc::now();
                    }
                })
                .or_insert_with(|| profile.clone());
            Ok(stored.clone())
        }

        async fn list(
            &self,
            filter: UserFilter,
            page: PageRequest,
        ) -> Result<Page<UserProfile>, PortError> {
            let profiles = self.profiles.read().await;
            let mut matching: Vec<UserProfile> = profiles
                .values()
                .filter(|p| filter.matches(p))
                .cloned()
                .collect();
            matching.sort_by_key(|p| std::cmp::Reverse(p.created_at));
            Ok(page.slice(matching))
        }

        async fn set_name(&self, id: UserId, name: String) -> Result<UserProfile, PortError> {
            self.modify(id, move |p| p.name = name).await
        }

        async fn set_role(&self, id: UserId, role: Role) -> Result<UserProfile, PortError> {
            self.modify(id, move |p| p.role = role).await
        }

        async fn set_verified(&self, id: UserId, verified: bool) -> Result<UserProfile, PortError> {
            self.modify(id, move |p| p.is_verified = verified).await
        }
    }

    /// In-memory mock implementation of AuditLogPort
    #[derive(Debug, Clone, Default)]
    pub struct MockAuditLogPort {
        entries: Arc<RwLock<Vec<AuditLogEntry>>>,
    }

    impl MockAuditLogPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// All recorded entries in insertion order
        pub async fn entries(&self) -> Vec<AuditLogEntry> {
            self.entries.read().await.clone()
        }
    }

    impl DomainPort for MockAuditLogPort {}

    #[async_trait]
    impl AuditLogPort for MockAuditLogPort {
        async fn record(&self, entry: AuditLogEntry) -> Result<AuditLogEntry, PortError> {
            self.entries.write().await.push(entry.clone());
            Ok(entry)
        }

        async fn list(
            &self,
            filter: AuditFilter,
            page: PageRequest,
        ) -> Result<Page<AuditLogEntry>, PortError> {
            let entries = self.entries.read().await;
            let matching: Vec<AuditLogEntry> = entries
                .iter()
                .rev()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect();
            Ok(page.slice(matching))
        }
    }
}
