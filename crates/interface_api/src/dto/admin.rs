//! Admin DTOs

use serde::Deserialize;
use uuid::Uuid;

use core_kernel::UserId;
use domain_admin::{AuditAction, AuditFilter, Role, UserFilter};

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct SetVerificationRequest {
    pub verified: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
    pub verified: Option<bool>,
    pub search: Option<String>,
}

impl From<UserListQuery> for UserFilter {
    fn from(query: UserListQuery) -> Self {
        UserFilter {
            role: query.role,
            is_verified: query.verified,
            search: query.search.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditLogQuery {
    pub actor_id: Option<Uuid>,
    pub action: Option<AuditAction>,
}

impl From<AuditLogQuery> for AuditFilter {
    fn from(query: AuditLogQuery) -> Self {
        AuditFilter {
            actor_id: query.actor_id.map(UserId::from_uuid),
            action: query.action,
        }
    }
}
