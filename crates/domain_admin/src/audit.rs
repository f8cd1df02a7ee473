//! Audit log of admin actions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use core_kernel::{AuditLogId, CoreError, UserId};

/// What an admin did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    RoleChanged,
    VerificationChanged,
    ReportRemoved,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::RoleChanged => "role_changed",
            AuditAction::VerificationChanged => "verification_changed",
            AuditAction::ReportRemoved => "report_removed",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "role_changed" => Ok(AuditAction::RoleChanged),
            "verification_changed" => Ok(AuditAction::VerificationChanged),
            "report_removed" => Ok(AuditAction::ReportRemoved),
            other => Err(CoreError::validation(format!("unknown audit action '{}'", other))),
        }
    }
}

/// Kind of record an audit entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    User,
    FoundItem,
    LostItem,
    ShareItem,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::User => "user",
            TargetType::FoundItem => "found_item",
            TargetType::LostItem => "lost_item",
            TargetType::ShareItem => "share_item",
        }
    }
}

impl FromStr for TargetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(TargetType::User),
            "found_item" => Ok(TargetType::FoundItem),
            "lost_item" => Ok(TargetType::LostItem),
            "share_item" => Ok(TargetType::ShareItem),
            other => Err(CoreError::validation(format!("unknown audit target '{}'", other))),
        }
    }
}

/// One append-only audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: AuditLogId,
    pub actor_id: UserId,
    pub action: AuditAction,
    pub target_type: TargetType,
    pub target_id: Uuid,
    /// Action-specific payload, e.g. `{"from": "user", "to": "moderator"}`
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(
        actor_id: UserId,
        action: AuditAction,
        target_type: TargetType,
        target_id: Uuid,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: AuditLogId::new_v7(),
            actor_id,
            action,
            target_type,
            target_id,
            details,
            created_at: Utc::now(),
        }
    }
}

/// Filter for audit log listings
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditFilter {
    pub actor_id: Option<UserId>,
    pub action: Option<AuditAction>,
}

impl AuditFilter {
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        self.actor_id.map_or(true, |id| id == entry.actor_id)
            && self.action.map_or(true, |a| a == entry.action)
    }
}
