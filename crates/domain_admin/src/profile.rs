//! User profiles and roles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use core_kernel::{CoreError, UserId};

/// Access level of a user
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    /// Moderators and admins
    pub fn can_moderate(&self) -> bool {
        *self >= Role::Moderator
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::validation(format!("unknown role '{}'", other))),
        }
    }
}

/// A user's profile
///
/// Keyed by the user id carried in the auth token. Created on first sight
/// with the `user` role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    /// Display name; defaults to the local part of the email
    pub name: String,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Builds a fresh profile for a newly seen user
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        let email = email.into();
        let name = email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .unwrap_or("user")
            .to_string();
        let now = Utc::now();
        Self {
            id,
            email,
            name,
            role: Role::User,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Self-service profile changes
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}

/// Filter for user listings
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub is_verified: Option<bool>,
    /// Case-insensitive match on email or name
    pub search: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, profile: &UserProfile) -> bool {
        if self.role.is_some_and(|r| r != profile.role) {
            return false;
        }
        if self.is_verified.is_some_and(|v| v != profile.is_verified) {
            return false;
        }
        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                profile.email.to_lowercase().contains(&needle)
                    || profile.name.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(!Role::User.can_moderate());
        assert!(Role::Moderator.can_moderate());
        assert!(Role::Admin.can_moderate());
        assert!(!Role::Moderator.is_admin());
    }

    #[test]
    fn test_new_profile_defaults() {
        let profile = UserProfile::new(UserId::new(), "jdoe@campus.edu");
        assert_eq!(profile.name, "jdoe");
        assert_eq!(profile.role, Role::User);
        assert!(!profile.is_verified);
    }

    #[test]
    fn test_blank_name_rejected() {
        let update = ProfileUpdate {
            name: Some(String::new()),
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_filter_search() {
        let profile = UserProfile::new(UserId::new(), "Alex.Kim@campus.edu");
        let filter = UserFilter {
            search: Some("alex".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&profile));
        assert!(!UserFilter {
            role: Some(Role::Admin),
            ..Default::default()
        }
        .matches(&profile));
    }
}
