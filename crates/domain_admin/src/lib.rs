//! Administration Domain
//!
//! User profiles and the moderation surface built on them.
//!
//! # Roles
//!
//! | role        | may                                                        |
//! |-------------|------------------------------------------------------------|
//! | `user`      | manage their own profile and reports                       |
//! | `moderator` | list users, verify users, list all claims, remove reports  |
//! | `admin`     | everything a moderator may, plus role changes and audit log |
//!
//! An actor's role is always read from the profile store. Every successful
//! admin mutation appends an [`AuditLogEntry`].

pub mod profile;
pub mod audit;
pub mod error;
pub mod ports;
pub mod service;

pub use profile::{ProfileUpdate, Role, UserFilter, UserProfile};
pub use audit::{AuditAction, AuditFilter, AuditLogEntry, TargetType};
pub use error::AdminError;
pub use ports::{AuditLogPort, ProfilePort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockAuditLogPort, MockProfilePort};
pub use service::{AdminService, ProfileService, RemovedReport};
