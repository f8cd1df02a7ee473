//! Core Kernel - Foundational types shared by every lost-and-found crate
//!
//! This crate provides the building blocks used across all domain modules:
//! - Strongly-typed identifiers for users, items, claims and audit entries
//! - Pagination requests and pages
//! - Port error and marker traits for the hexagonal architecture

pub mod identifiers;
pub mod pagination;
pub mod ports;
pub mod error;

pub use identifiers::{
    UserId, FoundItemId, LostItemId, ShareItemId, ClaimId, AuditLogId,
};
pub use pagination::{Page, PageRequest};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::{CoreError, ErrorKind};
