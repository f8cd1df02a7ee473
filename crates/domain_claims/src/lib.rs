//! Found-Item Claims Domain
//!
//! A claim is a user's assertion that a found item is theirs. The user who
//! reported the item decides it.
//!
//! # Claim Lifecycle
//!
//! ```text
//! pending --approve--> approved   (item becomes "claimed", sibling claims rejected)
//! pending --reject---> rejected
//! pending --delete---> removed    (claimant only)
//! ```
//!
//! Approved and rejected are terminal.

pub mod claim;
pub mod dto;
pub mod error;
pub mod ports;
pub mod service;

pub use claim::{ClaimStatus, ClaimView, FoundItemClaim, FoundItemSummary};
pub use dto::{ClaimQuery, CreateClaimRequest};
pub use error::ClaimError;
pub use ports::ClaimPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockClaimPort;
pub use service::ClaimService;
