//! Item Report Domain
//!
//! This crate manages the three kinds of item report users file:
//!
//! - **Found items**: something picked up on campus, waiting for its owner.
//!   These are the only reports that can be claimed (see `domain_claims`).
//! - **Lost items**: something a user is looking for.
//! - **Share items**: something a user gives away to the community.
//!
//! All three share the same ownership rule: only the reporting user may
//! update or delete a report. The kinds differ in their dates and status
//! lifecycles, which are captured by the [`ItemRecord`] trait so a single
//! generic [`ItemService`] and [`ItemPort`] serve all of them.

pub mod item;
pub mod status;
pub mod dto;
pub mod error;
pub mod ports;
pub mod service;

pub use item::{ItemDetails, ItemKind, ItemRecord, FoundItem, LostItem, ShareItem};
pub use status::{FoundItemStatus, LostItemStatus, ShareItemStatus};
pub use dto::{
    ItemDetailsUpdate, ItemFilter,
    NewFoundItem, FoundItemUpdate,
    NewLostItem, LostItemUpdate,
    NewShareItem, ShareItemUpdate,
};
pub use error::ItemError;
pub use ports::ItemPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockItemPort;
pub use service::ItemService;
