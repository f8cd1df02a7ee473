//! Property-Based Test Generators
//!
//! Proptest strategies for statuses, roles and valid report payloads.

use proptest::prelude::*;

use domain_admin::Role;
use domain_claims::ClaimStatus;
use domain_items::{FoundItemStatus, ItemDetails, LostItemStatus, ShareItemStatus};

use crate::fixtures::CATEGORIES;

pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop_oneof![
        Just(ClaimStatus::Pending),
        Just(ClaimStatus::Approved),
        Just(ClaimStatus::Rejected),
    ]
}

pub fn found_status_strategy() -> impl Strategy<Value = FoundItemStatus> {
    prop_oneof![
        Just(FoundItemStatus::Available),
        Just(FoundItemStatus::Claimed),
        Just(FoundItemStatus::Resolved),
    ]
}

pub fn lost_status_strategy() -> impl Strategy<Value = LostItemStatus> {
    prop_oneof![Just(LostItemStatus::Missing), Just(LostItemStatus::Recovered)]
}

pub fn share_status_strategy() -> impl Strategy<Value = ShareItemStatus> {
    prop_oneof![
        Just(ShareItemStatus::Available),
        Just(ShareItemStatus::Reserved),
        Just(ShareItemStatus::Given),
    ]
}

pub fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Moderator), Just(Role::Admin)]
}

/// Titles that pass validation: 1..=120 chars, not blank
pub fn title_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ]{0,119}"
}

/// Valid report details
pub fn item_details_strategy() -> impl Strategy<Value = ItemDetails> {
    (
        title_strategy(),
        proptest::option::of("[a-z ]{0,200}"),
        proptest::sample::select(CATEGORIES),
        proptest::option::of("[A-Za-z ]{1,60}"),
    )
        .prop_map(|(title, description, category, location)| ItemDetails {
            title,
            description,
            category: category.to_string(),
            location,
            image_url: None,
        })
}
