//! Validated create/update payloads and list filters
//!
//! Updates are explicit per-kind structs: a `None` field is left untouched.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use core_kernel::UserId;

use crate::item::{ItemDetails, ItemRecord};

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        return Err(ValidationError::new("date_in_future"));
    }
    Ok(())
}

/// Partial update of the shared descriptive fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ItemDetailsUpdate {
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60), custom(function = "not_blank"))]
    pub category: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Payload for reporting a found item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewFoundItem {
    #[serde(flatten)]
    #[validate(nested)]
    pub details: ItemDetails,
    #[validate(custom(function = "not_in_future"))]
    pub date_found: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FoundItemUpdate {
    #[serde(flatten)]
    #[validate(nested)]
    pub details: ItemDetailsUpdate,
    #[validate(custom(function = "not_in_future"))]
    pub date_found: Option<NaiveDate>,
    pub status: Option<crate::FoundItemStatus>,
}

/// Payload for reporting a lost item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewLostItem {
    #[serde(flatten)]
    #[validate(nested)]
    pub details: ItemDetails,
    #[validate(custom(function = "not_in_future"))]
    pub date_lost: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LostItemUpdate {
    #[serde(flatten)]
    #[validate(nested)]
    pub details: ItemDetailsUpdate,
    #[validate(custom(function = "not_in_future"))]
    pub date_lost: Option<NaiveDate>,
    pub status: Option<crate::LostItemStatus>,
}

/// Payload for offering an item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewShareItem {
    #[serde(flatten)]
    #[validate(nested)]
    pub details: ItemDetails,
    #[validate(length(max = 200))]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ShareItemUpdate {
    #[serde(flatten)]
    #[validate(nested)]
    pub details: ItemDetailsUpdate,
    #[validate(length(max = 200))]
    pub condition: Option<String>,
    pub status: Option<crate::ShareItemStatus>,
}

/// Filter for item listings
#[derive(Debug, Clone)]
pub struct ItemFilter<S> {
    pub category: Option<String>,
    pub status: Option<S>,
    /// Free text matched against title and description
    pub search: Option<String>,
    pub owner_id: Option<UserId>,
}

impl<S> Default for ItemFilter<S> {
    fn default() -> Self {
        Self {
            category: None,
            status: None,
            search: None,
            owner_id: None,
        }
    }
}

impl<S: PartialEq + Copy> ItemFilter<S> {
    /// Creates a filter matching one owner's reports
    pub fn by_owner(owner_id: UserId) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: S) -> Self {
        self.status = Some(status);
        self
    }

    /// Evaluates the filter against one item; used by in-memory adapters
    pub fn matches<T: ItemRecord<Status = S>>(&self, item: &T) -> bool {
        if let Some(ref category) = self.category {
            if !item.details().category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if item.status() != status {
                return false;
            }
        }
        if let Some(ref search) = self.search {
            if !item.details().mentions(search) {
                return false;
            }
        }
        if let Some(owner_id) = self.owner_id {
            if item.owner_id() != owner_id {
                return false;
            }
        }
        true
    }
}
