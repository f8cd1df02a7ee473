//! Item report aggregates

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use validator::Validate;

use core_kernel::{CoreError, FoundItemId, LostItemId, ShareItemId, UserId};

use crate::dto::{
    ItemDetailsUpdate, NewFoundItem, FoundItemUpdate, NewLostItem, LostItemUpdate,
    NewShareItem, ShareItemUpdate, not_blank,
};
use crate::status::{transition_error, FoundItemStatus, LostItemStatus, ShareItemStatus};

/// The three kinds of item report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Found,
    Lost,
    Share,
}

impl ItemKind {
    /// Entity name used in errors and audit records
    pub fn entity_name(&self) -> &'static str {
        match self {
            ItemKind::Found => "FoundItem",
            ItemKind::Lost => "LostItem",
            ItemKind::Share => "ShareItem",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Found => "found",
            ItemKind::Lost => "lost",
            ItemKind::Share => "share",
        }
    }
}

impl FromStr for ItemKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "found" | "found-items" => Ok(ItemKind::Found),
            "lost" | "lost-items" => Ok(ItemKind::Lost),
            "share" | "share-items" => Ok(ItemKind::Share),
            other => Err(CoreError::validation(format!("unknown item kind '{}'", other))),
        }
    }
}

/// Descriptive fields shared by every item report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ItemDetails {
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60), custom(function = "not_blank"))]
    pub category: String,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl ItemDetails {
    fn apply(&mut self, update: ItemDetailsUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(location) = update.location {
            self.location = Some(location);
        }
        if let Some(image_url) = update.image_url {
            self.image_url = Some(image_url);
        }
    }

    /// Case-insensitive match of `needle` against title and description
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }
}

/// Behaviour shared by every item report kind
///
/// Lets one service, one port trait and one set of HTTP handlers serve
/// found, lost and shared items.
pub trait ItemRecord: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static;
    type Status: Copy
        + Eq
        + fmt::Debug
        + fmt::Display
        + FromStr<Err = CoreError>
        + Send
        + Sync
        + 'static;
    type New: Validate + DeserializeOwned + fmt::Debug + Send + Sync + 'static;
    type Update: Validate + DeserializeOwned + fmt::Debug + Send + Sync + 'static;

    const KIND: ItemKind;

    /// Builds a fresh report owned by `owner_id`
    fn from_new(owner_id: UserId, new: Self::New) -> Self;

    fn id(&self) -> Self::Id;

    fn owner_id(&self) -> UserId;

    fn status(&self) -> Self::Status;

    fn details(&self) -> &ItemDetails;

    fn created_at(&self) -> DateTime<Utc>;

    /// Rejects updates that would make an illegal status move
    fn check_update(&self, update: &Self::Update) -> Result<(), CoreError>;

    /// Applies an already-checked update in place
    fn apply_update(&mut self, update: Self::Update);
}

/// A found item report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundItem {
    pub id: FoundItemId,
    pub owner_id: UserId,
    #[serde(flatten)]
    pub details: ItemDetails,
    pub date_found: NaiveDate,
    pub status: FoundItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ItemRecord for FoundItem {
    type Id = FoundItemId;
    type Status = FoundItemStatus;
    type New = NewFoundItem;
    type Update = FoundItemUpdate;

    const KIND: ItemKind = ItemKind::Found;

    fn from_new(owner_id: UserId, new: NewFoundItem) -> Self {
        let now = Utc::now();
        Self {
            id: FoundItemId::new_v7(),
            owner_id,
            details: new.details,
            date_found: new.date_found,
            status: FoundItemStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> FoundItemId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn status(&self) -> FoundItemStatus {
        self.status
    }

    fn details(&self) -> &ItemDetails {
        &self.details
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn check_update(&self, update: &FoundItemUpdate) -> Result<(), CoreError> {
        match update.status {
            Some(target) if !self.status.can_transition_to(target) => {
                Err(transition_error(self.status, target))
            }
            _ => Ok(()),
        }
    }

    fn apply_update(&mut self, update: FoundItemUpdate) {
        self.details.apply(update.details);
        if let Some(date_found) = update.date_found {
            self.date_found = date_found;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// A lost item report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LostItem {
    pub id: LostItemId,
    pub owner_id: UserId,
    #[serde(flatten)]
    pub details: ItemDetails,
    pub date_lost: NaiveDate,
    pub status: LostItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ItemRecord for LostItem {
    type Id = LostItemId;
    type Status = LostItemStatus;
    type New = NewLostItem;
    type Update = LostItemUpdate;

    const KIND: ItemKind = ItemKind::Lost;

    fn from_new(owner_id: UserId, new: NewLostItem) -> Self {
        let now = Utc::now();
        Self {
            id: LostItemId::new_v7(),
            owner_id,
            details: new.details,
            date_lost: new.date_lost,
            status: LostItemStatus::Missing,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> LostItemId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn status(&self) -> LostItemStatus {
        self.status
    }

    fn details(&self) -> &ItemDetails {
        &self.details
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn check_update(&self, update: &LostItemUpdate) -> Result<(), CoreError> {
        match update.status {
            Some(target) if !self.status.can_transition_to(target) => {
                Err(transition_error(self.status, target))
            }
            _ => Ok(()),
        }
    }

    fn apply_update(&mut self, update: LostItemUpdate) {
        self.details.apply(update.details);
        if let Some(date_lost) = update.date_lost {
            self.date_lost = date_lost;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// An item offered to the community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareItem {
    pub id: ShareItemId,
    pub owner_id: UserId,
    #[serde(flatten)]
    pub details: ItemDetails,
    /// Free-form condition note ("like new", "missing a cap")
    pub condition: Option<String>,
    pub status: ShareItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ItemRecord for ShareItem {
    type Id = ShareItemId;
    type Status = ShareItemStatus;
    type New = NewShareItem;
    type Update = ShareItemUpdate;

    const KIND: ItemKind = ItemKind::Share;

    fn from_new(owner_id: UserId, new: NewShareItem) -> Self {
        let now = Utc::now();
        Self {
            id: ShareItemId::new_v7(),
            owner_id,
            details: new.details,
            condition: new.condition,
            status: ShareItemStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> ShareItemId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn status(&self) -> ShareItemStatus {
        self.status
    }

    fn details(&self) -> &ItemDetails {
        &self.details
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn check_update(&self, update: &ShareItemUpdate) -> Result<(), CoreError> {
        match update.status {
            Some(target) if !self.status.can_transition_to(target) => {
                Err(transition_error(self.status, target))
            }
            _ => Ok(()),
        }
    }

    fn apply_update(&mut self, update: ShareItemUpdate) {
        self.details.apply(update.details);
        if let Some(condition) = update.condition {
            self.condition = Some(condition);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> ItemDetails {
        ItemDetails {
            title: "Blue umbrella".to_string(),
            description: Some("Left in the library foyer".to_string()),
            category: "accessories".to_string(),
            location: Some("Main library".to_string()),
            image_url: None,
        }
    }

    #[test]
    fn test_found_item_starts_available() {
        let owner = UserId::new();
        let item = FoundItem::from_new(
            owner,
            NewFoundItem {
                details: details(),
                date_found: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            },
        );
        assert_eq!(item.status, FoundItemStatus::Available);
        assert_eq!(item.owner_id, owner);
    }

    #[test]
    fn test_found_item_rejects_reopening_resolved() {
        let mut item = FoundItem::from_new(
            UserId::new(),
            NewFoundItem {
                details: details(),
                date_found: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            },
        );
        item.status = FoundItemStatus::Resolved;

        let update = FoundItemUpdate {
            status: Some(FoundItemStatus::Available),
            ..Default::default()
        };
        assert!(item.check_update(&update).is_err());
    }

    #[test]
    fn test_apply_update_keeps_unset_fields() {
        let mut item = FoundItem::from_new(
            UserId::new(),
            NewFoundItem {
                details: details(),
                date_found: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            },
        );
        item.apply_update(FoundItemUpdate {
            details: ItemDetailsUpdate {
                title: Some("Navy umbrella".to_string()),
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(item.details.title, "Navy umbrella");
        assert_eq!(item.details.category, "accessories");
    }

    #[test]
    fn test_mentions_is_case_insensitive() {
        let d = details();
        assert!(d.mentions("UMBRELLA"));
        assert!(d.mentions("foyer"));
        assert!(!d.mentions("wallet"));
    }

    #[test]
    fn test_item_serializes_flat() {
        let item = LostItem::from_new(
            UserId::new(),
            NewLostItem {
                details: details(),
                date_lost: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            },
        );
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["title"], "Blue umbrella");
        assert_eq!(json["status"], "missing");
    }

    #[test]
    fn test_item_kind_parsing() {
        assert_eq!("found".parse::<ItemKind>().unwrap(), ItemKind::Found);
        assert_eq!("share-items".parse::<ItemKind>().unwrap(), ItemKind::Share);
        assert!("stolen".parse::<ItemKind>().is_err());
    }
}
