//! Item report DTOs

use serde::Deserialize;
use uuid::Uuid;

use core_kernel::UserId;
use domain_items::{ItemFilter, ItemRecord};

use crate::error::ApiError;

/// Query string for item listings
#[derive(Debug, Default, Deserialize)]
pub struct ItemListQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub owner_id: Option<Uuid>,
}

impl ItemListQuery {
    /// Builds the domain filter, parsing `status` for item kind `T`
    pub fn into_filter<T: ItemRecord>(self) -> Result<ItemFilter<T::Status>, ApiError> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<T::Status>)
            .transpose()?;
        Ok(ItemFilter {
            category: non_empty(self.category),
            status,
            search: non_empty(self.search),
            owner_id: self.owner_id.map(UserId::from_uuid),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_items::{FoundItem, FoundItemStatus};

    #[test]
    fn test_into_filter_parses_status() {
        let query = ItemListQuery {
            status: Some("claimed".to_string()),
            search: Some("  ".to_string()),
            ..Default::default()
        };
        let filter = query.into_filter::<FoundItem>().unwrap();
        assert_eq!(filter.status, Some(FoundItemStatus::Claimed));
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_unknown_status_is_bad_request() {
        let query = ItemListQuery {
            status: Some("missing".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            query.into_filter::<FoundItem>(),
            Err(ApiError::BadRequest(_))
        ));
    }
}
