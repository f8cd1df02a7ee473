//! Item Domain Ports
//!
//! [`ItemPort`] is the storage interface for one item kind. The PostgreSQL
//! adapter lives in `infra_db`; an in-memory [`mock::MockItemPort`] is
//! available under the `mock` feature for tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_items::{FoundItem, ItemPort, ItemService};
//! use std::sync::Arc;
//!
//! let port: Arc<dyn ItemPort<FoundItem>> = Arc::new(PostgresItemAdapter::new(pool));
//! let service = ItemService::new(port);
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, Page, PageRequest, PortError};

use crate::dto::ItemFilter;
use crate::error::ItemError;
use crate::item::ItemRecord;

/// Storage operations for one item kind
///
/// Ownership rules are enforced by [`crate::ItemService`], not here. The
/// status transition rule is re-checked by `update` against the stored copy
/// while it is locked, so concurrent status changes cannot leave a terminal
/// state.
#[async_trait]
pub trait ItemPort<T: ItemRecord>: DomainPort {
    /// Persists a newly built report
    async fn create(&self, item: T) -> Result<T, PortError>;

    /// Retrieves a report by ID, or `PortError::NotFound`
    async fn get(&self, id: T::Id) -> Result<T, PortError>;

    /// Lists reports matching `filter`, newest first
    async fn list(
        &self,
        filter: ItemFilter<T::Status>,
        page: PageRequest,
    ) -> Result<Page<T>, PortError>;

    /// Applies a partial update and returns the stored result
    ///
    /// # Errors
    ///
    /// - `ItemError::InvalidState` if the stored status does not allow the change
    /// - `ItemError::Storage` with `PortError::NotFound` if the report vanished
    async fn update(&self, id: T::Id, update: T::Update) -> Result<T, ItemError>;

    /// Removes a report
    async fn delete(&self, id: T::Id) -> Result<(), PortError>;
}

/// Mock implementation of ItemPort for testing
///
/// Stores items in memory. Clones share the same underlying map, so a test
/// can hand one clone to a service and inspect state through another.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of ItemPort
    #[derive(Debug)]
    pub struct MockItemPort<T: ItemRecord> {
        items: Arc<RwLock<HashMap<T::Id, T>>>,
    }

    impl<T: ItemRecord> Clone for MockItemPort<T> {
        fn clone(&self) -> Self {
            Self {
                items: Arc::clone(&self.items),
            }
        }
    }

    impl<T: ItemRecord> Default for MockItemPort<T> {
        fn default() -> Self {
            Self {
                items: Arc::new(RwLock::new(HashMap::new())),
            }
        }
    }

    impl<T: ItemRecord> MockItemPort<T> {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with items for testing
        pub async fn with_items(items: Vec<T>) -> Self {
            let port = Self::new();
            for item in items {
                port.items.write().await.insert(item.id(), item);
            }
            port
        }

        /// Returns the current stored copy of an item
        pub async fn snapshot(&self, id: T::Id) -> Option<T> {
            self.items.read().await.get(&id).cloned()
        }

        /// Mutates a stored item in place
        ///
        /// Used by other in-memory adapters that cascade writes onto items.
        pub async fn modify(
            &self,
            id: T::Id,
            f: impl FnOnce(&mut T) + Send,
        ) -> Result<T, PortError> {
            let mut items = self.items.write().await;
            let item = items
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found(T::KIND.entity_name(), id))?;
            f(item);
            Ok(item.clone())
        }
    }

    impl<T: ItemRecord> DomainPort for MockItemPort<T> {}

    #[async_trait]
    impl<T: ItemRecord> ItemPort<T> for MockItemPort<T> {
        async fn create(&self, item: T) -> Result<T, PortError> {
            self.items.write().await.insert(item.id(), item.clone());
            Ok(item)
        }

        async fn get(&self, id: T::Id) -> Result<T, PortError> {
            self.snapshot(id)
                .await
                .ok_or_else(|| PortError::not_found(T::KIND.entity_name(), id))
        }

        async fn list(
            &self,
            filter: ItemFilter<T::Status>,
            page: PageRequest,
        ) -> Result<Page<T>, PortError> {
            let items = self.items.read().await;
            let mut matching: Vec<T> = items
                .values()
                .filter(|item| filter.matches(*item))
                .cloned()
                .collect();
            matching.sort_by_key(|item| std::cmp::Reverse(item.created_at()));
            Ok(page.slice(matching))
        }

        async fn update(&self, id: T::Id, update: T::Update) -> Result<T, ItemError> {
            let mut items = self.items.write().await;
            let item = items
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found(T::KIND.entity_name(), id))?;
            item.check_update(&update)?;
            item.apply_update(update);
            Ok(item.clone())
        }

        async fn delete(&self, id: T::Id) -> Result<(), PortError> {
            self.items
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found(T::KIND.entity_name(), id))
        }
    }
}
