//! Item report service
//!
//! Wraps an [`ItemPort`] with validation and the ownership rule: only the
//! user who filed a report may change or remove it.

use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use core_kernel::{Page, PageRequest, UserId};

use crate::dto::ItemFilter;
use crate::error::ItemError;
use crate::item::ItemRecord;
use crate::ports::ItemPort;

/// Service for filing and maintaining item reports of kind `T`
pub struct ItemService<T: ItemRecord> {
    port: Arc<dyn ItemPort<T>>,
}

impl<T: ItemRecord> Clone for ItemService<T> {
    fn clone(&self) -> Self {
        Self {
            port: Arc::clone(&self.port),
        }
    }
}

impl<T: ItemRecord> ItemService<T> {
    pub fn new(port: Arc<dyn ItemPort<T>>) -> Self {
        Self { port }
    }

    /// Returns the underlying port, for services that read items directly
    pub fn port(&self) -> Arc<dyn ItemPort<T>> {
        Arc::clone(&self.port)
    }

    /// Files a new report owned by `owner_id`
    ///
    /// # Errors
    ///
    /// Returns `ItemError::Validation` if the payload fails validation
    #[instrument(skip_all, fields(kind = T::KIND.as_str(), owner = %owner_id))]
    pub async fn report(&self, owner_id: UserId, new: T::New) -> Result<T, ItemError> {
        new.validate()?;
        let item = self.port.create(T::from_new(owner_id, new)).await?;
        info!(item_id = %item.id(), "Item reported");
        Ok(item)
    }

    /// Retrieves a report by ID
    pub async fn get(&self, id: T::Id) -> Result<T, ItemError> {
        self.port
            .get(id)
            .await
            .map_err(|e| ItemError::from_lookup(e, T::KIND.entity_name(), id))
    }

    /// Lists reports matching `filter`
    pub async fn list(
        &self,
        filter: ItemFilter<T::Status>,
        page: PageRequest,
    ) -> Result<Page<T>, ItemError> {
        Ok(self.port.list(filter, page).await?)
    }

    /// Updates a report on behalf of `actor`
    ///
    /// # Errors
    ///
    /// - `ItemError::Validation` for a malformed payload
    /// - `ItemError::NotFound` if the report does not exist
    /// - `ItemError::Forbidden` if `actor` did not file the report
    /// - `ItemError::InvalidState` for an illegal status change
    #[instrument(skip_all, fields(kind = T::KIND.as_str(), item_id = %id, actor = %actor))]
    pub async fn update(&self, actor: UserId, id: T::Id, update: T::Update) -> Result<T, ItemError> {
        update.validate()?;
        let current = self.get(id).await?;
        ensure_owner(&current, actor)?;
        current.check_update(&update)?;

        let updated = self.port.update(id, update).await?;
        info!(status = %updated.status(), "Item updated");
        Ok(updated)
    }

    /// Deletes a report on behalf of its owner
    #[instrument(skip_all, fields(kind = T::KIND.as_str(), item_id = %id, actor = %actor))]
    pub async fn delete(&self, actor: UserId, id: T::Id) -> Result<(), ItemError> {
        let current = self.get(id).await?;
        ensure_owner(&current, actor)?;
        self.port.delete(id).await?;
        info!("Item deleted");
        Ok(())
    }

    /// Removes a report regardless of owner
    ///
    /// Callers must have checked moderator rights. Returns the removed item
    /// so the caller can record what was taken down.
    #[instrument(skip_all, fields(kind = T::KIND.as_str(), item_id = %id))]
    pub async fn remove(&self, id: T::Id) -> Result<T, ItemError> {
        let current = self.get(id).await?;
        self.port.delete(id).await?;
        info!(owner = %current.owner_id(), "Item removed by moderator");
        Ok(current)
    }
}

fn ensure_owner<T: ItemRecord>(item: &T, actor: UserId) -> Result<(), ItemError> {
    if item.owner_id() != actor {
        return Err(ItemError::Forbidden(format!(
            "only the reporter may modify {} {}",
            T::KIND.entity_name(),
            item.id()
        )));
    }
    Ok(())
}
