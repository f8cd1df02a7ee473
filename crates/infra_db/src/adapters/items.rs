//! PostgreSQL item adapter
//!
//! One generic adapter implements `ItemPort<T>` for every item kind that has
//! an [`ItemTable`] mapping.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{DomainPort, Page, PageRequest, PortError};
use domain_items::{ItemError, ItemFilter, ItemPort};

use crate::repositories::items::{ItemRepository, ItemTable, UpdateOutcome};

/// PostgreSQL-backed implementation of `ItemPort<T>`
#[derive(Debug)]
pub struct PostgresItemAdapter<T: ItemTable> {
    repository: ItemRepository<T>,
}

impl<T: ItemTable> Clone for PostgresItemAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<T: ItemTable> PostgresItemAdapter<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ItemRepository::new(pool),
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &ItemRepository<T> {
        &self.repository
    }
}

impl<T: ItemTable> DomainPort for PostgresItemAdapter<T> {}

#[async_trait]
impl<T: ItemTable> ItemPort<T> for PostgresItemAdapter<T> {
    #[instrument(skip_all, fields(table = T::TABLE))]
    async fn create(&self, item: T) -> Result<T, PortError> {
        Ok(self.repository.insert(&item).await?)
    }

    #[instrument(skip_all, fields(table = T::TABLE, id = %id))]
    async fn get(&self, id: T::Id) -> Result<T, PortError> {
        Ok(self.repository.get_by_id(T::uuid(id)).await?)
    }

    #[instrument(skip_all, fields(table = T::TABLE))]
    async fn list(
        &self,
        filter: ItemFilter<T::Status>,
        page: PageRequest,
    ) -> Result<Page<T>, PortError> {
        let (items, total) = self.repository.list(&filter, page).await?;
        Ok(Page::new(items, total, page))
    }

    #[instrument(skip_all, fields(table = T::TABLE, id = %id))]
    async fn update(&self, id: T::Id, update: T::Update) -> Result<T, ItemError> {
        let outcome = self
            .repository
            .update(T::uuid(id), update)
            .await
            .map_err(PortError::from)?;
        match outcome {
            UpdateOutcome::Updated(item) => Ok(item),
            UpdateOutcome::Missing => Err(PortError::not_found(T::KIND.entity_name(), id).into()),
            UpdateOutcome::Rejected(rejection) => Err(rejection.into()),
        }
    }

    #[instrument(skip_all, fields(table = T::TABLE, id = %id))]
    async fn delete(&self, id: T::Id) -> Result<(), PortError> {
        Ok(self.repository.delete(T::uuid(id)).await?)
    }
}
