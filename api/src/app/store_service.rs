//! Store service
//!
//! Orders and the per-status pet inventory.

use std::sync::Arc;

use crate::domain::entities::{Inventory, Order, OrderId};
use crate::domain::ports::Storage;
use crate::error::DomainError;

pub struct StoreService<S>
where
    S: Storage,
{
    storage: Arc<S>,
}

impl<S> StoreService<S>
where
    S: Storage,
{
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub async fn get_inventories_by_status(&self) -> Result<Inventory, DomainError> {
        self.storage.retrieve_store_inventories_by_status().await
    }

    /// Place an order. The referenced pet is not required to exist.
    pub async fn place_order(&self, order: &Order) -> Result<Order, DomainError> {
        let placed = self.storage.create_order(order).await?;
        tracing::info!(order_id = %placed.id, pet_id = %placed.pet_id, "Order placed");
        Ok(placed)
    }

    pub async fn find_order_by_id(&self, id: OrderId) -> Result<Order, DomainError> {
        self.storage.retrieve_order_by_id(id).await
    }

    pub async fn delete_order_by_id(&self, id: OrderId) -> Result<(), DomainError> {
        self.storage.delete_order_by_id(id).await
    }
}
