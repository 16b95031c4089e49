//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They mirror the uniqueness and not-found behaviour of the PostgreSQL
//! adapter so services and handlers can be tested without a database.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::adapters::fs::file_extension;
use crate::domain::entities::{Inventory, Order, OrderId, Pet, PetId, PetStatus, User, UserId};
use crate::domain::ports::{Collection, ImageStore, Storage, StorageAdmin};
use crate::error::DomainError;

// ============================================================================
// In-Memory Storage
// ============================================================================

#[derive(Default)]
pub struct InMemoryStorage {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
    pets: Arc<RwLock<BTreeMap<PetId, Pet>>>,
    orders: Arc<RwLock<BTreeMap<OrderId, Order>>>,
    pub should_fail: Arc<RwLock<bool>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails as if the database were unreachable
    pub fn unavailable() -> Self {
        Self {
            should_fail: Arc::new(RwLock::new(true)),
            ..Self::default()
        }
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }

    /// Pre-populate with a pet for testing
    pub fn with_pet(self, pet: Pet) -> Self {
        self.pets.write().unwrap().insert(pet.id, pet);
        self
    }

    /// Pre-populate with an order for testing
    pub fn with_order(self, order: Order) -> Self {
        self.orders.write().unwrap().insert(order.id, order);
        self
    }

    pub fn user_count(&self) -> usize {
        self.users.read().unwrap().len()
    }

    pub fn pet_count(&self) -> usize {
        self.pets.read().unwrap().len()
    }

    pub fn order_count(&self) -> usize {
        self.orders.read().unwrap().len()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if *self.should_fail.read().unwrap() {
            return Err(DomainError::Unavailable("mock store is down".to_string()));
        }
        Ok(())
    }

    fn patch_pet<F>(&self, id: PetId, patch: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Pet),
    {
        self.check_available()?;
        let mut pets = self.pets.write().unwrap();
        let pet = pets
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound(format!("pet {}", id)))?;
        patch(pet);
        Ok(())
    }
}

fn user_conflict(users: &BTreeMap<UserId, User>, user: &User) -> Option<DomainError> {
    if users.contains_key(&user.id) {
        return Some(DomainError::Conflict(format!(
            "duplicate user id exists for {}",
            user.id
        )));
    }
    if users.values().any(|u| u.username == user.username) {
        return Some(DomainError::Conflict(format!(
            "duplicate username exists for {}",
            user.username
        )));
    }
    None
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user(&self, user: &User) -> Result<(), DomainError> {
        self.check_available()?;
        let mut users = self.users.write().unwrap();
        if let Some(conflict) = user_conflict(&users, user) {
            return Err(conflict);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn create_many_users(&self, batch: &[User]) -> Result<(), DomainError> {
        self.check_available()?;
        let mut users = self.users.write().unwrap();

        let mut ids = HashSet::new();
        let mut usernames = HashSet::new();
        for user in batch {
            if !ids.insert(user.id) || !usernames.insert(user.username.as_str()) {
                return Err(DomainError::Conflict(format!(
                    "duplicate user {} within batch",
                    user.username
                )));
            }
            if let Some(conflict) = user_conflict(&users, user) {
                return Err(conflict);
            }
        }

        for user in batch {
            users.insert(user.id, user.clone());
        }
        Ok(())
    }

    async fn retrieve_user_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.check_available()?;
        let users = self.users.read().unwrap();
        users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("user {}", username)))
    }

    async fn retrieve_user_by_id(&self, id: UserId) -> Result<User, DomainError> {
        self.check_available()?;
        let users = self.users.read().unwrap();
        users
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("user {}", id)))
    }

    async fn update_user_by_username(
        &self,
        username: &str,
        user: &User,
    ) -> Result<User, DomainError> {
        self.check_available()?;
        let mut users = self.users.write().unwrap();

        let current_id = users
            .values()
            .find(|u| u.username == username)
            .map(|u| u.id)
            .ok_or_else(|| DomainError::NotFound(format!("user {}", username)))?;

        let clashes = users
            .values()
            .filter(|u| u.id != current_id)
            .any(|u| u.id == user.id || u.username == user.username);
        if clashes {
            return Err(DomainError::Conflict(format!(
                "replacement for {} collides with another user",
                username
            )));
        }

        users.remove(&current_id);
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete_user_by_username(&self, username: &str) -> Result<(), DomainError> {
        self.check_available()?;
        let mut users = self.users.write().unwrap();
        let id = users
            .values()
            .find(|u| u.username == username)
            .map(|u| u.id)
            .ok_or_else(|| DomainError::NotFound(format!("user {}", username)))?;
        users.remove(&id);
        Ok(())
    }

    async fn create_pet(&self, pet: &Pet) -> Result<(), DomainError> {
        self.check_available()?;
        let mut pets = self.pets.write().unwrap();
        if pets.contains_key(&pet.id) {
            return Err(DomainError::Conflict(format!(
                "duplicate pet id exists for {}",
                pet.id
            )));
        }
        pets.insert(pet.id, pet.clone());
        Ok(())
    }

    async fn create_many_pets(&self, batch: &[Pet]) -> Result<(), DomainError> {
        self.check_available()?;
        let mut pets = self.pets.write().unwrap();

        let mut ids = HashSet::new();
        for pet in batch {
            if !ids.insert(pet.id) || pets.contains_key(&pet.id) {
                return Err(DomainError::Conflict(format!(
                    "duplicate pet id exists for {}",
                    pet.id
                )));
            }
        }

        for pet in batch {
            pets.insert(pet.id, pet.clone());
        }
        Ok(())
    }

    async fn update_pet_by_id(&self, pet: &Pet) -> Result<(), DomainError> {
        let replacement = pet.clone();
        self.patch_pet(pet.id, |stored| *stored = replacement)
    }

    async fn retrieve_pet_by_id(&self, id: PetId) -> Result<Pet, DomainError> {
        self.check_available()?;
        let pets = self.pets.read().unwrap();
        pets.get(&id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("pet {}", id)))
    }

    async fn find_pets_by_status(&self, statuses: &[PetStatus]) -> Result<Vec<Pet>, DomainError> {
        self.check_available()?;
        let pets = self.pets.read().unwrap();
        Ok(pets
            .values()
            .filter(|p| statuses.contains(&p.status))
            .cloned()
            .collect())
    }

    async fn update_pet_name_and_status_by_id(
        &self,
        id: PetId,
        name: &str,
        status: PetStatus,
    ) -> Result<(), DomainError> {
        self.patch_pet(id, |pet| {
            pet.name = name.to_string();
            pet.status = status;
        })
    }

    async fn update_pet_name_by_id(&self, id: PetId, name: &str) -> Result<(), DomainError> {
        self.patch_pet(id, |pet| pet.name = name.to_string())
    }

    async fn update_pet_status_by_id(
        &self,
        id: PetId,
        status: PetStatus,
    ) -> Result<(), DomainError> {
        self.patch_pet(id, |pet| pet.status = status)
    }

    async fn add_image_url_by_pet_id(&self, id: PetId, url: &str) -> Result<Pet, DomainError> {
        self.patch_pet(id, |pet| {
            pet.add_photo_url(url);
        })?;
        self.retrieve_pet_by_id(id).await
    }

    async fn retrieve_store_inventories_by_status(&self) -> Result<Inventory, DomainError> {
        self.check_available()?;
        let pets = self.pets.read().unwrap();
        Ok(pets.values().map(|p| p.status.as_str()).collect())
    }

    async fn delete_pet_by_id(&self, id: PetId) -> Result<(), DomainError> {
        self.check_available()?;
        let mut pets = self.pets.write().unwrap();
        pets.remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("pet {}", id)))
    }

    async fn create_order(&self, order: &Order) -> Result<Order, DomainError> {
        self.check_available()?;
        let mut orders = self.orders.write().unwrap();
        if orders.contains_key(&order.id) {
            return Err(DomainError::Conflict(format!(
                "duplicate order id exists for {}",
                order.id
            )));
        }
        orders.insert(order.id, order.clone());
        Ok(order.clone())
    }

    async fn retrieve_order_by_id(&self, id: OrderId) -> Result<Order, DomainError> {
        self.check_available()?;
        let orders = self.orders.read().unwrap();
        orders
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("order {}", id)))
    }

    async fn delete_order_by_id(&self, id: OrderId) -> Result<(), DomainError> {
        self.check_available()?;
        let mut orders = self.orders.write().unwrap();
        orders
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("order {}", id)))
    }
}

#[async_trait]
impl StorageAdmin for InMemoryStorage {
    async fn empty_collection(&self, collection: Collection) -> Result<(), DomainError> {
        self.check_available()?;
        match collection {
            Collection::Users => self.users.write().unwrap().clear(),
            Collection::Pets => self.pets.write().unwrap().clear(),
            Collection::Orders => self.orders.write().unwrap().clear(),
            // Categories and tags only exist embedded in pets here
            Collection::Categories | Collection::Tags => {}
        }
        Ok(())
    }
}

// ============================================================================
// Mock Image Store
// ============================================================================

/// Records uploads in memory and hands out sequential filenames
#[derive(Default)]
pub struct MockImageStore {
    pub saved: Arc<RwLock<Vec<(String, Vec<u8>)>>>,
    pub should_fail: Arc<RwLock<bool>>,
    /// Name returned for every save instead of a fresh one
    pub fixed_name: Option<String>,
}

impl MockImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: Arc::new(RwLock::new(true)),
            ..Self::default()
        }
    }

    /// Every save lands on the same filename, so repeated uploads share a URL
    pub fn with_fixed_name(name: impl Into<String>) -> Self {
        Self {
            fixed_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn saved_count(&self) -> usize {
        self.saved.read().unwrap().len()
    }
}

#[async_trait]
impl ImageStore for MockImageStore {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, DomainError> {
        if *self.should_fail.read().unwrap() {
            return Err(DomainError::Internal("mock disk is full".to_string()));
        }
        let extension = file_extension(original_name)?;

        let mut saved = self.saved.write().unwrap();
        let filename = match &self.fixed_name {
            Some(name) => name.clone(),
            None => format!("{}.{}", saved.len() + 1, extension),
        };
        saved.push((filename.clone(), bytes.to_vec()));
        Ok(filename)
    }
}
