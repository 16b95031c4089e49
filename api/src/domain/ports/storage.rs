//! Storage port traits
//!
//! `Storage` is the persistence gateway: it owns translation between entities
//! and document-store operations and enforces every uniqueness constraint.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! Full-document replaces and partial-field patches are separate operations
//! so callers can rely on exactly which fields a call touches.

use async_trait::async_trait;

use crate::domain::entities::{Inventory, Order, OrderId, Pet, PetId, PetStatus, User, UserId};
use crate::error::DomainError;

/// Named document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Pets,
    Orders,
    Categories,
    Tags,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Pets,
        Collection::Orders,
        Collection::Categories,
        Collection::Tags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Pets => "pets",
            Collection::Orders => "orders",
            Collection::Categories => "categories",
            Collection::Tags => "tags",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence gateway for users, pets and orders
#[async_trait]
pub trait Storage: Send + Sync {
    // Users

    /// Insert a user. `Conflict` if the ID or the username is already taken.
    async fn create_user(&self, user: &User) -> Result<(), DomainError>;

    /// Validate every user for ID and username uniqueness, then insert them all.
    /// Nothing from the batch is inserted if any element conflicts.
    async fn create_many_users(&self, users: &[User]) -> Result<(), DomainError>;

    async fn retrieve_user_by_username(&self, username: &str) -> Result<User, DomainError>;

    async fn retrieve_user_by_id(&self, id: UserId) -> Result<User, DomainError>;

    /// Replace the whole document of the user currently named `username`.
    /// The replacement may carry a different username and ID.
    async fn update_user_by_username(
        &self,
        username: &str,
        user: &User,
    ) -> Result<User, DomainError>;

    async fn delete_user_by_username(&self, username: &str) -> Result<(), DomainError>;

    // Pets

    /// Insert a pet. `Conflict` if the ID is already taken.
    async fn create_pet(&self, pet: &Pet) -> Result<(), DomainError>;

    /// Validate every pet for ID uniqueness, then insert them all.
    async fn create_many_pets(&self, pets: &[Pet]) -> Result<(), DomainError>;

    /// Replace the whole document of the pet with `pet.id`
    async fn update_pet_by_id(&self, pet: &Pet) -> Result<(), DomainError>;

    async fn retrieve_pet_by_id(&self, id: PetId) -> Result<Pet, DomainError>;

    /// All pets whose status is one of `statuses`, in store order
    async fn find_pets_by_status(&self, statuses: &[PetStatus]) -> Result<Vec<Pet>, DomainError>;

    async fn update_pet_name_and_status_by_id(
        &self,
        id: PetId,
        name: &str,
        status: PetStatus,
    ) -> Result<(), DomainError>;

    async fn update_pet_name_by_id(&self, id: PetId, name: &str) -> Result<(), DomainError>;

    async fn update_pet_status_by_id(&self, id: PetId, status: PetStatus)
        -> Result<(), DomainError>;

    /// Add `url` to the pet's photo URLs with set semantics and return the
    /// refreshed pet
    async fn add_image_url_by_pet_id(&self, id: PetId, url: &str) -> Result<Pet, DomainError>;

    /// Count pets per status across the whole collection
    async fn retrieve_store_inventories_by_status(&self) -> Result<Inventory, DomainError>;

    async fn delete_pet_by_id(&self, id: PetId) -> Result<(), DomainError>;

    // Orders

    /// Insert an order. `Conflict` if the ID is already taken. The referenced
    /// pet is not checked.
    async fn create_order(&self, order: &Order) -> Result<Order, DomainError>;

    async fn retrieve_order_by_id(&self, id: OrderId) -> Result<Order, DomainError>;

    async fn delete_order_by_id(&self, id: OrderId) -> Result<(), DomainError>;
}

/// Administrative capability kept off the request-serving path
#[async_trait]
pub trait StorageAdmin: Send + Sync {
    /// Drop every document in `collection`
    async fn empty_collection(&self, collection: Collection) -> Result<(), DomainError>;
}
