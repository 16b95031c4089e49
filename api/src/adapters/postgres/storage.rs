//! PostgreSQL adapter for Storage
//!
//! Each collection is a table keyed by the domain ID. Pet photo URLs, tags and
//! category are embedded JSON documents.
//!
//! Uniqueness is checked with a probe before every insert so callers get a
//! precise `Conflict` message. The probe alone is racy, so the tables also
//! carry primary-key / unique constraints and a constraint violation raised
//! by the insert is reported as the same `Conflict`.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect, Set, SqlErr,
    TransactionTrait,
};

use crate::domain::entities::{
    order::to_stored_precision, Category, Inventory, Order, OrderId, Pet, PetId, PetStatus, Tag,
    User, UserId,
};
use crate::domain::ports::{Collection, Storage, StorageAdmin};
use crate::entity::{categories, orders, pets, tags, users};
use crate::error::DomainError;

/// PostgreSQL implementation of Storage
#[derive(Clone)]
pub struct PostgresStorage {
    db: DatabaseConnection,
    timeout: Duration,
}

impl PostgresStorage {
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    /// Run one store round trip under the configured deadline
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(classify),
            Err(_) => {
                tracing::warn!(op, timeout = ?self.timeout, "Store operation timed out");
                Err(DomainError::Timeout(format!(
                    "{} exceeded {}s",
                    op,
                    self.timeout.as_secs_f64()
                )))
            }
        }
    }

    async fn find_user(
        &self,
        op: &'static str,
        condition: impl sea_orm::sea_query::IntoCondition + Send,
    ) -> Result<Option<users::Model>, DomainError> {
        self.bounded(op, users::Entity::find().filter(condition).one(&self.db))
            .await
    }

    async fn ensure_user_absent(&self, user: &User) -> Result<(), DomainError> {
        if self
            .find_user("probe_user_id", users::Column::Id.eq(user.id.0))
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "duplicate user id exists for {}",
                user.id
            )));
        }
        if self
            .find_user("probe_username", users::Column::Username.eq(user.username.as_str()))
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "duplicate username exists for {}",
                user.username
            )));
        }
        Ok(())
    }

    async fn ensure_pet_absent(&self, id: PetId) -> Result<(), DomainError> {
        let existing = self
            .bounded("probe_pet_id", pets::Entity::find_by_id(id.0).one(&self.db))
            .await?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!(
                "duplicate pet id exists for {}",
                id
            )));
        }
        Ok(())
    }

    async fn patch_pet(
        &self,
        op: &'static str,
        id: PetId,
        update: sea_orm::UpdateMany<pets::Entity>,
    ) -> Result<(), DomainError> {
        let result = self
            .bounded(
                op,
                update.filter(pets::Column::Id.eq(id.0)).exec(&self.db),
            )
            .await?;

        if result.rows_affected == 0 {
            return Err(pet_not_found(id));
        }
        tracing::debug!(pet_id = %id, op, "Pet patched");
        Ok(())
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn create_user(&self, user: &User) -> Result<(), DomainError> {
        self.ensure_user_absent(user).await?;

        self.bounded(
            "create_user",
            users::Entity::insert(users::ActiveModel::from(user)).exec(&self.db),
        )
        .await?;

        tracing::debug!(user_id = %user.id, username = %user.username, "User created");
        Ok(())
    }

    async fn create_many_users(&self, users_batch: &[User]) -> Result<(), DomainError> {
        if users_batch.is_empty() {
            return Ok(());
        }

        let mut ids = HashSet::new();
        let mut usernames = HashSet::new();
        for user in users_batch {
            if !ids.insert(user.id) {
                return Err(DomainError::Conflict(format!(
                    "duplicate user id {} within batch",
                    user.id
                )));
            }
            if !usernames.insert(user.username.as_str()) {
                return Err(DomainError::Conflict(format!(
                    "duplicate username {} within batch",
                    user.username
                )));
            }
            self.ensure_user_absent(user).await?;
        }

        let models = users_batch.iter().map(users::ActiveModel::from);
        self.bounded(
            "create_many_users",
            users::Entity::insert_many(models).exec(&self.db),
        )
        .await?;

        tracing::debug!(count = users_batch.len(), "Users created");
        Ok(())
    }

    async fn retrieve_user_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.find_user(
            "retrieve_user_by_username",
            users::Column::Username.eq(username),
        )
        .await?
        .map(User::from)
        .ok_or_else(|| DomainError::NotFound(format!("user {}", username)))
    }

    async fn retrieve_user_by_id(&self, id: UserId) -> Result<User, DomainError> {
        self.find_user("retrieve_user_by_id", users::Column::Id.eq(id.0))
            .await?
            .map(User::from)
            .ok_or_else(|| DomainError::NotFound(format!("user {}", id)))
    }

    async fn update_user_by_username(
        &self,
        username: &str,
        user: &User,
    ) -> Result<User, DomainError> {
        let result = self
            .bounded(
                "update_user_by_username",
                users::Entity::update_many()
                    .set(users::ActiveModel::from(user))
                    .filter(users::Column::Username.eq(username))
                    .exec(&self.db),
            )
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("user {}", username)));
        }
        Ok(user.clone())
    }

    async fn delete_user_by_username(&self, username: &str) -> Result<(), DomainError> {
        let result = self
            .bounded(
                "delete_user_by_username",
                users::Entity::delete_many()
                    .filter(users::Column::Username.eq(username))
                    .exec(&self.db),
            )
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("user {}", username)));
        }
        Ok(())
    }

    async fn create_pet(&self, pet: &Pet) -> Result<(), DomainError> {
        self.ensure_pet_absent(pet.id).await?;

        let model = pet_active_model(pet)?;
        self.bounded("create_pet", pets::Entity::insert(model).exec(&self.db))
            .await?;

        tracing::debug!(pet_id = %pet.id, "Pet created");
        Ok(())
    }

    async fn create_many_pets(&self, pets_batch: &[Pet]) -> Result<(), DomainError> {
        if pets_batch.is_empty() {
            return Ok(());
        }

        let mut ids = HashSet::new();
        let mut models = Vec::with_capacity(pets_batch.len());
        for pet in pets_batch {
            if !ids.insert(pet.id) {
                return Err(DomainError::Conflict(format!(
                    "duplicate pet id {} within batch",
                    pet.id
                )));
            }
            self.ensure_pet_absent(pet.id).await?;
            models.push(pet_active_model(pet)?);
        }

        self.bounded(
            "create_many_pets",
            pets::Entity::insert_many(models).exec(&self.db),
        )
        .await?;

        tracing::debug!(count = pets_batch.len(), "Pets created");
        Ok(())
    }

    async fn update_pet_by_id(&self, pet: &Pet) -> Result<(), DomainError> {
        let update = pets::Entity::update_many().set(pet_active_model(pet)?);
        self.patch_pet("update_pet_by_id", pet.id, update).await
    }

    async fn retrieve_pet_by_id(&self, id: PetId) -> Result<Pet, DomainError> {
        let model = self
            .bounded(
                "retrieve_pet_by_id",
                pets::Entity::find_by_id(id.0).one(&self.db),
            )
            .await?
            .ok_or_else(|| pet_not_found(id))?;

        Pet::try_from(model)
    }

    async fn find_pets_by_status(&self, statuses: &[PetStatus]) -> Result<Vec<Pet>, DomainError> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let models = self
            .bounded(
                "find_pets_by_status",
                pets::Entity::find()
                    .filter(pets::Column::Status.is_in(statuses.iter().map(|s| s.as_str())))
                    .all(&self.db),
            )
            .await?;

        models.into_iter().map(Pet::try_from).collect()
    }

    async fn update_pet_name_and_status_by_id(
        &self,
        id: PetId,
        name: &str,
        status: PetStatus,
    ) -> Result<(), DomainError> {
        let update = pets::Entity::update_many()
            .col_expr(pets::Column::Name, Expr::value(name))
            .col_expr(pets::Column::Status, Expr::value(status.as_str()));
        self.patch_pet("update_pet_name_and_status_by_id", id, update)
            .await
    }

    async fn update_pet_name_by_id(&self, id: PetId, name: &str) -> Result<(), DomainError> {
        let update = pets::Entity::update_many().col_expr(pets::Column::Name, Expr::value(name));
        self.patch_pet("update_pet_name_by_id", id, update).await
    }

    async fn update_pet_status_by_id(
        &self,
        id: PetId,
        status: PetStatus,
    ) -> Result<(), DomainError> {
        let update = pets::Entity::update_many()
            .col_expr(pets::Column::Status, Expr::value(status.as_str()));
        self.patch_pet("update_pet_status_by_id", id, update).await
    }

    async fn add_image_url_by_pet_id(&self, id: PetId, url: &str) -> Result<Pet, DomainError> {
        // Row lock keeps the read-modify-write of photo_urls atomic.
        let txn = self.bounded("begin", self.db.begin()).await?;

        let model = self
            .bounded(
                "add_image_url_by_pet_id",
                pets::Entity::find_by_id(id.0).lock_exclusive().one(&txn),
            )
            .await?
            .ok_or_else(|| pet_not_found(id))?;

        let mut pet = Pet::try_from(model)?;
        if pet.add_photo_url(url) {
            let photo_urls = serde_json::Value::from(pet.photo_urls);
            self.bounded(
                "add_image_url_by_pet_id",
                pets::Entity::update_many()
                    .col_expr(pets::Column::PhotoUrls, Expr::value(photo_urls))
                    .filter(pets::Column::Id.eq(id.0))
                    .exec(&txn),
            )
            .await?;
        }

        self.bounded("commit", txn.commit()).await?;
        tracing::debug!(pet_id = %id, url, "Image URL recorded");

        self.retrieve_pet_by_id(id).await
    }

    async fn retrieve_store_inventories_by_status(&self) -> Result<Inventory, DomainError> {
        // Scans the whole pets collection on every call. Fine at catalogue
        // scale; a large store would need a maintained counter instead.
        let statuses: Vec<String> = self
            .bounded(
                "retrieve_store_inventories_by_status",
                pets::Entity::find()
                    .select_only()
                    .column(pets::Column::Status)
                    .into_tuple::<String>()
                    .all(&self.db),
            )
            .await?;

        Ok(statuses.into_iter().collect())
    }

    async fn delete_pet_by_id(&self, id: PetId) -> Result<(), DomainError> {
        let result = self
            .bounded(
                "delete_pet_by_id",
                pets::Entity::delete_by_id(id.0).exec(&self.db),
            )
            .await?;

        if result.rows_affected == 0 {
            return Err(pet_not_found(id));
        }
        Ok(())
    }

    async fn create_order(&self, order: &Order) -> Result<Order, DomainError> {
        let existing = self
            .bounded(
                "probe_order_id",
                orders::Entity::find_by_id(order.id.0).one(&self.db),
            )
            .await?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!(
                "duplicate order id exists for {}",
                order.id
            )));
        }

        self.bounded(
            "create_order",
            orders::Entity::insert(orders::ActiveModel::from(order)).exec(&self.db),
        )
        .await?;

        tracing::debug!(order_id = %order.id, pet_id = %order.pet_id, "Order placed");
        Ok(order.clone())
    }

    async fn retrieve_order_by_id(&self, id: OrderId) -> Result<Order, DomainError> {
        let model = self
            .bounded(
                "retrieve_order_by_id",
                orders::Entity::find_by_id(id.0).one(&self.db),
            )
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("order {}", id)))?;

        Order::try_from(model)
    }

    async fn delete_order_by_id(&self, id: OrderId) -> Result<(), DomainError> {
        let result = self
            .bounded(
                "delete_order_by_id",
                orders::Entity::delete_by_id(id.0).exec(&self.db),
            )
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("order {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdmin for PostgresStorage {
    async fn empty_collection(&self, collection: Collection) -> Result<(), DomainError> {
        let result = match collection {
            Collection::Users => {
                self.bounded(
                    "empty_collection",
                    users::Entity::delete_many().exec(&self.db),
                )
                .await?
            }
            Collection::Pets => {
                self.bounded("empty_collection", pets::Entity::delete_many().exec(&self.db))
                    .await?
            }
            Collection::Orders => {
                self.bounded(
                    "empty_collection",
                    orders::Entity::delete_many().exec(&self.db),
                )
                .await?
            }
            Collection::Categories => {
                self.bounded(
                    "empty_collection",
                    categories::Entity::delete_many().exec(&self.db),
                )
                .await?
            }
            Collection::Tags => {
                self.bounded("empty_collection", tags::Entity::delete_many().exec(&self.db))
                    .await?
            }
        };

        tracing::warn!(%collection, removed = result.rows_affected, "Collection emptied");
        Ok(())
    }
}

/// Map a store error onto the domain taxonomy
fn classify(e: DbErr) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
        return DomainError::Conflict(msg);
    }
    match e {
        DbErr::RecordNotFound(msg) => DomainError::NotFound(msg),
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => DomainError::Unavailable(e.to_string()),
        _ => DomainError::Database(e.to_string()),
    }
}

fn pet_not_found(id: PetId) -> DomainError {
    DomainError::NotFound(format!("pet {}", id))
}

fn corrupt(field: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::Database(format!("malformed stored {}: {}", field, e))
}

fn pet_active_model(pet: &Pet) -> Result<pets::ActiveModel, DomainError> {
    let category = pet
        .category
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    let tags = serde_json::to_value(&pet.tags).map_err(|e| DomainError::Internal(e.to_string()))?;

    Ok(pets::ActiveModel {
        id: Set(pet.id.0),
        category: Set(category),
        name: Set(pet.name.clone()),
        photo_urls: Set(serde_json::Value::from(pet.photo_urls.clone())),
        tags: Set(tags),
        status: Set(pet.status.to_string()),
    })
}

/// Convert SeaORM model to domain entity
impl TryFrom<pets::Model> for Pet {
    type Error = DomainError;

    fn try_from(model: pets::Model) -> Result<Self, Self::Error> {
        let category = model
            .category
            .filter(|c| !c.is_null())
            .map(serde_json::from_value::<Category>)
            .transpose()
            .map_err(|e| corrupt("category", e))?;
        let photo_urls: Vec<String> =
            serde_json::from_value(model.photo_urls).map_err(|e| corrupt("photo_urls", e))?;
        let tags: Vec<Tag> = serde_json::from_value(model.tags).map_err(|e| corrupt("tags", e))?;

        Ok(Pet {
            id: PetId(model.id),
            category,
            name: model.name,
            photo_urls,
            tags,
            status: model.status.parse().map_err(|e| corrupt("status", e))?,
        })
    }
}

/// Convert SeaORM model to domain entity
impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: UserId(model.id),
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            password: model.password,
            phone: model.phone,
            user_status: model.user_status,
        }
    }
}

impl From<&User> for users::ActiveModel {
    fn from(user: &User) -> Self {
        users::ActiveModel {
            id: Set(user.id.0),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            email: Set(user.email.clone()),
            password: Set(user.password.clone()),
            phone: Set(user.phone.clone()),
            user_status: Set(user.user_status),
        }
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<orders::Model> for Order {
    type Error = DomainError;

    fn try_from(model: orders::Model) -> Result<Self, Self::Error> {
        Ok(Order {
            id: OrderId(model.id),
            pet_id: PetId(model.pet_id),
            quantity: model.quantity,
            ship_date: model.ship_date.map(|dt| dt.with_timezone(&Utc)),
            status: model.status.parse().map_err(|e| corrupt("status", e))?,
            complete: model.complete,
        })
    }
}

impl From<&Order> for orders::ActiveModel {
    fn from(order: &Order) -> Self {
        orders::ActiveModel {
            id: Set(order.id.0),
            pet_id: Set(order.pet_id.0),
            quantity: Set(order.quantity),
            ship_date: Set(order
                .ship_date
                .map(|dt| to_stored_precision(dt).fixed_offset())),
            status: Set(order.status.to_string()),
            complete: Set(order.complete),
        }
    }
}
