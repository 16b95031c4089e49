//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod category;
pub mod inventory;
pub mod order;
pub mod pet;
pub mod tag;
pub mod user;

pub use category::Category;
pub use inventory::Inventory;
pub use order::{Order, OrderId, OrderStatus};
pub use pet::{Pet, PetId, PetStatus};
pub use tag::Tag;
pub use user::{User, UserId};
