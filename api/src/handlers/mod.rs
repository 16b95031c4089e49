//! HTTP handlers
//!
//! Axum request handlers for the API endpoints. Every handler is generic
//! over the storage and image-store adapters held in `AppState`.

pub mod pets;
pub mod store;
pub mod users;

pub use pets::{
    add_pet, delete_pet, find_pets_by_status, get_pet, update_pet, update_pet_with_form,
    upload_image,
};
pub use store::{delete_order, get_inventory, get_order, place_order};
pub use users::{
    create_user, create_users_with_array, create_users_with_list, delete_user, get_user, login,
    logout, update_user,
};
