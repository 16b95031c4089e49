//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services validate inputs and delegate persistence to the `Storage` port.

pub mod pet_service;
pub mod store_service;
pub mod user_service;

pub use pet_service::PetService;
pub use store_service::StoreService;
pub use user_service::UserService;
