//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::{
    Category, Order, OrderId, OrderStatus, Pet, PetId, PetStatus, Tag, User, UserId,
};

static NEXT_ID: AtomicI64 = AtomicI64::new(1_000);

/// Process-wide unique ID so fixtures never collide across tests
pub fn next_id() -> i64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Create a test user with default values
pub fn test_user() -> User {
    test_user_named("username")
}

/// Create a test user with a specific username
pub fn test_user_named(username: &str) -> User {
    User::new(UserId(next_id()), username)
        .with_name("first", "last")
        .with_contact(format!("{}@test.com", username), "123")
        .with_password("password")
}

/// Create a test pet with default values
pub fn test_pet() -> Pet {
    test_pet_with_status(PetStatus::Available)
}

/// Create a test pet with a specific status
pub fn test_pet_with_status(status: PetStatus) -> Pet {
    let id = next_id();
    Pet::new(PetId(id), format!("cat {}", id), status)
        .with_category(Category::new(1, "cat"))
        .with_tags(vec![Tag::new(1, "orange")])
}

/// Create a placed, incomplete order for `pet_id`
pub fn test_order(pet_id: PetId) -> Order {
    Order::new(
        OrderId(next_id()),
        pet_id,
        1,
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .map(|dt| dt + Duration::microseconds(250_125)),
        OrderStatus::Placed,
        false,
    )
}
