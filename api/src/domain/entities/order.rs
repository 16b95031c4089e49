//! Order domain entity
//!
//! An order references a pet by ID only. The referenced pet is never checked
//! for existence.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::PetId;

/// Numeric identifier for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Placed,
    Approved,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Approved => "approved",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "placed" => Ok(OrderStatus::Placed),
            "approved" => Ok(OrderStatus::Approved),
            "delivered" => Ok(OrderStatus::Delivered),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

/// A purchase order for a pet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub pet_id: PetId,
    #[serde(default)]
    pub quantity: i32,
    #[serde(
        default,
        deserialize_with = "deserialize_ship_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub ship_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub complete: bool,
}

impl Order {
    pub fn new(
        id: impl Into<OrderId>,
        pet_id: impl Into<PetId>,
        quantity: i32,
        ship_date: Option<DateTime<Utc>>,
        status: OrderStatus,
        complete: bool,
    ) -> Self {
        Self {
            id: id.into(),
            pet_id: pet_id.into(),
            quantity,
            ship_date: ship_date.map(to_stored_precision),
            status,
            complete,
        }
    }
}

/// Ship dates keep microseconds, the finest precision the store holds
pub fn to_stored_precision(date: DateTime<Utc>) -> DateTime<Utc> {
    date.trunc_subsecs(6)
}

fn deserialize_ship_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DateTime<Utc>>::deserialize(deserializer)?.map(to_stored_precision))
}
