//! Delivery orders placed by NPCs.

use serde::Serialize;

use super::{Collection, Extra};

/// Reward paid out when an order is delivered.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OrderReward {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coins: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sfl: Option<f64>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// A delivery order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: String,

    /// NPC requesting the delivery
    pub from: String,

    /// Item name to quantity, in document order
    pub items: Collection<f64>,

    pub reward: OrderReward,
    pub created_at: f64,
    pub ready_at: f64,
    pub completed_at: Option<f64>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Order {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
