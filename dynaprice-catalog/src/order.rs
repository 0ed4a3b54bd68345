use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Line item on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: f64,
}

/// A placed order, as the pricing engine sees it. Fulfillment state,
/// discounts and shipping live in the order subsystem and are not needed
/// for price analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub placed_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.unit_price * i.quantity as f64)
            .sum()
    }

    /// Units of a given product on this order.
    pub fn units_of(&self, product_id: Uuid) -> u32 {
        self.items
            .iter()
            .filter(|i| i.product_id == product_id)
            .map(|i| i.quantity)
            .sum()
    }
}

/// Total units of `product_id` sold across `orders` placed at or after
/// `since`.
pub fn units_sold(orders: &[Order], product_id: Uuid, since: DateTime<Utc>) -> u32 {
    orders
        .iter()
        .filter(|o| o.placed_at >= since)
        .map(|o| o.units_of(product_id))
        .sum()
}
