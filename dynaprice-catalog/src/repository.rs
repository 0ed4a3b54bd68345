use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::order::Order;
use crate::product::Product;

/// Catalog lookup collaborator. Backed by whatever storage the embedding
/// application uses; the pricing engine only reads through it.
pub trait ProductCatalog {
    fn product_by_id(&self, id: Uuid) -> Option<Product>;
    fn all_products(&self) -> Vec<Product>;
}

/// Order history collaborator, queried for recent sales.
pub trait OrderHistory {
    fn recent_orders(&self, since: DateTime<Utc>) -> Vec<Order>;
}
