use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A competitor price observation supplied by the caller. How these are
/// acquired (feeds, manual entry) is outside the engine's scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorPrice {
    pub competitor_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub recorded_at: DateTime<Utc>,
    pub is_available: bool,
}

/// Average of available competitor prices in a category
/// (case-insensitive). `None` when there is no usable observation, so
/// callers never divide by zero.
pub fn average_category_price(prices: &[CompetitorPrice], category: &str) -> Option<f64> {
    let relevant: Vec<f64> = prices
        .iter()
        .filter(|cp| cp.is_available && cp.category.eq_ignore_ascii_case(category))
        .map(|cp| cp.price)
        .collect();
    if relevant.is_empty() {
        return None;
    }
    Some(relevant.iter().sum::<f64>() / relevant.len() as f64)
}
