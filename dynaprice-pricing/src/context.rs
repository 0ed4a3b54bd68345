use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dynaprice_catalog::{units_sold, CompetitorPrice, CustomerSegment, Order, Product};

/// Context for a single pricing calculation.
///
/// The timestamp is injected rather than read from the wall clock inside
/// the signals, so a fixed context always produces the same
/// recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingContext {
    pub timestamp: DateTime<Utc>,

    /// Demand multiplier, 1.0 = neutral.
    pub demand_factor: f64,

    /// Fraction of warehouse capacity currently stocked (0.0 - 1.0+).
    pub inventory_level: f64,

    pub is_seasonal_period: bool,

    /// Season label ("holiday", "christmas", "black_friday",
    /// "summer_sale", "back_to_school"); anything else is neutral.
    pub season: String,

    pub customer_segment: Option<CustomerSegment>,

    /// Loyalty discount fraction (0 - 1).
    pub loyalty_discount: f64,

    /// Competitor observations relevant to this calculation.
    pub competitor_prices: Vec<CompetitorPrice>,
}

impl Default for PricingContext {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            demand_factor: 1.0,
            inventory_level: 0.5,
            is_seasonal_period: false,
            season: String::new(),
            customer_segment: None,
            loyalty_discount: 0.0,
            competitor_prices: Vec::new(),
        }
    }
}

impl PricingContext {
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_demand_factor(mut self, demand_factor: f64) -> Self {
        self.demand_factor = demand_factor;
        self
    }

    pub fn with_inventory_level(mut self, inventory_level: f64) -> Self {
        self.inventory_level = inventory_level;
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = season.into();
        self.is_seasonal_period = true;
        self
    }

    pub fn with_segment(mut self, segment: CustomerSegment) -> Self {
        self.customer_segment = Some(segment);
        self
    }

    pub fn with_loyalty_discount(mut self, discount: f64) -> Self {
        self.loyalty_discount = discount;
        self
    }

    pub fn with_competitor_prices(mut self, prices: Vec<CompetitorPrice>) -> Self {
        self.competitor_prices = prices;
        self
    }
}

/// Demand factor observed from sales since `since`, blended with stock
/// pressure: sales normalize to 0.5-2.0 (10 units sold over the window =
/// neutral), stock pressure to 0.1-2.0 (lower stock = higher pressure).
/// The cutoff is injected like the context timestamp, never read from
/// the wall clock.
pub fn observed_demand_factor(product: &Product, orders: &[Order], since: DateTime<Utc>) -> f64 {
    let sold = units_sold(orders, product.id, since);

    let sales_factor = (sold as f64 / 10.0).clamp(0.5, 2.0);
    let stock_pressure = (50.0 / product.stock.max(1) as f64).clamp(0.1, 2.0);

    (sales_factor + stock_pressure) / 2.0
}
