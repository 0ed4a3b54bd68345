use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use dynaprice_catalog::{average_category_price, CustomerSegment, Product};

use crate::bounds;
use crate::context::PricingContext;

/// Candidate price produced by one signal, with the reasoning behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalQuote {
    pub strategy: String,
    pub price: f64,
    pub reason: String,
}

/// One independent pricing computation. Implementations are pure: same
/// product and context in, same quote out. Every quote is already
/// clamped into the product's price corridor and rounded to cents.
pub trait PricingSignal: Send + Sync {
    fn name(&self) -> &'static str;
    fn quote(&self, product: &Product, ctx: &PricingContext) -> SignalQuote;
}

fn bounded(product: &Product, price: f64) -> f64 {
    bounds::enforce(price, product.min_price, product.max_price)
}

/// Cost plus a configurable markup percentage.
#[derive(Debug, Clone)]
pub struct CostPlusSignal {
    pub markup_pct: f64,
}

impl Default for CostPlusSignal {
    fn default() -> Self {
        Self { markup_pct: 50.0 }
    }
}

impl PricingSignal for CostPlusSignal {
    fn name(&self) -> &'static str {
        "cost_plus"
    }

    fn quote(&self, product: &Product, _ctx: &PricingContext) -> SignalQuote {
        let price = product.cost * (1.0 + self.markup_pct / 100.0);
        SignalQuote {
            strategy: self.name().to_string(),
            price: bounded(product, price),
            reason: format!(
                "Cost (${:.2}) plus {:.0}% markup",
                product.cost, self.markup_pct
            ),
        }
    }
}

/// Prices 5% below the category's average competitor price, never below
/// a 10% margin over cost.
#[derive(Debug, Clone, Default)]
pub struct CompetitorSignal;

impl PricingSignal for CompetitorSignal {
    fn name(&self) -> &'static str {
        "competitor"
    }

    fn quote(&self, product: &Product, ctx: &PricingContext) -> SignalQuote {
        let avg = match average_category_price(&ctx.competitor_prices, &product.category) {
            Some(avg) => avg,
            None => {
                return SignalQuote {
                    strategy: self.name().to_string(),
                    price: bounded(product, product.base_price),
                    reason: "No competitor data available, using base price".to_string(),
                };
            }
        };

        let target = avg * 0.95;
        let margin_floor = product.cost * 1.1;
        let (price, reason) = if target < margin_floor {
            (
                margin_floor,
                "Price adjusted to maintain minimum margin".to_string(),
            )
        } else {
            (
                target,
                format!("Priced 5% below average competitor price (${:.2})", avg),
            )
        };

        SignalQuote {
            strategy: self.name().to_string(),
            price: bounded(product, price),
            reason,
        }
    }
}

/// Scales the base price by the demand factor, with scarcity and
/// clearance adjustments from the inventory level.
#[derive(Debug, Clone, Default)]
pub struct DemandSignal;

impl PricingSignal for DemandSignal {
    fn name(&self) -> &'static str {
        "demand"
    }

    fn quote(&self, product: &Product, ctx: &PricingContext) -> SignalQuote {
        let mut price = product.base_price * ctx.demand_factor;
        let mut reason = if ctx.inventory_level < 0.2 {
            price *= 1.1;
            format!(
                "Demand {:.2}x with low inventory - premium pricing",
                ctx.demand_factor
            )
        } else if ctx.inventory_level > 0.8 {
            price *= 0.9;
            format!(
                "Demand {:.2}x with high inventory - clearance pricing",
                ctx.demand_factor
            )
        } else {
            format!("Demand-adjusted pricing (factor: {:.2}x)", ctx.demand_factor)
        };

        let margin_floor = product.cost * 1.05;
        if price < margin_floor {
            price = margin_floor;
            reason.push_str(" - adjusted to maintain minimum margin");
        }

        SignalQuote {
            strategy: self.name().to_string(),
            price: bounded(product, price),
            reason,
        }
    }
}

/// Perceived-value pricing: customer segment, brand strength, rating and
/// loyalty discount.
#[derive(Debug, Clone, Default)]
pub struct ValueSignal;

fn segment_multiplier(segment: Option<CustomerSegment>) -> f64 {
    match segment {
        Some(CustomerSegment::Vip) => 1.20,
        Some(CustomerSegment::Premium) => 1.15,
        Some(CustomerSegment::Regular) => 1.00,
        Some(CustomerSegment::New) => 0.95,
        Some(CustomerSegment::Churned) | Some(CustomerSegment::AtRisk) => 0.90,
        None => 1.0,
    }
}

fn brand_multiplier(brand: &str) -> f64 {
    match brand.to_ascii_lowercase().as_str() {
        "apple" | "samsung" | "nike" | "sony" => 1.10,
        "premium" | "luxury" => 1.15,
        _ => 1.0,
    }
}

fn rating_multiplier(rating: f64) -> f64 {
    if rating >= 4.5 {
        1.05
    } else if rating >= 4.0 {
        1.02
    } else if rating >= 3.5 {
        1.00
    } else {
        0.95
    }
}

impl PricingSignal for ValueSignal {
    fn name(&self) -> &'static str {
        "value"
    }

    fn quote(&self, product: &Product, ctx: &PricingContext) -> SignalQuote {
        let segment = segment_multiplier(ctx.customer_segment);
        let brand = brand_multiplier(&product.brand);
        let rating = rating_multiplier(product.rating);

        let mut price = product.base_price * segment * brand * rating;
        let reason = if ctx.loyalty_discount > 0.0 {
            price *= 1.0 - ctx.loyalty_discount;
            format!(
                "Value-based pricing with {:.0}% loyalty discount",
                ctx.loyalty_discount * 100.0
            )
        } else {
            format!(
                "Value-based pricing (segment: {:.2}x, brand: {:.2}x, rating: {:.2}x)",
                segment, brand, rating
            )
        };

        SignalQuote {
            strategy: self.name().to_string(),
            price: bounded(product, price),
            reason,
        }
    }
}

/// Fixed-date holidays plus Thanksgiving (the Thursday falling between
/// Nov 22 and 28).
pub fn is_holiday(ts: DateTime<Utc>) -> bool {
    match (ts.month(), ts.day()) {
        (12, 25) | (12, 31) | (1, 1) | (7, 4) => true,
        (11, 22..=28) => ts.weekday() == Weekday::Thu,
        _ => false,
    }
}

/// Composable time-of-day multiplier: weekend premium, evening peak,
/// holiday premium. Shared by the time signal and the time-based rule.
pub fn time_multiplier(ts: DateTime<Utc>) -> f64 {
    let mut multiplier = 1.0;
    if matches!(ts.weekday(), Weekday::Sat | Weekday::Sun) {
        multiplier *= 1.1;
    }
    if (18..=21).contains(&ts.hour()) {
        multiplier *= 1.05;
    }
    if is_holiday(ts) {
        multiplier *= 1.15;
    }
    multiplier
}

/// Time-of-day / calendar pricing over the base price.
#[derive(Debug, Clone, Default)]
pub struct TimeSignal;

impl PricingSignal for TimeSignal {
    fn name(&self) -> &'static str {
        "time"
    }

    fn quote(&self, product: &Product, ctx: &PricingContext) -> SignalQuote {
        let multiplier = time_multiplier(ctx.timestamp);
        SignalQuote {
            strategy: self.name().to_string(),
            price: bounded(product, product.base_price * multiplier),
            reason: format!("Time-of-day multiplier {:.2}x", multiplier),
        }
    }
}

/// Category seasonality table keyed by month. Categories without a table
/// are neutral.
pub fn seasonal_multiplier(category: &str, month: u32) -> f64 {
    match category.to_ascii_lowercase().as_str() {
        "clothing" => match month {
            3..=5 => 1.1,
            6..=8 => 0.9,
            9..=11 => 1.2,
            _ => 1.3,
        },
        "toys" => match month {
            11 | 12 => 1.5,
            6..=8 => 1.2,
            _ => 0.8,
        },
        "sports" => match month {
            3..=5 => 1.3,
            6..=8 => 1.4,
            9..=11 => 1.2,
            _ => 0.9,
        },
        "home & garden" => match month {
            3..=5 => 1.4,
            6..=8 => 1.2,
            _ => 0.8,
        },
        _ => 1.0,
    }
}

/// Seasonal pricing: category table for the current month, scaled by the
/// product's own seasonality factor.
#[derive(Debug, Clone, Default)]
pub struct SeasonalSignal;

impl PricingSignal for SeasonalSignal {
    fn name(&self) -> &'static str {
        "seasonal"
    }

    fn quote(&self, product: &Product, ctx: &PricingContext) -> SignalQuote {
        let table = seasonal_multiplier(&product.category, ctx.timestamp.month());
        let multiplier = table * product.seasonality_factor;
        SignalQuote {
            strategy: self.name().to_string(),
            price: bounded(product, product.base_price * multiplier),
            reason: format!(
                "Seasonal multiplier {:.2}x for {} in month {}",
                multiplier,
                product.category,
                ctx.timestamp.month()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dynaprice_catalog::CompetitorPrice;
    use uuid::Uuid;

    fn product() -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Widget".to_string(),
            category: "Electronics".to_string(),
            brand: "Generic".to_string(),
            base_price: 100.0,
            current_price: 100.0,
            cost: 40.0,
            stock: 25,
            min_price: 11.0,
            max_price: 200.0,
            demand_score: 1.0,
            seasonality_factor: 1.0,
            rating: 3.5,
            sales_count: 10,
            price_history: Vec::new(),
            is_active: true,
        }
    }

    fn competitor(category: &str, price: f64) -> CompetitorPrice {
        CompetitorPrice {
            competitor_id: Uuid::new_v4(),
            product_name: "Rival".to_string(),
            category: category.to_string(),
            price,
            recorded_at: Utc::now(),
            is_available: true,
        }
    }

    #[test]
    fn test_cost_plus_default_markup() {
        let quote = CostPlusSignal::default().quote(&product(), &PricingContext::default());
        assert_eq!(quote.price, 60.0);
        assert!(quote.reason.contains("50% markup"));
    }

    #[test]
    fn test_competitor_without_data_uses_base_price() {
        let quote = CompetitorSignal.quote(&product(), &PricingContext::default());
        assert_eq!(quote.price, 100.0);
        assert!(quote.reason.contains("No competitor data"));
    }

    #[test]
    fn test_competitor_prices_below_average() {
        let ctx = PricingContext::default()
            .with_competitor_prices(vec![competitor("Electronics", 120.0)]);
        let quote = CompetitorSignal.quote(&product(), &ctx);
        assert_eq!(quote.price, 114.0);
    }

    #[test]
    fn test_competitor_protects_margin() {
        let ctx =
            PricingContext::default().with_competitor_prices(vec![competitor("Electronics", 30.0)]);
        let quote = CompetitorSignal.quote(&product(), &ctx);

        // 30 * 0.95 = 28.50 is below cost * 1.1 = 44.00.
        assert_eq!(quote.price, 44.0);
        assert!(quote.reason.contains("minimum margin"));
    }

    #[test]
    fn test_demand_scarcity_and_clearance() {
        let p = product();
        let scarce = DemandSignal.quote(&p, &PricingContext::default().with_inventory_level(0.1));
        assert_eq!(scarce.price, 110.0);

        let glut = DemandSignal.quote(&p, &PricingContext::default().with_inventory_level(0.9));
        assert_eq!(glut.price, 90.0);

        let mid = DemandSignal.quote(&p, &PricingContext::default().with_inventory_level(0.5));
        assert_eq!(mid.price, 100.0);
    }

    #[test]
    fn test_demand_floor_at_cost_margin() {
        let p = product();
        let ctx = PricingContext::default()
            .with_demand_factor(0.1)
            .with_inventory_level(0.9);
        let quote = DemandSignal.quote(&p, &ctx);

        // 100 * 0.1 * 0.9 = 9.0 is below cost * 1.05 = 42.0; the corridor
        // floor of 11.0 is below that, so the margin floor wins.
        assert_eq!(quote.price, 42.0);
        assert!(quote.reason.contains("minimum margin"));
    }

    #[test]
    fn test_value_regular_segment_is_neutral() {
        let ctx = PricingContext::default().with_segment(CustomerSegment::Regular);
        let quote = ValueSignal.quote(&product(), &ctx);
        assert_eq!(quote.price, 100.0);
    }

    #[test]
    fn test_value_vip_brand_rating_and_loyalty() {
        let mut p = product();
        p.brand = "Apple".to_string();
        p.rating = 4.6;
        let ctx = PricingContext::default()
            .with_segment(CustomerSegment::Vip)
            .with_loyalty_discount(0.1);
        let quote = ValueSignal.quote(&p, &ctx);

        // 100 * 1.2 * 1.1 * 1.05 * 0.9 = 124.74
        assert_eq!(quote.price, 124.74);
        assert!(quote.reason.contains("loyalty discount"));
    }

    #[test]
    fn test_time_multiplier_weekend_evening() {
        // Saturday 2025-06-07 19:00 UTC.
        let ts = Utc.with_ymd_and_hms(2025, 6, 7, 19, 0, 0).unwrap();
        assert!((time_multiplier(ts) - 1.1 * 1.05).abs() < 1e-9);

        // Tuesday mid-morning is neutral.
        let ts = Utc.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap();
        assert_eq!(time_multiplier(ts), 1.0);
    }

    #[test]
    fn test_holiday_detection() {
        assert!(is_holiday(Utc.with_ymd_and_hms(2025, 12, 25, 9, 0, 0).unwrap()));
        assert!(is_holiday(Utc.with_ymd_and_hms(2025, 7, 4, 9, 0, 0).unwrap()));
        // Thanksgiving 2025 is Thursday Nov 27.
        assert!(is_holiday(Utc.with_ymd_and_hms(2025, 11, 27, 9, 0, 0).unwrap()));
        // Nov 26 2025 is a Wednesday.
        assert!(!is_holiday(Utc.with_ymd_and_hms(2025, 11, 26, 9, 0, 0).unwrap()));
    }

    #[test]
    fn test_seasonal_clothing_winter() {
        assert_eq!(seasonal_multiplier("Clothing", 12), 1.3);
        assert_eq!(seasonal_multiplier("Clothing", 7), 0.9);
        assert_eq!(seasonal_multiplier("Unknown", 7), 1.0);

        let mut p = product();
        p.category = "Toys".to_string();
        p.seasonality_factor = 1.2;
        let ctx = PricingContext::default()
            .with_timestamp(Utc.with_ymd_and_hms(2025, 12, 5, 12, 0, 0).unwrap());
        let quote = SeasonalSignal.quote(&p, &ctx);

        // 100 * 1.5 * 1.2 = 180, within [11, 200].
        assert_eq!(quote.price, 180.0);
    }

    #[test]
    fn test_quotes_stay_in_corridor() {
        let mut p = product();
        p.max_price = 55.0;
        let quote = CostPlusSignal::default().quote(&p, &PricingContext::default());
        assert_eq!(quote.price, 55.0);

        p.min_price = 70.0;
        p.max_price = 200.0;
        let quote = CostPlusSignal::default().quote(&p, &PricingContext::default());
        assert_eq!(quote.price, 70.0);
    }
}
