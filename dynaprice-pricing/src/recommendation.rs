use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dynaprice_catalog::{CompetitorPrice, Product};

use crate::bounds::round_currency;

/// Per-strategy line in the recommendation breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyBreakdown {
    pub strategy: String,
    pub price: f64,
    pub weight: f64,
    pub reason: String,
}

/// Projected effect of moving to the recommended price, derived from a
/// fixed assumed elasticity. Estimation only; the elasticity never feeds
/// back into the price itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactEstimate {
    pub demand_change_pct: f64,
    pub revenue_change_pct: f64,
    pub summary: String,
}

impl ImpactEstimate {
    /// `demand = elasticity * priceΔ%`; revenue combines both effects
    /// including the cross term. A zero current price yields a neutral
    /// estimate rather than a division error.
    pub fn project(current_price: f64, new_price: f64, elasticity: f64) -> Self {
        let price_change_pct = if current_price == 0.0 {
            0.0
        } else {
            (new_price - current_price) / current_price * 100.0
        };
        let demand_change_pct = elasticity * price_change_pct;
        let revenue_change_pct =
            price_change_pct + demand_change_pct + price_change_pct * demand_change_pct / 100.0;

        Self {
            demand_change_pct,
            revenue_change_pct,
            summary: format!(
                "Estimated {:.1}% revenue change, {:.1}% demand change",
                revenue_change_pct, demand_change_pct
            ),
        }
    }
}

/// The engine's final output for one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRecommendation {
    pub product_id: Uuid,
    pub product_name: String,
    pub current_price: f64,
    pub recommended_price: f64,
    pub price_difference: f64,
    pub percentage_change: f64,
    pub breakdown: Vec<StrategyBreakdown>,
    /// 0 - 100.
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub expected_impact: ImpactEstimate,
}

impl PricingRecommendation {
    /// Sentinel returned when the product lookup misses. Callers check
    /// `is_found` before acting; the engine never errors on a miss.
    pub fn not_found() -> Self {
        Self {
            product_id: Uuid::nil(),
            product_name: String::new(),
            current_price: 0.0,
            recommended_price: 0.0,
            price_difference: 0.0,
            percentage_change: 0.0,
            breakdown: Vec::new(),
            confidence: 0.0,
            reasons: Vec::new(),
            expected_impact: ImpactEstimate::project(0.0, 0.0, 0.0),
        }
    }

    pub fn is_found(&self) -> bool {
        !self.product_id.is_nil()
    }

    pub fn build(
        product: &Product,
        recommended_price: f64,
        breakdown: Vec<StrategyBreakdown>,
        competitor_prices: &[CompetitorPrice],
        elasticity: f64,
    ) -> Self {
        let price_difference = round_currency(recommended_price - product.current_price);
        let percentage_change = if product.current_price == 0.0 {
            0.0
        } else {
            price_difference / product.current_price * 100.0
        };

        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            current_price: product.current_price,
            recommended_price,
            price_difference,
            percentage_change,
            breakdown,
            confidence: confidence_score(product, competitor_prices),
            reasons: change_reasons(product, recommended_price),
            expected_impact: ImpactEstimate::project(
                product.current_price,
                recommended_price,
                elasticity,
            ),
        }
    }
}

/// Confidence in the recommendation, 0 - 100. Each available evidence
/// source contributes its own weight; with no evidence at all the score
/// defaults to 50.
pub fn confidence_score(product: &Product, competitor_prices: &[CompetitorPrice]) -> f64 {
    let mut factors = 0u32;
    let mut confidence = 0.0;

    if product.stock > 0 {
        confidence += 0.2;
        factors += 1;
    }
    if product.sales_count > 5 {
        confidence += 0.3;
        factors += 1;
    }
    if !product.price_history.is_empty() {
        confidence += 0.2;
        factors += 1;
    }
    if competitor_prices
        .iter()
        .any(|cp| cp.is_available && cp.category.eq_ignore_ascii_case(&product.category))
    {
        confidence += 0.3;
        factors += 1;
    }

    if factors > 0 {
        confidence / factors as f64 * 100.0
    } else {
        50.0
    }
}

/// Human-readable justifications for the direction of the change.
pub fn change_reasons(product: &Product, recommended_price: f64) -> Vec<String> {
    let mut reasons = Vec::new();

    if recommended_price > product.current_price {
        if product.stock < 10 {
            reasons.push("Low inventory levels justify price increase".to_string());
        }
        if product.demand_score > 1.5 {
            reasons.push("High demand detected".to_string());
        }
    } else if recommended_price < product.current_price {
        if product.stock > 50 {
            reasons.push("High inventory suggests price reduction".to_string());
        }
        if product.demand_score < 0.7 {
            reasons.push("Low demand indicates price adjustment needed".to_string());
        }
    }

    reasons
}
