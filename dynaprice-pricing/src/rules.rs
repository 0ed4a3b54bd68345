use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dynaprice_catalog::{average_category_price, Product};

use crate::context::PricingContext;
use crate::signals::time_multiplier;

/// Closed set of rule behaviors. Each variant knows how to transform a
/// price, so dispatch lives here rather than in scattered switches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingRuleType {
    InventoryBased,
    DemandBased,
    CompetitorBased,
    TimeBased,
    CustomerSegmentBased,
    SeasonalBased,
    /// Catch-all for rule types this engine version does not know.
    /// Deliberately a no-op rather than a deserialization error.
    #[serde(other)]
    Unrecognized,
}

impl PricingRuleType {
    /// Apply this rule's transform to `price`. Multiplicative rules clamp
    /// their multiplier into the rule's `[min, max]` band before use.
    fn apply(&self, rule: &PricingRule, product: &Product, ctx: &PricingContext, price: f64) -> f64 {
        match self {
            PricingRuleType::InventoryBased => {
                if product.stock < 10 {
                    let multiplier = 1.0 + (10 - product.stock) as f64 * 0.02;
                    price * rule.clamp_multiplier(multiplier)
                } else {
                    price
                }
            }
            PricingRuleType::DemandBased => {
                if product.demand_score > 1.5 {
                    price * rule.clamp_multiplier(product.demand_score * 0.8)
                } else {
                    price
                }
            }
            PricingRuleType::CompetitorBased => {
                match average_category_price(&ctx.competitor_prices, &product.category) {
                    // More than 10% above the market: reposition to 5%
                    // above the average, absolute, not a multiplier.
                    Some(avg) if price > avg * 1.1 => product.min_price.max(avg * 1.05),
                    _ => price,
                }
            }
            PricingRuleType::TimeBased => {
                price * rule.clamp_multiplier(time_multiplier(ctx.timestamp))
            }
            // Segment discounts apply at order/checkout, not here.
            PricingRuleType::CustomerSegmentBased => price,
            PricingRuleType::Unrecognized => price,
            PricingRuleType::SeasonalBased => {
                price * rule.clamp_multiplier(product.seasonality_factor)
            }
        }
    }
}

/// A category-scoped price adjustment rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRule {
    pub id: Uuid,
    pub name: String,
    pub rule_type: PricingRuleType,
    pub is_active: bool,
    /// Lower priority applies first.
    pub priority: i32,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
    /// Empty means the rule applies to every category.
    pub applicable_categories: Vec<String>,
}

impl PricingRule {
    pub fn applies_to_category(&self, category: &str) -> bool {
        self.applicable_categories.is_empty()
            || self
                .applicable_categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category))
    }

    fn clamp_multiplier(&self, multiplier: f64) -> f64 {
        multiplier.clamp(self.min_multiplier, self.max_multiplier)
    }
}

/// Priority-ordered rule pipeline. Each rule transforms the output of
/// the previous one, so order matters.
#[derive(Debug, Clone, Default)]
pub struct RulePipeline {
    rules: Vec<PricingRule>,
}

impl RulePipeline {
    /// Keeps only active rules, sorted ascending by priority. The list
    /// is an immutable snapshot; reloading means building a new pipeline.
    pub fn new(rules: Vec<PricingRule>) -> Self {
        let mut rules: Vec<PricingRule> = rules.into_iter().filter(|r| r.is_active).collect();
        rules.sort_by_key(|r| r.priority);
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, price: f64, product: &Product, ctx: &PricingContext) -> f64 {
        let mut price = price;
        for rule in &self.rules {
            if !rule.applies_to_category(&product.category) {
                continue;
            }
            let adjusted = rule.rule_type.apply(rule, product, ctx, price);
            if adjusted != price {
                tracing::debug!(
                    rule = %rule.name,
                    rule_type = ?rule.rule_type,
                    from = price,
                    to = adjusted,
                    "pricing rule applied"
                );
            }
            price = adjusted;
        }
        price
    }
}
