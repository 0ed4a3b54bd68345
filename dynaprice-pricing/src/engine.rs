use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dynaprice_catalog::{Order, OrderHistory, Product, ProductCatalog};

use crate::abtest::{simulate_ab_test, AbTestResult, RandomTraffic, TrafficModel};
use crate::aggregator::{aggregate, season_multiplier, StrategyWeights, WeightError};
use crate::bounds;
use crate::config::PricingConfig;
use crate::context::{observed_demand_factor, PricingContext};
use crate::recommendation::{PricingRecommendation, StrategyBreakdown};
use crate::rules::{PricingRule, RulePipeline};
use crate::signals::{
    CompetitorSignal, CostPlusSignal, DemandSignal, PricingSignal, SignalQuote, ValueSignal,
};

/// Sales window consulted when deriving demand from order history.
const DEMAND_WINDOW_DAYS: i64 = 30;

/// Gap between a product's current and optimal price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceGap {
    pub product_id: Uuid,
    pub current_price: f64,
    pub optimal_price: f64,
    pub difference: f64,
}

/// A proposed price change surfaced by `flag_significant`. The engine
/// only proposes; applying it (via `Product::apply_price`) is the
/// caller's decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub product_id: Uuid,
    pub current_price: f64,
    pub new_price: f64,
    pub reason: String,
}

/// The pricing decision engine: signal providers feeding a weighted
/// aggregate, refined by the rule pipeline, clamped to the product's
/// price corridor. Read-only over all of its inputs.
pub struct PricingEngine {
    signals: Vec<Box<dyn PricingSignal>>,
    weights: StrategyWeights,
    rules: RulePipeline,
    config: PricingConfig,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingEngine {
    pub fn new() -> Self {
        Self::from_parts(PricingConfig::default())
    }

    /// Build from configuration, rejecting weight tables that do not sum
    /// to 1.0.
    pub fn with_config(config: PricingConfig) -> Result<Self, WeightError> {
        config.weights.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: PricingConfig) -> Self {
        Self {
            signals: vec![
                Box::new(CompetitorSignal),
                Box::new(DemandSignal),
                Box::new(CostPlusSignal {
                    markup_pct: config.markup_pct,
                }),
                Box::new(ValueSignal),
            ],
            weights: config.weights.clone(),
            rules: RulePipeline::default(),
            config,
        }
    }

    pub fn with_weights(weights: StrategyWeights) -> Result<Self, WeightError> {
        Self::with_config(PricingConfig {
            weights,
            ..PricingConfig::default()
        })
    }

    /// Replace the default signal set, e.g. to add the time or seasonal
    /// providers.
    pub fn with_signals(mut self, signals: Vec<Box<dyn PricingSignal>>) -> Self {
        self.signals = signals;
        self
    }

    /// Load an adjustment-rule snapshot (inactive rules dropped, sorted
    /// by priority). Refreshing rules means loading a new snapshot.
    pub fn with_rules(mut self, rules: Vec<PricingRule>) -> Self {
        self.rules = RulePipeline::new(rules);
        self
    }

    fn quotes(&self, product: &Product, ctx: &PricingContext) -> Vec<SignalQuote> {
        self.signals
            .iter()
            .map(|signal| {
                let quote = signal.quote(product, ctx);
                tracing::debug!(
                    product = %product.id,
                    strategy = %quote.strategy,
                    price = quote.price,
                    "signal quote"
                );
                quote
            })
            .collect()
    }

    fn optimal_from_quotes(
        &self,
        quotes: &[SignalQuote],
        product: &Product,
        ctx: &PricingContext,
    ) -> f64 {
        let mut price = aggregate(quotes, &self.weights, product.base_price);
        if ctx.is_seasonal_period {
            price *= season_multiplier(&ctx.season);
        }
        price = self.rules.apply(price, product, ctx);
        bounds::enforce(price, product.min_price, product.max_price)
    }

    /// The recommended price alone, without the full recommendation.
    pub fn optimal_price(&self, product: &Product, ctx: &PricingContext) -> f64 {
        self.optimal_from_quotes(&self.quotes(product, ctx), product, ctx)
    }

    /// Full recommendation for one product: price, deltas, per-strategy
    /// breakdown, confidence, reasons, projected impact.
    pub fn recommend(&self, product: &Product, ctx: &PricingContext) -> PricingRecommendation {
        let quotes = self.quotes(product, ctx);
        let optimal = self.optimal_from_quotes(&quotes, product, ctx);

        let breakdown = quotes
            .into_iter()
            .map(|q| StrategyBreakdown {
                weight: self.weights.weight_of(&q.strategy),
                strategy: q.strategy,
                price: q.price,
                reason: q.reason,
            })
            .collect();

        PricingRecommendation::build(
            product,
            optimal,
            breakdown,
            &ctx.competitor_prices,
            self.config.elasticity,
        )
    }

    /// Like `recommend`, but derives the demand factor from recent
    /// orders instead of taking the context's value as given. The sales
    /// window is anchored to the context timestamp, so a fixed context
    /// always derives the same factor.
    pub fn recommend_with_orders(
        &self,
        product: &Product,
        ctx: &PricingContext,
        recent_orders: &[Order],
    ) -> PricingRecommendation {
        let since = ctx.timestamp - Duration::days(DEMAND_WINDOW_DAYS);
        let ctx = ctx
            .clone()
            .with_demand_factor(observed_demand_factor(product, recent_orders, since));
        self.recommend(product, &ctx)
    }

    /// Recommendation by product id through the catalog collaborator.
    /// A missing product yields the `not_found` sentinel, never an
    /// error; callers check `is_found` before acting.
    pub fn recommend_by_id(
        &self,
        product_id: Uuid,
        catalog: &dyn ProductCatalog,
        history: &dyn OrderHistory,
        ctx: &PricingContext,
    ) -> PricingRecommendation {
        let product = match catalog.product_by_id(product_id) {
            Some(product) => product,
            None => return PricingRecommendation::not_found(),
        };
        let orders = history.recent_orders(ctx.timestamp - Duration::days(DEMAND_WINDOW_DAYS));
        self.recommend_with_orders(&product, ctx, &orders)
    }

    /// Random traffic source using the configured draw ranges. Pass a
    /// seed for reproducible simulations.
    pub fn default_traffic(&self, seed: Option<u64>) -> RandomTraffic {
        let traffic = match seed {
            Some(seed) => RandomTraffic::seeded(seed),
            None => RandomTraffic::new(),
        };
        traffic.with_ranges(self.config.ab_views, self.config.ab_conversions)
    }

    /// Simulate an A/B test of two candidate prices over `days` days.
    pub fn run_ab_test(
        &self,
        product: &Product,
        price_a: f64,
        price_b: f64,
        days: u32,
        traffic: &mut dyn TrafficModel,
    ) -> AbTestResult {
        simulate_ab_test(product, price_a, price_b, days, traffic)
    }

    /// Price-gap analysis across the catalog, sorted by gap magnitude
    /// descending. Each product's demand factor is derived from its own
    /// recent sales.
    pub fn analyze_all_products(
        &self,
        products: &[Product],
        recent_orders: &[Order],
        ctx: &PricingContext,
    ) -> Vec<PriceGap> {
        let since = ctx.timestamp - Duration::days(DEMAND_WINDOW_DAYS);
        let mut gaps: Vec<PriceGap> = products
            .iter()
            .map(|product| {
                let ctx = ctx.clone().with_demand_factor(observed_demand_factor(
                    product,
                    recent_orders,
                    since,
                ));
                let optimal = self.optimal_price(product, &ctx);
                PriceGap {
                    product_id: product.id,
                    current_price: product.current_price,
                    optimal_price: optimal,
                    difference: bounds::round_currency(optimal - product.current_price),
                }
            })
            .collect();

        gaps.sort_by(|a, b| {
            b.difference
                .abs()
                .partial_cmp(&a.difference.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        gaps
    }

    /// Surface the gaps worth acting on: those larger than 5% of the
    /// current price or the absolute floor (default $1), whichever is
    /// greater. Flags only; nothing is written back here.
    pub fn flag_significant(
        &self,
        gaps: &[PriceGap],
        min_delta: Option<f64>,
    ) -> Vec<PriceUpdate> {
        let floor = min_delta.unwrap_or(self.config.min_significant_delta);
        let updates: Vec<PriceUpdate> = gaps
            .iter()
            .filter(|gap| {
                gap.difference.abs() > (gap.current_price * self.config.significant_pct).max(floor)
            })
            .map(|gap| PriceUpdate {
                product_id: gap.product_id,
                current_price: gap.current_price,
                new_price: gap.optimal_price,
                reason: format!(
                    "Dynamic pricing adjustment: ${:+.2} change",
                    gap.difference
                ),
            })
            .collect();

        tracing::info!(
            analyzed = gaps.len(),
            flagged = updates.len(),
            "significant price gaps flagged"
        );
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_builds() {
        let engine = PricingEngine::new();
        assert_eq!(engine.signals.len(), 4);
        assert!(engine.rules.is_empty());
    }

    #[test]
    fn test_bad_weights_rejected() {
        let weights: StrategyWeights = serde_json::from_str(r#"{"competitor": 0.9}"#).unwrap();
        assert!(PricingEngine::with_weights(weights).is_err());
    }
}
