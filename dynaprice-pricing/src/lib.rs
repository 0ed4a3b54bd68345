pub mod abtest;
pub mod aggregator;
pub mod bounds;
pub mod config;
pub mod context;
pub mod engine;
pub mod recommendation;
pub mod rules;
pub mod signals;

pub use abtest::{
    simulate_ab_test, AbTestResult, AbTestVariant, FixedTraffic, RandomTraffic, TrafficDraw,
    TrafficModel,
};
pub use aggregator::{aggregate, season_multiplier, StrategyWeights, WeightError};
pub use config::PricingConfig;
pub use context::{observed_demand_factor, PricingContext};
pub use engine::{PriceGap, PriceUpdate, PricingEngine};
pub use recommendation::{ImpactEstimate, PricingRecommendation, StrategyBreakdown};
pub use rules::{PricingRule, PricingRuleType, RulePipeline};
pub use signals::{
    CompetitorSignal, CostPlusSignal, DemandSignal, PricingSignal, SeasonalSignal, SignalQuote,
    TimeSignal, ValueSignal,
};
