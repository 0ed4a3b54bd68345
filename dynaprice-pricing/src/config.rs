use std::env;

use serde::Deserialize;

use crate::aggregator::StrategyWeights;

/// Engine configuration with defaults matching the reference behavior.
/// Every field is optional in the config file.
#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    #[serde(default)]
    pub weights: StrategyWeights,

    #[serde(default = "default_markup_pct")]
    pub markup_pct: f64,

    /// Assumed price elasticity of demand, used only for impact
    /// estimation.
    #[serde(default = "default_elasticity")]
    pub elasticity: f64,

    /// Fraction of the current price a gap must exceed to be flagged.
    #[serde(default = "default_significant_pct")]
    pub significant_pct: f64,

    /// Absolute floor (dollars) for a significant gap.
    #[serde(default = "default_min_significant_delta")]
    pub min_significant_delta: f64,

    #[serde(default = "default_ab_views")]
    pub ab_views: (u32, u32),

    #[serde(default = "default_ab_conversions")]
    pub ab_conversions: (u32, u32),
}

fn default_markup_pct() -> f64 {
    50.0
}

fn default_elasticity() -> f64 {
    -1.2
}

fn default_significant_pct() -> f64 {
    0.05
}

fn default_min_significant_delta() -> f64 {
    1.0
}

fn default_ab_views() -> (u32, u32) {
    (1000, 3000)
}

fn default_ab_conversions() -> (u32, u32) {
    (50, 200)
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            weights: StrategyWeights::default(),
            markup_pct: default_markup_pct(),
            elasticity: default_elasticity(),
            significant_pct: default_significant_pct(),
            min_significant_delta: default_min_significant_delta(),
            ab_views: default_ab_views(),
            ab_conversions: default_ab_conversions(),
        }
    }
}

impl PricingConfig {
    /// Layered load: `config/default`, then the `RUN_MODE` overlay, then
    /// `DYNAPRICE_*` environment variables. All layers are optional.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::Environment::with_prefix("DYNAPRICE").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_reference_values() {
        let cfg = PricingConfig::default();
        assert_eq!(cfg.markup_pct, 50.0);
        assert_eq!(cfg.elasticity, -1.2);
        assert_eq!(cfg.ab_views, (1000, 3000));
        assert!(cfg.weights.validate().is_ok());
    }

    #[test]
    fn test_deserializes_partial_config() {
        let cfg: PricingConfig = serde_json::from_str(r#"{"markup_pct": 40.0}"#).unwrap();
        assert_eq!(cfg.markup_pct, 40.0);
        assert_eq!(cfg.elasticity, -1.2);
    }
}
