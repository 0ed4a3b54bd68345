use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::signals::SignalQuote;

/// Weight used for a strategy the weight table does not know about.
pub const DEFAULT_STRATEGY_WEIGHT: f64 = 0.25;

const WEIGHT_SUM_EPSILON: f64 = 1e-6;

#[derive(Debug, thiserror::Error)]
pub enum WeightError {
    #[error("Strategy weights must sum to 1.0, got {0}")]
    BadSum(f64),

    #[error("Invalid weight {weight} for strategy {strategy}")]
    BadWeight { strategy: String, weight: f64 },
}

/// Per-strategy contribution weights. The configured table must sum to
/// 1.0; strategies outside the table fall back to
/// `DEFAULT_STRATEGY_WEIGHT`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyWeights {
    weights: HashMap<String, f64>,
}

impl Default for StrategyWeights {
    fn default() -> Self {
        let mut weights = HashMap::new();
        weights.insert("competitor".to_string(), 0.30);
        weights.insert("demand".to_string(), 0.30);
        weights.insert("cost_plus".to_string(), 0.20);
        weights.insert("value".to_string(), 0.20);
        Self { weights }
    }
}

impl StrategyWeights {
    pub fn new(weights: HashMap<String, f64>) -> Result<Self, WeightError> {
        let table = Self { weights };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), WeightError> {
        for (strategy, &weight) in &self.weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(WeightError::BadWeight {
                    strategy: strategy.clone(),
                    weight,
                });
            }
        }
        let sum: f64 = self.weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(WeightError::BadSum(sum));
        }
        Ok(())
    }

    pub fn weight_of(&self, strategy: &str) -> f64 {
        self.weights
            .get(strategy)
            .copied()
            .unwrap_or(DEFAULT_STRATEGY_WEIGHT)
    }
}

/// Weighted average of the signal quotes. Zero total weight degrades to
/// the unweighted mean; no quotes at all degrades to the base price.
pub fn aggregate(quotes: &[SignalQuote], weights: &StrategyWeights, base_price: f64) -> f64 {
    if quotes.is_empty() {
        return base_price;
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for quote in quotes {
        let weight = weights.weight_of(&quote.strategy);
        weighted_sum += quote.price * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        quotes.iter().map(|q| q.price).sum::<f64>() / quotes.len() as f64
    }
}

/// Season multiplier applied once to the aggregate, never per signal.
/// Unknown labels are neutral.
pub fn season_multiplier(season: &str) -> f64 {
    match season.to_ascii_lowercase().as_str() {
        "holiday" => 1.10,
        "christmas" => 1.15,
        "black_friday" => 0.80,
        "summer_sale" => 0.90,
        "back_to_school" => 1.05,
        _ => 1.0,
    }
}
