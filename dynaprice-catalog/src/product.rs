use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry in a product's append-only price history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceChange {
    pub changed_at: DateTime<Utc>,
    pub old_price: f64,
    pub new_price: f64,
    pub reason: String,
}

/// Core catalog product consumed by the pricing engine.
///
/// Prices are dollars rounded to cents. The corridor invariant
/// `min_price <= current_price <= max_price` holds after any accepted
/// `apply_price`; `min_price` is conventionally at least `cost * 1.1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub base_price: f64,
    pub current_price: f64,
    pub cost: f64,
    pub stock: i32,
    pub min_price: f64,
    pub max_price: f64,
    /// Relative demand indicator, 1.0 = neutral.
    pub demand_score: f64,
    /// Typically 0.8 - 1.3.
    pub seasonality_factor: f64,
    pub rating: f64,
    pub sales_count: u32,
    pub price_history: Vec<PriceChange>,
    pub is_active: bool,
}

/// Product-related errors
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Invalid product field {field}: {value}")]
    InvalidField { field: &'static str, value: f64 },

    #[error("Inverted price corridor: min {min} > max {max}")]
    InvertedCorridor { min: f64, max: f64 },

    #[error("Price {price} outside corridor [{min}, {max}]")]
    OutsideCorridor { price: f64, min: f64, max: f64 },
}

impl Product {
    /// Structural validation for caller-supplied products. Anything that
    /// fails here is malformed input, not a business-rule disagreement.
    pub fn validate(&self) -> Result<(), ProductError> {
        let fields = [
            ("base_price", self.base_price),
            ("current_price", self.current_price),
            ("cost", self.cost),
            ("min_price", self.min_price),
            ("max_price", self.max_price),
            ("demand_score", self.demand_score),
            ("seasonality_factor", self.seasonality_factor),
            ("rating", self.rating),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ProductError::InvalidField { field, value });
            }
        }
        if self.min_price > self.max_price {
            return Err(ProductError::InvertedCorridor {
                min: self.min_price,
                max: self.max_price,
            });
        }
        Ok(())
    }

    /// Write back a new price, appending to the history. Prices outside
    /// the corridor are rejected; the pricing engine never calls this.
    pub fn apply_price(
        &mut self,
        new_price: f64,
        reason: impl Into<String>,
    ) -> Result<(), ProductError> {
        if new_price < self.min_price || new_price > self.max_price {
            return Err(ProductError::OutsideCorridor {
                price: new_price,
                min: self.min_price,
                max: self.max_price,
            });
        }
        self.price_history.push(PriceChange {
            changed_at: Utc::now(),
            old_price: self.current_price,
            new_price,
            reason: reason.into(),
        });
        self.current_price = new_price;
        Ok(())
    }

    /// Margin over cost as a percentage, 0 when cost is 0.
    pub fn profit_margin(&self) -> f64 {
        if self.cost == 0.0 {
            return 0.0;
        }
        (self.current_price - self.cost) / self.cost * 100.0
    }

    pub fn is_low_stock(&self, threshold: i32) -> bool {
        self.stock <= threshold
    }

    /// Price changes within the last `days` days.
    pub fn recent_price_changes(&self, days: i64) -> Vec<&PriceChange> {
        let cutoff = Utc::now() - Duration::days(days);
        self.price_history
            .iter()
            .filter(|h| h.changed_at >= cutoff)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
            min_price: 50.0,
            max_price: 200.0,
            demand_score: 1.0,
            seasonality_factor: 1.0,
            rating: 4.0,
            sales_count: 10,
            price_history: Vec::new(),
            is_active: true,
        }
    }

    #[test]
    fn test_apply_price_within_corridor() {
        let mut p = product();
        p.apply_price(120.0, "demand spike").unwrap();

        assert_eq!(p.current_price, 120.0);
        assert_eq!(p.price_history.len(), 1);
        assert_eq!(p.price_history[0].old_price, 100.0);
        assert_eq!(p.price_history[0].new_price, 120.0);
    }

    #[test]
    fn test_apply_price_rejects_outside_corridor() {
        let mut p = product();
        let err = p.apply_price(250.0, "too high").unwrap_err();

        assert!(matches!(err, ProductError::OutsideCorridor { .. }));
        assert_eq!(p.current_price, 100.0);
        assert!(p.price_history.is_empty());
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut p = product();
        p.cost = f64::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_corridor() {
        let mut p = product();
        p.min_price = 300.0;
        assert!(matches!(
            p.validate(),
            Err(ProductError::InvertedCorridor { .. })
        ));
    }

    #[test]
    fn test_profit_margin_guards_zero_cost() {
        let mut p = product();
        p.cost = 0.0;
        assert_eq!(p.profit_margin(), 0.0);
    }
}
