use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dynaprice_catalog::Product;

use crate::bounds::round_currency;

/// Simulated traffic for one variant over the test window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrafficDraw {
    pub views: u32,
    pub conversions: u32,
}

/// Source of traffic draws. The simulator never touches a global RNG, so
/// substituting a deterministic model makes a whole test reproducible.
pub trait TrafficModel {
    fn draw(&mut self, price: f64, days: u32) -> TrafficDraw;
}

/// Random traffic from a seedable generator, drawing views and
/// conversions uniformly from half-open ranges.
#[derive(Debug)]
pub struct RandomTraffic {
    rng: StdRng,
    views: (u32, u32),
    conversions: (u32, u32),
}

impl RandomTraffic {
    pub const DEFAULT_VIEWS: (u32, u32) = (1000, 3000);
    pub const DEFAULT_CONVERSIONS: (u32, u32) = (50, 200);

    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            views: Self::DEFAULT_VIEWS,
            conversions: Self::DEFAULT_CONVERSIONS,
        }
    }

    /// Fixed seed for reproducible simulations.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            views: Self::DEFAULT_VIEWS,
            conversions: Self::DEFAULT_CONVERSIONS,
        }
    }

    pub fn with_ranges(mut self, views: (u32, u32), conversions: (u32, u32)) -> Self {
        self.views = views;
        self.conversions = conversions;
        self
    }
}

impl Default for RandomTraffic {
    fn default() -> Self {
        Self::new()
    }
}

impl TrafficModel for RandomTraffic {
    fn draw(&mut self, _price: f64, _days: u32) -> TrafficDraw {
        TrafficDraw {
            views: self.rng.gen_range(self.views.0..self.views.1),
            conversions: self.rng.gen_range(self.conversions.0..self.conversions.1),
        }
    }
}

/// Replays scripted draws in order; repeats the final draw once the
/// script runs out. Intended for tests.
#[derive(Debug, Clone)]
pub struct FixedTraffic {
    draws: VecDeque<TrafficDraw>,
    last: TrafficDraw,
}

impl FixedTraffic {
    pub fn new(draws: Vec<TrafficDraw>) -> Self {
        let last = draws.last().copied().unwrap_or(TrafficDraw {
            views: 0,
            conversions: 0,
        });
        Self {
            draws: draws.into(),
            last,
        }
    }
}

impl TrafficModel for FixedTraffic {
    fn draw(&mut self, _price: f64, _days: u32) -> TrafficDraw {
        self.draws.pop_front().unwrap_or(self.last)
    }
}

/// One price variant's simulated outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbTestVariant {
    pub price: f64,
    pub views: u32,
    pub conversions: u32,
    /// Percentage, 0 when there were no views.
    pub conversion_rate: f64,
    /// Rounded to cents; the winner is decided on the raw value.
    pub revenue: f64,
}

impl AbTestVariant {
    fn from_draw(price: f64, draw: TrafficDraw) -> Self {
        let conversion_rate = if draw.views == 0 {
            0.0
        } else {
            draw.conversions as f64 / draw.views as f64 * 100.0
        };
        Self {
            price,
            views: draw.views,
            conversions: draw.conversions,
            conversion_rate,
            revenue: round_currency(draw.conversions as f64 * price),
        }
    }
}

/// Outcome of a simulated A/B price test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbTestResult {
    pub product_id: Uuid,
    pub variant_a: AbTestVariant,
    pub variant_b: AbTestVariant,
    /// "A" or "B".
    pub winner: String,
    /// 0 - 95.
    pub confidence: f64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub recommendations: Vec<String>,
}

/// Simulate a heuristic A/B test of two candidate prices. The winner is
/// the variant with higher revenue; confidence grows with the conversion
/// rate gap and is capped at 95.
pub fn simulate_ab_test(
    product: &Product,
    price_a: f64,
    price_b: f64,
    days: u32,
    traffic: &mut dyn TrafficModel,
) -> AbTestResult {
    let draw_a = traffic.draw(price_a, days);
    let draw_b = traffic.draw(price_b, days);
    let variant_a = AbTestVariant::from_draw(price_a, draw_a);
    let variant_b = AbTestVariant::from_draw(price_b, draw_b);

    // Compare raw revenue so a sub-cent gap cannot round into a tie.
    let raw_revenue_a = draw_a.conversions as f64 * price_a;
    let raw_revenue_b = draw_b.conversions as f64 * price_b;
    let winner = if raw_revenue_a > raw_revenue_b {
        "A"
    } else {
        "B"
    };
    let rate_gap = (variant_a.conversion_rate - variant_b.conversion_rate).abs();
    let confidence = (rate_gap * 10.0).min(95.0);

    let (winning, losing) = if winner == "A" {
        (&variant_a, &variant_b)
    } else {
        (&variant_b, &variant_a)
    };
    let mut recommendations = vec![
        format!(
            "Implement price {} (${:.2}) for higher revenue",
            winner, winning.price
        ),
        format!(
            "Revenue increase of ${:.2} expected",
            round_currency(winning.revenue - losing.revenue)
        ),
    ];
    if rate_gap < 1.0 {
        recommendations.push(
            "Conversion rates are similar - consider other factors like inventory".to_string(),
        );
    }

    let ended_at = Utc::now();
    AbTestResult {
        product_id: product.id,
        variant_a,
        variant_b,
        winner: winner.to_string(),
        confidence,
        started_at: ended_at - Duration::days(days as i64),
        ended_at,
        recommendations,
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

    fn fixed(a: (u32, u32), b: (u32, u32)) -> FixedTraffic {
        FixedTraffic::new(vec![
            TrafficDraw {
                views: a.0,
                conversions: a.1,
            },
            TrafficDraw {
                views: b.0,
                conversions: b.1,
            },
        ])
    }

    #[test]
    fn test_reference_scenario() {
        let mut traffic = fixed((2000, 100), (2000, 80));
        let result = simulate_ab_test(&product(), 50.0, 60.0, 7, &mut traffic);

        assert_eq!(result.variant_a.revenue, 5000.0);
        assert_eq!(result.variant_b.revenue, 4800.0);
        assert_eq!(result.winner, "A");
        assert!((result.variant_a.conversion_rate - 5.0).abs() < 1e-9);
        assert!((result.variant_b.conversion_rate - 4.0).abs() < 1e-9);
        assert!((result.confidence - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_winner_follows_revenue_not_rate() {
        // B converts worse but the higher price wins on revenue.
        let mut traffic = fixed((2000, 100), (2000, 90));
        let result = simulate_ab_test(&product(), 50.0, 60.0, 7, &mut traffic);
        assert_eq!(result.winner, "B");
        assert!(result.recommendations[0].contains("price B"));
    }

    #[test]
    fn test_sub_cent_revenue_gap_still_decides_winner() {
        // Raw revenues 100.0002 vs 100.00 both round to 100.00, but A's
        // raw revenue is strictly higher.
        let mut traffic = fixed((1000, 3), (1000, 2));
        let result = simulate_ab_test(&product(), 33.3334, 50.0, 7, &mut traffic);

        assert_eq!(result.variant_a.revenue, result.variant_b.revenue);
        assert_eq!(result.winner, "A");
    }

    #[test]
    fn test_confidence_capped_at_95() {
        let mut traffic = fixed((100, 100), (10_000, 1));
        let result = simulate_ab_test(&product(), 50.0, 60.0, 7, &mut traffic);
        assert_eq!(result.confidence, 95.0);
    }

    #[test]
    fn test_similar_rates_flagged() {
        let mut traffic = fixed((2000, 100), (2000, 98));
        let result = simulate_ab_test(&product(), 50.0, 60.0, 7, &mut traffic);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("Conversion rates are similar")));
    }

    #[test]
    fn test_zero_views_guarded() {
        let mut traffic = fixed((0, 0), (2000, 80));
        let result = simulate_ab_test(&product(), 50.0, 60.0, 7, &mut traffic);
        assert_eq!(result.variant_a.conversion_rate, 0.0);
        assert_eq!(result.winner, "B");
    }

    #[test]
    fn test_seeded_traffic_is_reproducible() {
        let mut first = RandomTraffic::seeded(42);
        let mut second = RandomTraffic::seeded(42);
        for _ in 0..10 {
            let a = first.draw(50.0, 7);
            let b = second.draw(50.0, 7);
            assert_eq!(a.views, b.views);
            assert_eq!(a.conversions, b.conversions);
        }
    }

    #[test]
    fn test_random_traffic_respects_ranges() {
        let mut traffic = RandomTraffic::seeded(7).with_ranges((1000, 3000), (50, 200));
        for _ in 0..50 {
            let draw = traffic.draw(50.0, 7);
            assert!((1000..3000).contains(&draw.views));
            assert!((50..200).contains(&draw.conversions));
        }
    }
}
