/// Round to cents, half-up.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clamp into the price corridor and round to cents. Every recommended
/// price passes through here last; nothing downstream may undo it.
pub fn enforce(price: f64, min_price: f64, max_price: f64) -> f64 {
    round_currency(price.clamp(min_price, max_price))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_currency_half_up() {
        assert_eq!(round_currency(10.005), 10.01);
        assert_eq!(round_currency(10.004), 10.0);
        assert_eq!(round_currency(92.0), 92.0);
    }

    #[test]
    fn test_enforce_clamps_both_ends() {
        assert_eq!(enforce(300.0, 11.0, 200.0), 200.0);
        assert_eq!(enforce(5.0, 11.0, 200.0), 11.0);
        assert_eq!(enforce(101.199, 11.0, 200.0), 101.2);
    }
}
