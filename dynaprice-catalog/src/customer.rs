use serde::{Deserialize, Serialize};

/// Customer segments recognized by pricing and checkout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerSegment {
    New,
    Regular,
    Vip,
    Premium,
    AtRisk,
    Churned,
}

impl CustomerSegment {
    /// Discount rate applied at order/checkout level. Catalog pricing
    /// never uses this; segment effects on list price go through the
    /// value signal instead.
    pub fn checkout_discount_rate(&self) -> f64 {
        match self {
            CustomerSegment::Vip => 0.10,
            CustomerSegment::Regular => 0.05,
            CustomerSegment::AtRisk => 0.15,
            CustomerSegment::New => 0.02,
            CustomerSegment::Premium | CustomerSegment::Churned => 0.0,
        }
    }
}
