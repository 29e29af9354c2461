use serde::{Deserialize, Serialize};

/// Hours accepted by the tariff service (0..=24).
pub const MAX_TARIFF_HOUR: u8 = 24;

/// Body of `GET /tariff/{hour}/{previousCost}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TariffQuote {
    pub price: f64,
}

/// A tariff estimate for a peak hour against a previous bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffEstimate {
    pub hour: u8,
    pub previous_cost: u32,
    pub price: f64,
}
