use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sellable item in the catalog.
///
/// **Important**: Products do NOT store stock. Stock is derived on demand
/// from the initial baseline plus the movement log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier within the live catalog (positive integer)
    pub id: u32,

    /// Display name (non-empty)
    pub name: String,

    /// Acquisition cost per unit, fixed to 2 decimal places
    pub cost: Decimal,

    /// Reference sale price per unit, fixed to 2 decimal places
    pub price: Decimal,
}

impl Product {
    /// Create a product, normalizing cost and price to 2 decimal places.
    pub fn new(id: u32, name: impl Into<String>, cost: Decimal, price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            cost: cost.round_dp(2),
            price: price.round_dp(2),
        }
    }

    /// Margin per unit at the reference price (price minus cost).
    #[must_use]
    pub fn unit_margin(&self) -> Decimal {
        self.price - self.cost
    }
}
