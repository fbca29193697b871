use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One dated stock-change row in the movement log.
///
/// `quantity_in` and `quantity_out` are separate non-negative columns.
/// Normal use sets exactly one of them, but the row shape permits both
/// to be nonzero and readers must not assume exclusivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Calendar date of the movement (no time component, daily granularity)
    pub date: NaiveDate,

    /// Id of the product this row refers to (weak reference)
    pub product_id: u32,

    /// Quantity added to stock, fixed to 2 decimal places
    pub quantity_in: Decimal,

    /// Quantity removed from stock, fixed to 2 decimal places
    pub quantity_out: Decimal,
}

impl Movement {
    /// Create a movement row, normalizing quantities to 2 decimal places.
    pub fn new(
        product_id: u32,
        quantity_in: Decimal,
        quantity_out: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            date,
            product_id,
            quantity_in: quantity_in.round_dp(2),
            quantity_out: quantity_out.round_dp(2),
        }
    }

    /// A pure entry (stock received).
    pub fn entry(product_id: u32, quantity: Decimal, date: NaiveDate) -> Self {
        Self::new(product_id, quantity, Decimal::ZERO, date)
    }

    /// A pure exit (stock removed).
    pub fn exit(product_id: u32, quantity: Decimal, date: NaiveDate) -> Self {
        Self::new(product_id, Decimal::ZERO, quantity, date)
    }

    /// Net effect of this row on the product's balance (in minus out).
    #[must_use]
    pub fn delta(&self) -> Decimal {
        self.quantity_in - self.quantity_out
    }
}
