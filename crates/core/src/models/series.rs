use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single point of a product's stock-over-time step function.
///
/// The series emits one point per movement row in the date-ordered log,
/// so series for different products line up row by row: rows that do not
/// touch the target product repeat the previous balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPoint {
    /// Date of the movement row this point was sampled at
    pub date: NaiveDate,

    /// Running balance of the target product after this row
    pub stock: Decimal,
}
