use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monetary summary of the whole inventory at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationSummary {
    /// Date this summary was computed on
    pub as_of_date: chrono::NaiveDate,

    /// Number of products in the live catalog
    pub total_products: usize,

    /// Number of rows in the movement log
    pub total_movements: usize,

    /// Total worth of current stock at acquisition cost
    pub inventory_value: Decimal,

    /// Total worth of current stock at reference sale prices
    pub potential_sale_value: Decimal,

    /// potential_sale_value minus inventory_value
    pub potential_profit: Decimal,

    /// Per-product breakdown, in catalog order
    pub lines: Vec<ProductValuation>,
}

/// Valuation of a single catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductValuation {
    /// The product's id
    pub product_id: u32,

    /// The product's display name
    pub name: String,

    /// Current stock balance (derived)
    pub stock: Decimal,

    /// Acquisition cost per unit
    pub unit_cost: Decimal,

    /// Reference sale price per unit
    pub unit_price: Decimal,

    /// stock × unit_cost
    pub inventory_value: Decimal,

    /// stock × unit_price
    pub sale_value: Decimal,
}
