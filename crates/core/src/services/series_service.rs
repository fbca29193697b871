use rust_decimal::Decimal;

use crate::models::inventory::Inventory;
use crate::models::movement::Movement;
use crate::models::series::StockPoint;

/// Builds per-product stock histories out of the movement log.
pub struct SeriesService;

impl SeriesService {
    pub fn new() -> Self {
        Self
    }

    /// Discrete step function of the running balance for `product_id`,
    /// sampled at every movement in the log.
    ///
    /// The whole log is sorted by date (stable, so same-day rows keep
    /// insertion order) and walked once. Rows for other products emit a
    /// point too, carrying the last balance forward, so the series always
    /// has one point per log row. Unknown ids yield a flat series at
    /// their initial-stock level.
    #[must_use]
    pub fn stock_time_series(&self, inventory: &Inventory, product_id: u32) -> Vec<StockPoint> {
        let mut ordered: Vec<&Movement> = inventory.movements.iter().collect();
        ordered.sort_by_key(|movement| movement.date);

        let mut stock = inventory
            .initial_stock
            .get(&product_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
            .round_dp(2);

        let mut points = Vec::with_capacity(ordered.len());
        for movement in ordered {
            if movement.product_id == product_id {
                stock = (stock + movement.delta()).round_dp(2);
            }
            points.push(StockPoint {
                date: movement.date,
                stock,
            });
        }
        points
    }
}

impl Default for SeriesService {
    fn default() -> Self {
        Self::new()
    }
}
