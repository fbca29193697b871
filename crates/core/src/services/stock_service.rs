use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::errors::CoreError;
use crate::models::inventory::Inventory;
use crate::models::movement::Movement;

/// Manages the movement log and computes running stock balances.
///
/// Pure business logic — no I/O. The log is append-only: rows are never
/// edited or reordered, and balances are recomputed from scratch on demand.
pub struct StockService;

impl StockService {
    pub fn new() -> Self {
        Self
    }

    /// Append a movement row to the log.
    ///
    /// The product must exist and at least one quantity must be nonzero.
    /// The resulting balance is NOT checked: an exit may drive stock
    /// negative. Enforcement belongs to the caller, see
    /// [`validate_exit_covered`](Self::validate_exit_covered).
    pub fn record_movement(
        &self,
        inventory: &mut Inventory,
        movement: Movement,
    ) -> Result<(), CoreError> {
        self.validate_movement(inventory, &movement)?;
        inventory.movements.push(movement);
        Ok(())
    }

    /// Advisory check for exit movements: fails when taking `quantity` out
    /// of `product_id` would exceed the current balance.
    pub fn validate_exit_covered(
        &self,
        inventory: &Inventory,
        product_id: u32,
        quantity: Decimal,
    ) -> Result<(), CoreError> {
        let available = self.current_stock(inventory, product_id);
        if quantity > available {
            return Err(CoreError::ValidationError(format!(
                "Insufficient stock for product {product_id}: requested {quantity}, available {available}"
            )));
        }
        Ok(())
    }

    /// Current balance for one product: initial stock plus all entries
    /// minus all exits. Unknown ids report zero.
    pub fn current_stock(&self, inventory: &Inventory, product_id: u32) -> Decimal {
        self.all_current_stocks(inventory)
            .get(&product_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Balances for every known product id in a single pass over the log.
    ///
    /// Seeded from the initial-stock baseline; ids that appear only in
    /// movement rows (orphans) still get an entry. Each accumulation step
    /// re-rounds to 2 decimals, the report's fixed precision.
    pub fn all_current_stocks(&self, inventory: &Inventory) -> HashMap<u32, Decimal> {
        let mut stocks: HashMap<u32, Decimal> = inventory
            .initial_stock
            .iter()
            .map(|(id, quantity)| (*id, quantity.round_dp(2)))
            .collect();

        for movement in &inventory.movements {
            let stock = stocks.entry(movement.product_id).or_insert(Decimal::ZERO);
            *stock = (*stock + movement.delta()).round_dp(2);
        }
        stocks
    }

    /// Validate a movement row before appending it.
    ///
    /// Rules:
    /// - The product id must be in the catalog
    /// - Neither quantity may be negative
    /// - At least one quantity must be nonzero
    fn validate_movement(
        &self,
        inventory: &Inventory,
        movement: &Movement,
    ) -> Result<(), CoreError> {
        if !inventory
            .products
            .iter()
            .any(|p| p.id == movement.product_id)
        {
            return Err(CoreError::ProductNotFound(movement.product_id));
        }
        if movement.quantity_in < Decimal::ZERO || movement.quantity_out < Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Movement quantities must not be negative".into(),
            ));
        }
        if movement.quantity_in.is_zero() && movement.quantity_out.is_zero() {
            return Err(CoreError::ValidationError(
                "Movement must carry an entry or an exit quantity".into(),
            ));
        }
        Ok(())
    }
}

impl Default for StockService {
    fn default() -> Self {
        Self::new()
    }
}
