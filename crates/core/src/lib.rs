pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use models::{
    inventory::Inventory,
    movement::Movement,
    product::Product,
    series::StockPoint,
    settings::Settings,
    valuation::ValuationSummary,
};
use rust_decimal::Decimal;
use services::{
    catalog_service::CatalogService, series_service::SeriesService,
    stock_service::StockService, valuation_service::ValuationService,
};
use std::collections::HashMap;
use storage::manager::StorageManager;

use errors::CoreError;

/// Main entry point for the Inventory Tracker core library.
/// Holds the inventory state and all services needed to operate on it.
#[must_use]
pub struct InventoryTracker {
    inventory: Inventory,
    catalog_service: CatalogService,
    stock_service: StockService,
    valuation_service: ValuationService,
    series_service: SeriesService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for InventoryTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryTracker")
            .field("products", &self.inventory.products.len())
            .field("movements", &self.inventory.movements.len())
            .field("settings", &self.inventory.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl InventoryTracker {
    /// Create a brand new empty inventory with default settings.
    pub fn create_new() -> Self {
        let inventory = Inventory::default();
        Self::build(inventory)
    }

    /// Load an existing inventory from report text.
    /// Use this when the caller handles file I/O itself.
    pub fn load_from_str(text: &str) -> Result<Self, CoreError> {
        let inventory = StorageManager::load_from_string(text)?;
        Ok(Self::build(inventory))
    }

    /// Render the current inventory to report text.
    /// Clears the unsaved-changes flag.
    #[must_use]
    pub fn save_to_string(&mut self) -> String {
        let text = StorageManager::save_to_string(&self.inventory);
        self.dirty = false;
        text
    }

    /// Load from a report file on disk.
    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let inventory = StorageManager::load_from_file(path)?;
        Ok(Self::build(inventory))
    }

    /// Save to a report file on disk.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_file(&mut self, path: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.inventory, path)?;
        self.dirty = false;
        Ok(())
    }

    /// Merge report text into the current inventory.
    ///
    /// A non-empty catalog section replaces the whole catalog (and resets
    /// the initial-stock baseline to zero); a non-empty movements section
    /// replaces the whole log. Rows that fail to parse are skipped.
    pub fn import_report(&mut self, text: &str) -> Result<(), CoreError> {
        StorageManager::import_into(&mut self.inventory, text)?;
        self.dirty = true;
        Ok(())
    }

    // ── Catalog Management ──────────────────────────────────────────

    /// Add a product to the catalog. Assigns the next free id and seeds
    /// a zero initial-stock baseline. Returns the stored product.
    pub fn add_product(
        &mut self,
        name: impl Into<String>,
        cost: Decimal,
        price: Decimal,
    ) -> Result<Product, CoreError> {
        let product = self
            .catalog_service
            .add_product(&mut self.inventory, name, cost, price)?;
        self.dirty = true;
        Ok(product)
    }

    /// Add a product whose opening balance is already known, without
    /// fabricating a movement row for it.
    pub fn add_product_with_initial_stock(
        &mut self,
        name: impl Into<String>,
        cost: Decimal,
        price: Decimal,
        initial_stock: Decimal,
    ) -> Result<Product, CoreError> {
        let product = self.catalog_service.add_product_with_initial_stock(
            &mut self.inventory,
            name,
            cost,
            price,
            initial_stock,
        )?;
        self.dirty = true;
        Ok(product)
    }

    /// Update an existing product by its id. Only supplied fields change.
    /// Validates each supplied field before committing.
    pub fn update_product(
        &mut self,
        product_id: u32,
        name: Option<String>,
        cost: Option<Decimal>,
        price: Option<Decimal>,
    ) -> Result<(), CoreError> {
        self.catalog_service
            .update_product(&mut self.inventory, product_id, name, cost, price)?;
        self.dirty = true;
        Ok(())
    }

    /// Remove a product by its id.
    ///
    /// **Important**: this cascades. Every movement for the product and
    /// its initial-stock entry are deleted with it, irreversibly.
    pub fn remove_product(&mut self, product_id: u32) -> Result<(), CoreError> {
        self.catalog_service
            .remove_product(&mut self.inventory, product_id)?;
        self.dirty = true;
        Ok(())
    }

    /// Get a single product by its id.
    #[must_use]
    pub fn get_product(&self, product_id: u32) -> Option<&Product> {
        self.catalog_service
            .find_product(&self.inventory, product_id)
    }

    /// Get the whole catalog, in insertion order.
    #[must_use]
    pub fn get_products(&self) -> &[Product] {
        &self.inventory.products
    }

    /// Get the number of catalogued products.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.inventory.products.len()
    }

    // ── Movements ───────────────────────────────────────────────────

    /// Append a movement to the log. `date` defaults to today.
    ///
    /// The product must exist and at least one quantity must be nonzero.
    /// The resulting balance is not checked; an exit may drive stock
    /// negative (see [`record_exit_checked`](Self::record_exit_checked)).
    pub fn record_movement(
        &mut self,
        product_id: u32,
        quantity_in: Decimal,
        quantity_out: Decimal,
        date: Option<NaiveDate>,
    ) -> Result<(), CoreError> {
        let date = date.unwrap_or_else(|| chrono::Utc::now().date_naive());
        let movement = Movement::new(product_id, quantity_in, quantity_out, date);
        self.stock_service
            .record_movement(&mut self.inventory, movement)?;
        self.dirty = true;
        Ok(())
    }

    /// Append a stock entry (goods received). `date` defaults to today.
    pub fn record_entry(
        &mut self,
        product_id: u32,
        quantity: Decimal,
        date: Option<NaiveDate>,
    ) -> Result<(), CoreError> {
        self.record_movement(product_id, quantity, Decimal::ZERO, date)
    }

    /// Append a stock exit (goods sold or consumed). `date` defaults to today.
    pub fn record_exit(
        &mut self,
        product_id: u32,
        quantity: Decimal,
        date: Option<NaiveDate>,
    ) -> Result<(), CoreError> {
        self.record_movement(product_id, Decimal::ZERO, quantity, date)
    }

    /// Append a stock exit, but first fail if it would exceed the current
    /// balance. This is the opt-in guarded variant of [`record_exit`](Self::record_exit);
    /// the log itself stays permissive.
    pub fn record_exit_checked(
        &mut self,
        product_id: u32,
        quantity: Decimal,
        date: Option<NaiveDate>,
    ) -> Result<(), CoreError> {
        self.stock_service
            .validate_exit_covered(&self.inventory, product_id, quantity)?;
        self.record_exit(product_id, quantity, date)
    }

    /// Check whether an exit of `quantity` is covered by the current
    /// balance, without recording anything.
    pub fn validate_exit_covered(
        &self,
        product_id: u32,
        quantity: Decimal,
    ) -> Result<(), CoreError> {
        self.stock_service
            .validate_exit_covered(&self.inventory, product_id, quantity)
    }

    /// Get the whole movement log, in append order.
    #[must_use]
    pub fn get_movements(&self) -> &[Movement] {
        &self.inventory.movements
    }

    /// Get the movements for one product, in log order.
    #[must_use]
    pub fn get_movements_for_product(&self, product_id: u32) -> Vec<&Movement> {
        self.inventory
            .movements
            .iter()
            .filter(|m| m.product_id == product_id)
            .collect()
    }

    /// Get the movements within a date range (inclusive), in log order.
    #[must_use]
    pub fn get_movements_in_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Movement> {
        self.inventory
            .movements
            .iter()
            .filter(|m| m.date >= from && m.date <= to)
            .collect()
    }

    /// Get the total number of movement rows.
    #[must_use]
    pub fn movement_count(&self) -> usize {
        self.inventory.movements.len()
    }

    // ── Stock & Valuation ───────────────────────────────────────────

    /// Current balance for one product. Unknown ids report zero.
    #[must_use]
    pub fn current_stock(&self, product_id: u32) -> Decimal {
        self.stock_service.current_stock(&self.inventory, product_id)
    }

    /// Current balances for every known product id, one pass over the log.
    #[must_use]
    pub fn all_current_stocks(&self) -> HashMap<u32, Decimal> {
        self.stock_service.all_current_stocks(&self.inventory)
    }

    /// Total acquisition value of everything in stock (Σ stock × cost).
    #[must_use]
    pub fn inventory_value(&self) -> Decimal {
        self.valuation_service.inventory_value(&self.inventory)
    }

    /// Total revenue if the whole stock sold at list price (Σ stock × price).
    #[must_use]
    pub fn potential_sale_value(&self) -> Decimal {
        self.valuation_service.potential_sale_value(&self.inventory)
    }

    /// Per-product valuation breakdown with catalog-wide totals, as of today.
    #[must_use]
    pub fn valuation_summary(&self) -> ValuationSummary {
        let today = chrono::Utc::now().date_naive();
        self.valuation_service
            .valuation_summary(&self.inventory, today)
    }

    // ── Time Series ─────────────────────────────────────────────────

    /// Running-balance history for one product, one point per log row.
    /// See [`SeriesService::stock_time_series`] for the exact shape.
    #[must_use]
    pub fn stock_time_series(&self, product_id: u32) -> Vec<StockPoint> {
        self.series_service
            .stock_time_series(&self.inventory, product_id)
    }

    // ── Settings & Dirty State ──────────────────────────────────────

    /// Get the organization name printed in the report banner.
    #[must_use]
    pub fn organization(&self) -> &str {
        &self.inventory.settings.organization
    }

    /// Set the organization name printed in the report banner.
    /// The banner is a single line, so the name must not contain line breaks.
    pub fn set_organization(&mut self, name: impl Into<String>) -> Result<(), CoreError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::ValidationError(
                "Organization name must not be empty".into(),
            ));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(CoreError::ValidationError(
                "Organization name must not contain control characters".into(),
            ));
        }
        self.inventory.settings.organization = trimmed.to_string();
        self.dirty = true;
        Ok(())
    }

    /// Get current settings.
    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.inventory.settings
    }

    /// Returns `true` if the inventory has been modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Convenience Helpers ─────────────────────────────────────────

    /// Date of the oldest movement in the log, if any.
    /// The log is append-ordered, not date-ordered, so this scans it.
    #[must_use]
    pub fn earliest_movement_date(&self) -> Option<NaiveDate> {
        self.inventory.movements.iter().map(|m| m.date).min()
    }

    /// Date of the newest movement in the log, if any.
    #[must_use]
    pub fn latest_movement_date(&self) -> Option<NaiveDate> {
        self.inventory.movements.iter().map(|m| m.date).max()
    }

    // ── Bulk Operations ─────────────────────────────────────────────

    /// Append multiple movements at once. All rows are validated first;
    /// if any row fails validation, none are appended (all-or-nothing).
    /// Quantities are normalized to 2 decimal places, as on every entry path.
    pub fn record_movements(&mut self, movements: Vec<Movement>) -> Result<(), CoreError> {
        // Phase 1: Validate all rows against a temporary inventory state.
        // Rows can arrive via serde, so re-normalize through the constructor.
        let mut temp_inventory = self.inventory.clone();
        for movement in movements {
            let movement = Movement::new(
                movement.product_id,
                movement.quantity_in,
                movement.quantity_out,
                movement.date,
            );
            self.stock_service
                .record_movement(&mut temp_inventory, movement)?;
        }

        // Phase 2: All valid — apply to the real inventory
        self.inventory = temp_inventory;
        self.dirty = true;
        Ok(())
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export the full inventory as JSON (snapshot for debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.inventory)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize inventory: {e}")))
    }

    /// Export the movement log as a JSON string.
    pub fn export_movements_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.inventory.movements).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize movements to JSON: {e}"))
        })
    }

    /// Import movements from a JSON string. Validates each row against the
    /// catalog (all-or-nothing). Returns the number of movements imported.
    pub fn import_movements_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let movements: Vec<Movement> = serde_json::from_str(json)?;
        let count = movements.len();
        self.record_movements(movements)?;
        Ok(count)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(inventory: Inventory) -> Self {
        let catalog_service = CatalogService::new();
        let stock_service = StockService::new();
        let valuation_service = ValuationService::new();
        let series_service = SeriesService::new();

        Self {
            inventory,
            catalog_service,
            stock_service,
            valuation_service,
            series_service,
            dirty: false,
        }
    }
}
