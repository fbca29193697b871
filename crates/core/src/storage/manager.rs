use rust_decimal::Decimal;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::inventory::Inventory;

use super::report;

/// High-level storage operations: save/load the inventory as report text or files.
pub struct StorageManager;

impl StorageManager {
    /// Render an inventory to report text (portable, plain UTF-8).
    ///
    /// Flow: Inventory → banner + CATALOGO + RESUMEN + MOVIMIENTOS string
    #[must_use]
    pub fn save_to_string(inventory: &Inventory) -> String {
        report::write_report(inventory)
    }

    /// Parse report text into a fresh inventory.
    pub fn load_from_string(text: &str) -> Result<Inventory, CoreError> {
        let mut inventory = Inventory::default();
        Self::import_into(&mut inventory, text)?;
        Ok(inventory)
    }

    /// Merge report text into an existing inventory.
    ///
    /// Replacement is per section: a non-empty parsed catalog replaces the
    /// whole catalog and resets every initial-stock entry to zero; a
    /// non-empty parsed movement list replaces the whole log. Empty or
    /// missing sections leave the current data untouched. Fails only when
    /// the text carries no section token at all.
    pub fn import_into(inventory: &mut Inventory, text: &str) -> Result<(), CoreError> {
        let parsed = report::parse_report(text);
        if !parsed.saw_section {
            return Err(CoreError::InvalidReportFormat(
                "No CATALOGO, RESUMEN or MOVIMIENTOS section found".into(),
            ));
        }

        if let Some(organization) = parsed.organization {
            inventory.settings.organization = organization;
        }

        if !parsed.products.is_empty() {
            inventory.initial_stock = parsed
                .products
                .iter()
                .map(|product| (product.id, Decimal::ZERO))
                .collect();
            inventory.products = parsed.products;
            debug!("Imported {} catalog products", inventory.products.len());
        }

        if !parsed.movements.is_empty() {
            inventory.movements = parsed.movements;
            debug!("Imported {} movements", inventory.movements.len());
        }

        Ok(())
    }

    /// Save inventory to a report file on disk.
    pub fn save_to_file(inventory: &Inventory, path: &str) -> Result<(), CoreError> {
        let text = Self::save_to_string(inventory);
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Load inventory from a report file on disk.
    pub fn load_from_file(path: &str) -> Result<Inventory, CoreError> {
        let text = std::fs::read_to_string(path)?;
        Self::load_from_string(&text)
    }
}
