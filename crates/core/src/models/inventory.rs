use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::movement::Movement;
use super::product::Product;
use super::settings::Settings;

/// The main data container. Everything in here gets rendered into the
/// tabular report (or a JSON snapshot) and saved to disk.
///
/// Contains: the live product catalog, the append-only movement log,
/// the per-product initial stock baseline, and user settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    /// Live catalog, in insertion order
    pub products: Vec<Product>,

    /// Movement log, in append order. Append order is the only ordering
    /// signal; rows are never edited or reordered in place.
    pub movements: Vec<Movement>,

    /// Baseline stock per product id, set once at product creation.
    /// Missing entries count as zero.
    #[serde(default)]
    pub initial_stock: HashMap<u32, Decimal>,

    /// User settings (organization name for the report banner)
    pub settings: Settings,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            movements: Vec::new(),
            initial_stock: HashMap::new(),
            settings: Settings::default(),
        }
    }
}
