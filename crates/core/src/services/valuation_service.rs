use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::inventory::Inventory;
use crate::models::valuation::{ProductValuation, ValuationSummary};
use crate::services::stock_service::StockService;

/// Computes monetary figures over the catalog and the current balances.
///
/// Only catalogued products contribute: orphaned movement rows carry no
/// cost or price and are therefore ignored here.
pub struct ValuationService {
    stock_service: StockService,
}

impl ValuationService {
    pub fn new() -> Self {
        Self {
            stock_service: StockService::new(),
        }
    }

    /// Total acquisition value: sum of current stock times unit cost over
    /// the whole catalog. Accumulates at full precision and rounds to
    /// 2 decimals once at the end.
    #[must_use]
    pub fn inventory_value(&self, inventory: &Inventory) -> Decimal {
        let stocks = self.stock_service.all_current_stocks(inventory);
        let total: Decimal = inventory
            .products
            .iter()
            .map(|product| {
                let stock = stocks.get(&product.id).copied().unwrap_or(Decimal::ZERO);
                stock * product.cost
            })
            .sum();
        total.round_dp(2)
    }

    /// Total revenue if every unit in stock were sold at its list price.
    /// Same accumulation and rounding rules as [`inventory_value`](Self::inventory_value).
    #[must_use]
    pub fn potential_sale_value(&self, inventory: &Inventory) -> Decimal {
        let stocks = self.stock_service.all_current_stocks(inventory);
        let total: Decimal = inventory
            .products
            .iter()
            .map(|product| {
                let stock = stocks.get(&product.id).copied().unwrap_or(Decimal::ZERO);
                stock * product.price
            })
            .sum();
        total.round_dp(2)
    }

    /// Full per-product breakdown plus catalog-wide totals, dated `as_of_date`.
    #[must_use]
    pub fn valuation_summary(&self, inventory: &Inventory, as_of_date: NaiveDate) -> ValuationSummary {
        let stocks = self.stock_service.all_current_stocks(inventory);

        let mut lines = Vec::with_capacity(inventory.products.len());
        let mut inventory_value = Decimal::ZERO;
        let mut potential_sale_value = Decimal::ZERO;

        for product in &inventory.products {
            let stock = stocks.get(&product.id).copied().unwrap_or(Decimal::ZERO);
            let line_value = stock * product.cost;
            let line_sale = stock * product.price;
            inventory_value += line_value;
            potential_sale_value += line_sale;

            lines.push(ProductValuation {
                product_id: product.id,
                name: product.name.clone(),
                stock,
                unit_cost: product.cost,
                unit_price: product.price,
                inventory_value: line_value.round_dp(2),
                sale_value: line_sale.round_dp(2),
            });
        }

        let inventory_value = inventory_value.round_dp(2);
        let potential_sale_value = potential_sale_value.round_dp(2);

        ValuationSummary {
            as_of_date,
            total_products: inventory.products.len(),
            total_movements: inventory.movements.len(),
            inventory_value,
            potential_sale_value,
            potential_profit: potential_sale_value - inventory_value,
            lines,
        }
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
