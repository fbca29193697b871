use rust_decimal::Decimal;

use crate::errors::CoreError;
use crate::models::inventory::Inventory;
use crate::models::product::Product;

/// Manages the product catalog: creation, in-place updates, and cascading
/// removal.
///
/// Pure business logic — no I/O. Easy to test.
pub struct CatalogService;

impl CatalogService {
    pub fn new() -> Self {
        Self
    }

    /// Add a new product with a zero initial-stock baseline.
    /// Validates name, cost, and price, and assigns the next free id.
    pub fn add_product(
        &self,
        inventory: &mut Inventory,
        name: impl Into<String>,
        cost: Decimal,
        price: Decimal,
    ) -> Result<Product, CoreError> {
        self.add_product_with_initial_stock(inventory, name, cost, price, Decimal::ZERO)
    }

    /// Add a new product, seeding its initial-stock baseline.
    /// The baseline is set once here and never mutated afterwards.
    pub fn add_product_with_initial_stock(
        &self,
        inventory: &mut Inventory,
        name: impl Into<String>,
        cost: Decimal,
        price: Decimal,
        initial_stock: Decimal,
    ) -> Result<Product, CoreError> {
        let name = name.into();
        Self::validate_name(&name)?;
        Self::validate_cost(cost)?;
        Self::validate_price(price)?;
        if initial_stock < Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Initial stock must not be negative".into(),
            ));
        }

        let id = Self::next_id(inventory)?;
        let product = Product::new(id, name.trim(), cost, price);
        inventory.products.push(product.clone());
        inventory
            .initial_stock
            .insert(id, initial_stock.round_dp(2));
        Ok(product)
    }

    /// Update an existing product in place. Only supplied fields change;
    /// each supplied field is validated under the same rules as creation.
    pub fn update_product(
        &self,
        inventory: &mut Inventory,
        product_id: u32,
        name: Option<String>,
        cost: Option<Decimal>,
        price: Option<Decimal>,
    ) -> Result<(), CoreError> {
        if !inventory.products.iter().any(|p| p.id == product_id) {
            return Err(CoreError::ProductNotFound(product_id));
        }

        // Validate everything before touching the product
        if let Some(ref name) = name {
            Self::validate_name(name)?;
        }
        if let Some(cost) = cost {
            Self::validate_cost(cost)?;
        }
        if let Some(price) = price {
            Self::validate_price(price)?;
        }

        if let Some(product) = inventory.products.iter_mut().find(|p| p.id == product_id) {
            if let Some(name) = name {
                product.name = name.trim().to_string();
            }
            if let Some(cost) = cost {
                product.cost = cost.round_dp(2);
            }
            if let Some(price) = price {
                product.price = price.round_dp(2);
            }
        }
        Ok(())
    }

    /// Remove a product and everything referencing it: every movement with
    /// its id and its initial-stock baseline. Hard cascade, irreversible.
    pub fn remove_product(
        &self,
        inventory: &mut Inventory,
        product_id: u32,
    ) -> Result<(), CoreError> {
        let idx = inventory
            .products
            .iter()
            .position(|p| p.id == product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;

        inventory.products.remove(idx);
        inventory.movements.retain(|m| m.product_id != product_id);
        inventory.initial_stock.remove(&product_id);
        Ok(())
    }

    /// Look up a product by id.
    pub fn find_product<'a>(
        &self,
        inventory: &'a Inventory,
        product_id: u32,
    ) -> Option<&'a Product> {
        inventory.products.iter().find(|p| p.id == product_id)
    }

    /// Next free id: one past the largest live id, or 1 for an empty catalog.
    /// Fails once the id space is exhausted rather than wrapping.
    fn next_id(inventory: &Inventory) -> Result<u32, CoreError> {
        let max_id = inventory.products.iter().map(|p| p.id).max().unwrap_or(0);
        max_id
            .checked_add(1)
            .ok_or_else(|| CoreError::ValidationError("Product id space is exhausted".into()))
    }

    fn validate_name(name: &str) -> Result<(), CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Product name must not be empty".into(),
            ));
        }
        // The report format is line-oriented: names must stay on one line
        if name.chars().any(char::is_control) {
            return Err(CoreError::ValidationError(
                "Product name must not contain control characters".into(),
            ));
        }
        Ok(())
    }

    fn validate_cost(cost: Decimal) -> Result<(), CoreError> {
        if cost <= Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Product cost must be positive".into(),
            ));
        }
        Ok(())
    }

    fn validate_price(price: Decimal) -> Result<(), CoreError> {
        if price <= Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Product price must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}
