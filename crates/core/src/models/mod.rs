pub mod inventory;
pub mod movement;
pub mod product;
pub mod series;
pub mod settings;
pub mod valuation;
