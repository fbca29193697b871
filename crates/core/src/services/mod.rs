pub mod catalog_service;
pub mod series_service;
pub mod stock_service;
pub mod valuation_service;
