pub mod manager;
pub mod report;
pub mod spreadsheet;
