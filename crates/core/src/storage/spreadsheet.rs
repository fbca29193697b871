use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use super::report;

/// Number of header lines at the top of the sheet dump, always skipped.
pub const HEADER_ROWS: usize = 4;

/// Cell positions in the supplier sheet (0-based).
///
/// The sheet carries more columns (image, supplier, arrival and sale
/// dates, line totals); only these seven feed the conversion.
const COL_PURCHASE_DATE: usize = 2;
const COL_NAME: usize = 3;
const COL_QUANTITY_BOUGHT: usize = 4;
const COL_UNIT_COST: usize = 5;
const COL_SALE_PRICE: usize = 10;
const COL_QUANTITY_SOLD: usize = 11;
const COL_REMAINING_STOCK: usize = 14;

/// One sheet row after cell extraction and validation.
///
/// `remaining_stock` is what the sheet claims is left; the conversion
/// ignores it and recomputes the balance from bought minus sold.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetRow {
    pub purchase_date: Option<NaiveDate>,
    pub name: String,
    pub quantity_bought: Decimal,
    pub unit_cost: Decimal,
    pub sale_price: Decimal,
    pub quantity_sold: Decimal,
    pub remaining_stock: Decimal,
}

/// One catalog entry accumulated from every row sharing a product name.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: u32,
    pub name: String,
    pub cost: Decimal,
    pub price: Decimal,
    pub stock_total: Decimal,
    pub purchases: Vec<(NaiveDate, Decimal)>,
}

/// Convert a supplier sheet dumped as CSV text straight to report text.
#[must_use]
pub fn convert_spreadsheet_csv(input: &str, organization: &str) -> String {
    let rows = parse_rows(input);
    render_report(&group_rows(&rows), organization)
}

/// Parse a whole sheet dump. The first [`HEADER_ROWS`] lines are the
/// sheet's header block; blank lines skip quietly, rows that fail
/// validation skip with a log line.
#[must_use]
pub fn parse_rows(input: &str) -> Vec<SpreadsheetRow> {
    let mut rows = Vec::new();
    for (index, line) in input.lines().enumerate() {
        if index < HEADER_ROWS || line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Some(row) => rows.push(row),
            None => debug!("Skipping spreadsheet row {}: {}", index + 1, line),
        }
    }
    rows
}

/// Parse one data line into a validated row.
///
/// Returns `None` for every row the conversion must drop: all cells
/// empty, name missing or formula-valued, a formula in the bought or
/// cost cells, unparsable text in any numeric cell, or a zero cost or
/// zero bought quantity. Formulas in the optional cells (sale price,
/// sold, remaining stock) degrade to zero instead.
#[must_use]
pub fn parse_row(line: &str) -> Option<SpreadsheetRow> {
    let fields = report::split_fields(line);
    if fields.iter().all(|field| field.trim().is_empty()) {
        return None;
    }

    let name = cell(&fields, COL_NAME);
    if name.is_empty() || name.starts_with('=') {
        return None;
    }

    let quantity_bought = required_number(cell(&fields, COL_QUANTITY_BOUGHT))?;
    let unit_cost = required_number(cell(&fields, COL_UNIT_COST))?;
    let sale_price = lenient_number(cell(&fields, COL_SALE_PRICE))?;
    let quantity_sold = lenient_number(cell(&fields, COL_QUANTITY_SOLD))?;
    let remaining_stock = lenient_number(cell(&fields, COL_REMAINING_STOCK))?;

    if unit_cost.is_zero() || quantity_bought.is_zero() {
        return None;
    }

    let purchase_date = NaiveDate::parse_from_str(cell(&fields, COL_PURCHASE_DATE), "%Y-%m-%d").ok();

    Some(SpreadsheetRow {
        purchase_date,
        name: name.to_string(),
        quantity_bought,
        unit_cost,
        sale_price,
        quantity_sold,
        remaining_stock,
    })
}

/// Fold validated rows into catalog entries, in first-seen name order.
///
/// Ids are handed out sequentially from 1. The first row for a name
/// fixes the cost; the price starts at that row's sale price (or twice
/// the cost when the sheet has none) and later rows can only raise it.
/// Rows without a parsable purchase date count as bought today.
#[must_use]
pub fn group_rows(rows: &[SpreadsheetRow]) -> Vec<CatalogEntry> {
    let mut entries: Vec<CatalogEntry> = Vec::new();
    let today = Utc::now().date_naive();

    for row in rows {
        let sale_candidate = if row.sale_price.is_zero() {
            row.unit_cost * Decimal::TWO
        } else {
            row.sale_price
        };

        let index = match entries.iter().position(|entry| entry.name == row.name) {
            Some(index) => index,
            None => {
                let price = if sale_candidate > Decimal::ZERO {
                    sale_candidate
                } else {
                    row.unit_cost * Decimal::TWO
                };
                entries.push(CatalogEntry {
                    id: entries.len() as u32 + 1,
                    name: row.name.clone(),
                    cost: row.unit_cost,
                    price,
                    stock_total: Decimal::ZERO,
                    purchases: Vec::new(),
                });
                entries.len() - 1
            }
        };

        let entry = &mut entries[index];
        if sale_candidate > entry.price {
            entry.price = sale_candidate;
        }
        entry.stock_total += row.quantity_bought - row.quantity_sold;
        entry
            .purchases
            .push((row.purchase_date.unwrap_or(today), row.quantity_bought));
    }

    entries
}

/// Render catalog entries in the report wire format.
///
/// The stock column and the RESUMEN totals come from the grouped
/// bought-minus-sold balance, while MOVIMIENTOS carries the purchase
/// entries only. Re-importing the file therefore recomputes stock from
/// purchases alone, not from the printed column.
#[must_use]
pub fn render_report(entries: &[CatalogEntry], organization: &str) -> String {
    let mut out = String::new();
    out.push_str(report::BANNER_PREFIX);
    out.push_str(organization);
    out.push_str(report::BANNER_SUFFIX);
    out.push('\n');
    out.push('\n');

    out.push_str(report::SECTION_CATALOG);
    out.push('\n');
    out.push_str(report::CATALOG_HEADER);
    out.push('\n');
    for entry in entries {
        out.push_str(&format!(
            "{},{},{:.2},{:.2},{:.2}\n",
            entry.id,
            report::escape_field(&entry.name),
            entry.cost.round_dp(2),
            entry.price.round_dp(2),
            entry.stock_total.round_dp(2),
        ));
    }
    out.push('\n');

    let inventory_value: Decimal = entries
        .iter()
        .map(|entry| entry.stock_total * entry.cost)
        .sum();
    let sale_value: Decimal = entries
        .iter()
        .map(|entry| entry.stock_total * entry.price)
        .sum();
    out.push_str(report::SECTION_SUMMARY);
    out.push('\n');
    out.push_str(&format!("valor_inventario,{:.2}\n", inventory_value.round_dp(2)));
    out.push_str(&format!(
        "valor_venta_potencial,{:.2}\n",
        sale_value.round_dp(2)
    ));
    out.push('\n');

    out.push_str(report::SECTION_MOVEMENTS);
    out.push('\n');
    out.push_str(report::MOVEMENTS_HEADER);
    out.push('\n');
    for entry in entries {
        for (date, quantity) in &entry.purchases {
            out.push_str(&format!(
                "{},{},{:.2},0.00\n",
                date.format("%Y-%m-%d"),
                entry.id,
                quantity.round_dp(2),
            ));
        }
    }
    out
}

/// Cell text at `index`, trimmed; empty when the row is too short.
fn cell(fields: &[String], index: usize) -> &str {
    fields.get(index).map(|field| field.trim()).unwrap_or("")
}

/// Required numeric cell: empty degrades to zero, a formula or
/// unparsable text disqualifies the whole row.
fn required_number(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return Some(Decimal::ZERO);
    }
    if raw.starts_with('=') {
        return None;
    }
    raw.parse().ok()
}

/// Lenient numeric cell: empty and formulas degrade to zero, unparsable
/// text still disqualifies the row.
fn lenient_number(raw: &str) -> Option<Decimal> {
    if raw.is_empty() || raw.starts_with('=') {
        return Some(Decimal::ZERO);
    }
    raw.parse().ok()
}
