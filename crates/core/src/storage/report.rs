use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::inventory::Inventory;
use crate::models::movement::Movement;
use crate::models::product::Product;
use crate::services::stock_service::StockService;
use crate::services::valuation_service::ValuationService;

/// Banner framing around the organization name on the first report line.
pub const BANNER_PREFIX: &str = "== REPORTE INVENTARIO ";
pub const BANNER_SUFFIX: &str = " ==";

/// Section tokens, written alone on their own line.
pub const SECTION_CATALOG: &str = "CATALOGO";
pub const SECTION_SUMMARY: &str = "RESUMEN";
pub const SECTION_MOVEMENTS: &str = "MOVIMIENTOS";

/// Column header rows for the two tabular sections.
pub const CATALOG_HEADER: &str = "id,nombre,costo,precio,stock_actual";
pub const MOVEMENTS_HEADER: &str = "fecha,id_producto,entrada,salida";

/// Everything a report scan recovered, before any log replacement happens.
///
/// `saw_section` records whether at least one section token was present;
/// a text with none of them is not a report at all, as opposed to a report
/// whose sections are merely empty.
#[derive(Debug, Default)]
pub struct ParsedReport {
    pub organization: Option<String>,
    pub products: Vec<Product>,
    pub movements: Vec<Movement>,
    pub saw_section: bool,
}

/// Render the complete report: banner, CATALOGO, RESUMEN, MOVIMIENTOS.
///
/// The `stock_actual` column and the whole RESUMEN section are derived
/// figures, recomputed from the movement log on every export. They are
/// never read back on import.
#[must_use]
pub fn write_report(inventory: &Inventory) -> String {
    let stock_service = StockService::new();
    let valuation_service = ValuationService::new();
    let stocks = stock_service.all_current_stocks(inventory);

    let mut out = String::new();
    out.push_str(BANNER_PREFIX);
    out.push_str(&inventory.settings.organization);
    out.push_str(BANNER_SUFFIX);
    out.push('\n');
    out.push('\n');

    out.push_str(SECTION_CATALOG);
    out.push('\n');
    out.push_str(CATALOG_HEADER);
    out.push('\n');
    for product in &inventory.products {
        let stock = stocks.get(&product.id).copied().unwrap_or(Decimal::ZERO);
        out.push_str(&format!(
            "{},{},{:.2},{:.2},{:.2}\n",
            product.id,
            escape_field(&product.name),
            product.cost,
            product.price,
            stock,
        ));
    }
    out.push('\n');

    out.push_str(SECTION_SUMMARY);
    out.push('\n');
    out.push_str(&format!(
        "valor_inventario,{:.2}\n",
        valuation_service.inventory_value(inventory)
    ));
    out.push_str(&format!(
        "valor_venta_potencial,{:.2}\n",
        valuation_service.potential_sale_value(inventory)
    ));
    out.push('\n');

    out.push_str(SECTION_MOVEMENTS);
    out.push('\n');
    out.push_str(MOVEMENTS_HEADER);
    out.push('\n');
    for movement in &inventory.movements {
        out.push_str(&format!(
            "{},{},{:.2},{:.2}\n",
            movement.date.format("%Y-%m-%d"),
            movement.product_id,
            movement.quantity_in,
            movement.quantity_out,
        ));
    }
    out
}

/// Scan report text line by line.
///
/// Section tokens switch the active section; RESUMEN switches it off so
/// derived figures are never ingested. Banner lines are skipped, except
/// that an organization name found between the banner markers is captured.
/// Header rows and rows that fail to parse are skipped silently (the
/// latter with a log line); no business validation happens here.
#[must_use]
pub fn parse_report(text: &str) -> ParsedReport {
    enum Section {
        None,
        Catalog,
        Movements,
    }

    let mut section = Section::None;
    let mut report = ParsedReport::default();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("==") {
            if let Some(org) = line
                .strip_prefix(BANNER_PREFIX)
                .and_then(|rest| rest.strip_suffix(BANNER_SUFFIX))
            {
                if !org.is_empty() {
                    report.organization = Some(org.to_string());
                }
            }
            continue;
        }

        match line {
            SECTION_CATALOG => {
                section = Section::Catalog;
                report.saw_section = true;
                continue;
            }
            SECTION_MOVEMENTS => {
                section = Section::Movements;
                report.saw_section = true;
                continue;
            }
            SECTION_SUMMARY => {
                section = Section::None;
                report.saw_section = true;
                continue;
            }
            _ => {}
        }

        match section {
            Section::Catalog => {
                if line.starts_with("id,") {
                    continue;
                }
                match parse_product_row(line) {
                    Some(product) => report.products.push(product),
                    None => warn!("Skipping invalid catalog row {}: {}", index + 1, line),
                }
            }
            Section::Movements => {
                if line.starts_with("fecha,") {
                    continue;
                }
                match parse_movement_row(line) {
                    Some(movement) => report.movements.push(movement),
                    None => warn!("Skipping invalid movement row {}: {}", index + 1, line),
                }
            }
            Section::None => {}
        }
    }

    report
}

fn parse_product_row(line: &str) -> Option<Product> {
    let fields = split_fields(line);
    if fields.len() < 4 {
        return None;
    }
    let id: u32 = fields[0].trim().parse().ok()?;
    let cost: Decimal = fields[2].trim().parse().ok()?;
    let price: Decimal = fields[3].trim().parse().ok()?;
    Some(Product::new(id, fields[1].as_str(), cost, price))
}

fn parse_movement_row(line: &str) -> Option<Movement> {
    let fields = split_fields(line);
    if fields.len() < 4 {
        return None;
    }
    let date = NaiveDate::parse_from_str(fields[0].trim(), "%Y-%m-%d").ok()?;
    let product_id: u32 = fields[1].trim().parse().ok()?;
    let quantity_in: Decimal = fields[2].trim().parse().ok()?;
    let quantity_out: Decimal = fields[3].trim().parse().ok()?;
    Some(Movement::new(product_id, quantity_in, quantity_out, date))
}

/// Quote a field that contains the delimiter, a quote or a line break,
/// doubling embedded quotes. Plain fields pass through untouched.
#[must_use]
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split one line into fields, honoring the quoting written by
/// [`escape_field`]. An unterminated quote runs to the end of the line.
#[must_use]
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
    }
    fields.push(current);
    fields
}
