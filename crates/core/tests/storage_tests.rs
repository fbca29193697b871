// ═══════════════════════════════════════════════════════════════════
// Storage Tests — report format, field escaping, StorageManager
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use inventory_tracker_core::errors::CoreError;
use inventory_tracker_core::models::inventory::Inventory;
use inventory_tracker_core::models::movement::Movement;
use inventory_tracker_core::models::product::Product;
use inventory_tracker_core::storage::manager::StorageManager;
use inventory_tracker_core::storage::report::{
    escape_field, parse_report, split_fields, write_report,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Two products, three movements. Stock: product 1 → 7.00, product 2 → 15.00.
fn sample_inventory() -> Inventory {
    let mut inv = Inventory::default();
    inv.products
        .push(Product::new(1, "Faja magnetica", dec!(10.00), dec!(20.00)));
    inv.products
        .push(Product::new(2, "Rodillera deportiva", dec!(4.50), dec!(9.90)));
    inv.initial_stock.insert(1, Decimal::ZERO);
    inv.initial_stock.insert(2, Decimal::ZERO);
    inv.movements.push(Movement::entry(1, dec!(10.00), d(2025, 3, 1)));
    inv.movements.push(Movement::exit(1, dec!(3.00), d(2025, 3, 5)));
    inv.movements.push(Movement::entry(2, dec!(15.00), d(2025, 3, 2)));
    inv
}

// ═══════════════════════════════════════════════════════════════════
// Field escaping / splitting
// ═══════════════════════════════════════════════════════════════════

mod field_escaping {
    use super::*;

    #[test]
    fn plain_field_untouched() {
        assert_eq!(escape_field("Faja magnetica"), "Faja magnetica");
    }

    #[test]
    fn comma_field_quoted() {
        assert_eq!(escape_field("Venda, elastica"), "\"Venda, elastica\"");
    }

    #[test]
    fn embedded_quotes_doubled() {
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn newline_field_quoted() {
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn empty_field_untouched() {
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn split_plain_fields() {
        assert_eq!(split_fields("1,abc,2.50"), vec!["1", "abc", "2.50"]);
    }

    #[test]
    fn split_keeps_empty_fields() {
        assert_eq!(split_fields(",,"), vec!["", "", ""]);
    }

    #[test]
    fn split_quoted_comma() {
        assert_eq!(
            split_fields("1,\"Venda, elastica\",2.50"),
            vec!["1", "Venda, elastica", "2.50"]
        );
    }

    #[test]
    fn split_doubled_quotes() {
        assert_eq!(split_fields("\"say \"\"hi\"\"\",x"), vec!["say \"hi\"", "x"]);
    }

    #[test]
    fn split_unterminated_quote_runs_to_end() {
        assert_eq!(split_fields("\"no end, here"), vec!["no end, here"]);
    }

    #[test]
    fn escape_then_split_roundtrip() {
        for original in ["plain", "with, comma", "with \"quotes\"", "both, \"of\" them", ""] {
            let line = format!("{},tail", escape_field(original));
            let fields = split_fields(&line);
            assert_eq!(fields[0], original);
            assert_eq!(fields[1], "tail");
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Report rendering
// ═══════════════════════════════════════════════════════════════════

mod report_rendering {
    use super::*;

    #[test]
    fn starts_with_banner() {
        let text = write_report(&sample_inventory());
        assert!(text.starts_with("== REPORTE INVENTARIO BIO SALUD NATURAL SpA ==\n"));
    }

    #[test]
    fn sections_appear_in_order() {
        let text = write_report(&sample_inventory());
        let catalog = text.find("CATALOGO").unwrap();
        let summary = text.find("RESUMEN").unwrap();
        let movements = text.find("MOVIMIENTOS").unwrap();
        assert!(catalog < summary);
        assert!(summary < movements);
    }

    #[test]
    fn header_rows_present() {
        let text = write_report(&sample_inventory());
        assert!(text.contains("id,nombre,costo,precio,stock_actual\n"));
        assert!(text.contains("fecha,id_producto,entrada,salida\n"));
    }

    #[test]
    fn catalog_rows_carry_derived_stock() {
        let text = write_report(&sample_inventory());
        assert!(text.contains("1,Faja magnetica,10.00,20.00,7.00\n"));
        assert!(text.contains("2,Rodillera deportiva,4.50,9.90,15.00\n"));
    }

    #[test]
    fn stock_column_tracks_the_log() {
        let mut inv = sample_inventory();
        inv.movements.push(Movement::exit(1, dec!(2.00), d(2025, 3, 9)));
        let text = write_report(&inv);
        assert!(text.contains("1,Faja magnetica,10.00,20.00,5.00\n"));
    }

    #[test]
    fn summary_values_computed() {
        // 7 × 10.00 + 15 × 4.50 = 137.50; 7 × 20.00 + 15 × 9.90 = 288.50
        let text = write_report(&sample_inventory());
        assert!(text.contains("valor_inventario,137.50\n"));
        assert!(text.contains("valor_venta_potencial,288.50\n"));
    }

    #[test]
    fn movement_rows_rendered() {
        let text = write_report(&sample_inventory());
        assert!(text.contains("2025-03-01,1,10.00,0.00\n"));
        assert!(text.contains("2025-03-05,1,0.00,3.00\n"));
        assert!(text.contains("2025-03-02,2,15.00,0.00\n"));
    }

    #[test]
    fn movements_keep_log_order() {
        // The log is not date-sorted on export
        let text = write_report(&sample_inventory());
        let first = text.find("2025-03-05,1").unwrap();
        let second = text.find("2025-03-02,2").unwrap();
        assert!(first < second);
    }

    #[test]
    fn name_with_comma_is_quoted() {
        let mut inv = Inventory::default();
        inv.products
            .push(Product::new(1, "Venda, elastica", dec!(1.00), dec!(2.00)));
        let text = write_report(&inv);
        assert!(text.contains("1,\"Venda, elastica\",1.00,2.00,0.00\n"));
    }

    #[test]
    fn empty_inventory_still_renders_all_sections() {
        let text = write_report(&Inventory::default());
        assert!(text.contains("CATALOGO\n"));
        assert!(text.contains("RESUMEN\n"));
        assert!(text.contains("MOVIMIENTOS\n"));
        assert!(text.contains("valor_inventario,0.00\n"));
        assert!(text.contains("valor_venta_potencial,0.00\n"));
    }

    #[test]
    fn custom_organization_in_banner() {
        let mut inv = Inventory::default();
        inv.settings.organization = "Farmacia Central".to_string();
        let text = write_report(&inv);
        assert!(text.starts_with("== REPORTE INVENTARIO Farmacia Central ==\n"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Report parsing
// ═══════════════════════════════════════════════════════════════════

mod report_parsing {
    use super::*;

    #[test]
    fn parses_catalog_rows() {
        let parsed = parse_report(&write_report(&sample_inventory()));
        assert_eq!(parsed.products.len(), 2);
        assert_eq!(parsed.products[0].id, 1);
        assert_eq!(parsed.products[0].name, "Faja magnetica");
        assert_eq!(parsed.products[0].cost, dec!(10.00));
        assert_eq!(parsed.products[0].price, dec!(20.00));
    }

    #[test]
    fn parses_movement_rows() {
        let parsed = parse_report(&write_report(&sample_inventory()));
        assert_eq!(parsed.movements.len(), 3);
        assert_eq!(parsed.movements[0].date, d(2025, 3, 1));
        assert_eq!(parsed.movements[0].product_id, 1);
        assert_eq!(parsed.movements[0].quantity_in, dec!(10.00));
        assert_eq!(parsed.movements[1].quantity_out, dec!(3.00));
    }

    #[test]
    fn captures_organization_from_banner() {
        let parsed = parse_report(&write_report(&sample_inventory()));
        assert_eq!(
            parsed.organization.as_deref(),
            Some("BIO SALUD NATURAL SpA")
        );
    }

    #[test]
    fn plain_banner_without_organization() {
        let text = "== algo ==\nCATALOGO\nid,nombre,costo,precio,stock_actual\n";
        let parsed = parse_report(text);
        assert!(parsed.organization.is_none());
        assert!(parsed.saw_section);
    }

    #[test]
    fn header_rows_not_parsed_as_data() {
        let parsed = parse_report(&write_report(&sample_inventory()));
        assert!(parsed.products.iter().all(|p| p.name != "nombre"));
    }

    #[test]
    fn resumen_rows_not_ingested() {
        // valor_inventario,137.50 must not become a product or movement
        let parsed = parse_report(&write_report(&sample_inventory()));
        assert_eq!(parsed.products.len(), 2);
        assert_eq!(parsed.movements.len(), 3);
    }

    #[test]
    fn malformed_catalog_rows_skipped() {
        let text = "CATALOGO\n\
                    id,nombre,costo,precio,stock_actual\n\
                    1,Valido,2.00,4.00,0.00\n\
                    abc,Invalido,2.00,4.00,0.00\n\
                    2,SinPrecio,2.00\n\
                    3,Tambien valido,1.50,3.00,0.00\n";
        let parsed = parse_report(text);
        assert_eq!(parsed.products.len(), 2);
        assert_eq!(parsed.products[0].name, "Valido");
        assert_eq!(parsed.products[1].name, "Tambien valido");
    }

    #[test]
    fn movement_with_bad_date_skipped() {
        let text = "MOVIMIENTOS\n\
                    fecha,id_producto,entrada,salida\n\
                    2025-03-01,1,5.00,0.00\n\
                    not-a-date,1,5.00,0.00\n\
                    2025-13-45,1,5.00,0.00\n";
        let parsed = parse_report(text);
        assert_eq!(parsed.movements.len(), 1);
    }

    #[test]
    fn movement_with_bad_quantity_skipped() {
        let text = "MOVIMIENTOS\n\
                    fecha,id_producto,entrada,salida\n\
                    2025-03-01,1,cinco,0.00\n\
                    2025-03-02,1,5.00,0.00\n";
        let parsed = parse_report(text);
        assert_eq!(parsed.movements.len(), 1);
        assert_eq!(parsed.movements[0].date, d(2025, 3, 2));
    }

    #[test]
    fn negative_quantities_pass_through() {
        // Parsing is permissive; business rules live in the services
        let text = "MOVIMIENTOS\n\
                    fecha,id_producto,entrada,salida\n\
                    2025-03-01,1,-5.00,0.00\n";
        let parsed = parse_report(text);
        assert_eq!(parsed.movements.len(), 1);
        assert_eq!(parsed.movements[0].quantity_in, dec!(-5.00));
    }

    #[test]
    fn quoted_comma_name_parses_back() {
        let mut inv = Inventory::default();
        inv.products
            .push(Product::new(1, "Venda, elastica", dec!(1.00), dec!(2.00)));
        let parsed = parse_report(&write_report(&inv));
        assert_eq!(parsed.products[0].name, "Venda, elastica");
    }

    #[test]
    fn saw_section_false_for_plain_text() {
        let parsed = parse_report("just some\nrandom text\nwith no sections");
        assert!(!parsed.saw_section);
        assert!(parsed.products.is_empty());
        assert!(parsed.movements.is_empty());
    }

    #[test]
    fn saw_section_true_even_when_sections_empty() {
        let parsed = parse_report("CATALOGO\nMOVIMIENTOS\n");
        assert!(parsed.saw_section);
        assert!(parsed.products.is_empty());
    }

    #[test]
    fn crlf_line_endings_accepted() {
        let text = "CATALOGO\r\nid,nombre,costo,precio,stock_actual\r\n1,Algo,2.00,4.00,0.00\r\n";
        let parsed = parse_report(text);
        assert_eq!(parsed.products.len(), 1);
        assert_eq!(parsed.products[0].name, "Algo");
    }

    #[test]
    fn blank_lines_skipped() {
        let text = "\n\nCATALOGO\n\n1,Algo,2.00,4.00,0.00\n\n";
        let parsed = parse_report(text);
        assert_eq!(parsed.products.len(), 1);
    }

    #[test]
    fn stock_column_not_required() {
        // Four fields are enough for a catalog row
        let parsed = parse_report("CATALOGO\n1,Algo,2.00,4.00\n");
        assert_eq!(parsed.products.len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// StorageManager
// ═══════════════════════════════════════════════════════════════════

mod manager {
    use super::*;

    #[test]
    fn string_roundtrip_preserves_catalog_and_log() {
        let inv = sample_inventory();
        let text = StorageManager::save_to_string(&inv);
        let back = StorageManager::load_from_string(&text).unwrap();

        assert_eq!(back.products, inv.products);
        assert_eq!(back.movements, inv.movements);
        assert_eq!(back.settings.organization, inv.settings.organization);
    }

    #[test]
    fn roundtrip_recomputes_identical_stock() {
        // Stock is derived, never stored; it must match after a round-trip
        let inv = sample_inventory();
        let text = StorageManager::save_to_string(&inv);
        let re_exported = StorageManager::save_to_string(
            &StorageManager::load_from_string(&text).unwrap(),
        );
        assert_eq!(text, re_exported);
    }

    #[test]
    fn roundtrip_with_tricky_names() {
        let mut inv = Inventory::default();
        inv.products
            .push(Product::new(1, "Venda, elastica \"premium\"", dec!(1.00), dec!(2.00)));
        inv.initial_stock.insert(1, Decimal::ZERO);

        let back =
            StorageManager::load_from_string(&StorageManager::save_to_string(&inv)).unwrap();
        assert_eq!(back.products[0].name, "Venda, elastica \"premium\"");
    }

    #[test]
    fn import_replaces_catalog_when_parsed_non_empty() {
        let mut inv = sample_inventory();
        let text = "CATALOGO\nid,nombre,costo,precio,stock_actual\n9,Nuevo,1.00,2.00,0.00\n";
        StorageManager::import_into(&mut inv, text).unwrap();

        assert_eq!(inv.products.len(), 1);
        assert_eq!(inv.products[0].id, 9);
        // Movements untouched: the report had no movement rows
        assert_eq!(inv.movements.len(), 3);
    }

    #[test]
    fn import_keeps_catalog_when_section_empty() {
        let mut inv = sample_inventory();
        let text = "MOVIMIENTOS\nfecha,id_producto,entrada,salida\n2025-04-01,1,2.00,0.00\n";
        StorageManager::import_into(&mut inv, text).unwrap();

        assert_eq!(inv.products.len(), 2);
        assert_eq!(inv.movements.len(), 1);
        assert_eq!(inv.movements[0].date, d(2025, 4, 1));
    }

    #[test]
    fn import_resets_initial_stock_for_new_catalog() {
        let mut inv = sample_inventory();
        inv.initial_stock.insert(1, dec!(99.00));

        let text = "CATALOGO\nid,nombre,costo,precio,stock_actual\n1,Nuevo,1.00,2.00,0.00\n";
        StorageManager::import_into(&mut inv, text).unwrap();
        assert_eq!(inv.initial_stock.get(&1), Some(&Decimal::ZERO));
    }

    #[test]
    fn import_updates_organization_from_banner() {
        let mut inv = Inventory::default();
        let text = "== REPORTE INVENTARIO Tienda Sur ==\nCATALOGO\n1,Algo,1.00,2.00,0.00\n";
        StorageManager::import_into(&mut inv, text).unwrap();
        assert_eq!(inv.settings.organization, "Tienda Sur");
    }

    #[test]
    fn import_without_sections_fails() {
        let mut inv = Inventory::default();
        let result = StorageManager::import_into(&mut inv, "nothing useful here");
        assert!(result.is_err());
        match result.unwrap_err() {
            CoreError::InvalidReportFormat(msg) => assert!(msg.contains("section")),
            other => panic!("Expected InvalidReportFormat, got {:?}", other),
        }
    }

    #[test]
    fn load_empty_string_fails() {
        let result = StorageManager::load_from_string("");
        assert!(result.is_err());
    }

    #[test]
    fn resumen_is_never_trusted() {
        // Hand the importer a report whose RESUMEN is wrong; the re-export
        // must carry recomputed figures
        let text = "== REPORTE INVENTARIO X ==\n\
                    CATALOGO\n\
                    id,nombre,costo,precio,stock_actual\n\
                    1,Algo,10.00,20.00,999.00\n\
                    RESUMEN\n\
                    valor_inventario,123456.00\n\
                    valor_venta_potencial,999999.00\n\
                    MOVIMIENTOS\n\
                    fecha,id_producto,entrada,salida\n\
                    2025-03-01,1,2.00,0.00\n";
        let inv = StorageManager::load_from_string(text).unwrap();
        let out = StorageManager::save_to_string(&inv);
        assert!(out.contains("valor_inventario,20.00\n"));
        assert!(out.contains("valor_venta_potencial,40.00\n"));
        assert!(out.contains("1,Algo,10.00,20.00,2.00\n"));
    }

    // ── File I/O ──────────────────────────────────────────────────

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventario.csv");
        let path_str = path.to_str().unwrap();

        let inv = sample_inventory();
        StorageManager::save_to_file(&inv, path_str).unwrap();
        let back = StorageManager::load_from_file(path_str).unwrap();

        assert_eq!(back.products, inv.products);
        assert_eq!(back.movements, inv.movements);
    }

    #[test]
    fn saved_file_is_readable_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reporte.csv");
        let path_str = path.to_str().unwrap();

        StorageManager::save_to_file(&sample_inventory(), path_str).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("== REPORTE INVENTARIO"));
    }

    #[test]
    fn overwrite_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overwrite.csv");
        let path_str = path.to_str().unwrap();

        StorageManager::save_to_file(&Inventory::default(), path_str).unwrap();
        StorageManager::save_to_file(&sample_inventory(), path_str).unwrap();

        let back = StorageManager::load_from_file(path_str).unwrap();
        assert_eq!(back.products.len(), 2);
    }

    #[test]
    fn load_missing_file_fails_with_file_io() {
        let result = StorageManager::load_from_file("/nonexistent/path/reporte.csv");
        assert!(result.is_err());
        match result.unwrap_err() {
            CoreError::FileIO(_) => {}
            other => panic!("Expected FileIO, got {:?}", other),
        }
    }
}
