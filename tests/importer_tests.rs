// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;
use tillbook::calculations::cost_of_goods_sold;
use tillbook::{cli, commands::importer, db};

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file.flush().unwrap();
    file
}

fn import(conn: &mut Connection, kind: &str, path: &str) -> anyhow::Result<()> {
    let m = cli::build_cli().get_matches_from(["tillbook", "import", kind, "--path", path]);
    match m.subcommand() {
        Some(("import", import_m)) => importer::handle(conn, import_m),
        _ => panic!("no import subcommand"),
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn imports_products_and_sales() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();

    let products = csv_file("code,name,cost,price,stock\nA, Coffee ,4,10,12\nB,Bagel,2.5,5,\n");
    let path = products.path().to_str().unwrap().to_string();
    import(&mut conn, "products", &format!("  {}  ", path)).unwrap();

    let loaded = db::load_products(&conn).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].name, "Coffee");
    assert_eq!(loaded[0].stock, Decimal::from(12));
    assert_eq!(loaded[1].stock, Decimal::ZERO);

    let sales = csv_file(
        "date,total,method,commission,items,note\n\
         2025-03-01,15.50,cash,,A:1;B:2,walk-in\n\
         2025-03-02,9,card,1,,\n",
    );
    import(&mut conn, "sales", sales.path().to_str().unwrap()).unwrap();

    let loaded_sales = db::load_sales(&conn).unwrap();
    assert_eq!(loaded_sales.len(), 2);
    assert_eq!(loaded_sales[0].items.len(), 2);
    assert_eq!(loaded_sales[0].note.as_deref(), Some("walk-in"));
    assert_eq!(loaded_sales[1].commission, Some(Decimal::from(1)));
    assert_eq!(cost_of_goods_sold(&loaded_sales, &loaded), Decimal::from(9));
}

#[test]
fn bad_row_rolls_back_whole_file() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();

    let sales = csv_file(
        "date,total,method,commission,items,note\n\
         2025-03-01,10,cash,,,\n\
         2025-03-02,10,cheque,,,\n",
    );
    assert!(import(&mut conn, "sales", sales.path().to_str().unwrap()).is_err());
    assert_eq!(count(&conn, "sales"), 0);
}

#[test]
fn rejects_invalid_product_code() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();

    let products = csv_file("code,name,cost,price\nGOOD,Ok,1,2\nbad code,Nope,1,2\n");
    assert!(import(&mut conn, "products", products.path().to_str().unwrap()).is_err());
    assert_eq!(count(&conn, "products"), 0);
}
