// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use tempfile::tempdir;
use tillbook::{cli, commands::exporter, db, utils};

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute(
        "INSERT INTO sales(date, status, total, payment_method) VALUES (?1, 'active', '100', 'cash')",
        params!["2025-01-02"],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO sales(date, status, total, payment_method) VALUES (?1, 'cancelled', '50', 'cash')",
        params!["2025-01-02"],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO expenses(date, status, amount, description) VALUES ('2025-01-03', 'active', '20', 'rent')",
        [],
    )
    .unwrap();
    utils::set_petty_cash(&conn, Decimal::from(5)).unwrap();
    conn
}

fn export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "tillbook", "export", "summary", "--format", format, "--out", out,
    ]);
    match matches.subcommand() {
        Some(("export", export_m)) => exporter::handle(conn, export_m),
        _ => panic!("no export subcommand"),
    }
}

fn num(v: &serde_json::Value, key: &str) -> Decimal {
    v[key].as_str().unwrap().parse().unwrap()
}

#[test]
fn export_summary_json() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("summary.json");
    export(&conn, "json", &out_path.to_string_lossy()).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(num(&parsed, "total_sales"), Decimal::from(100));
    assert_eq!(num(&parsed, "cash_sales"), Decimal::from(100));
    assert_eq!(num(&parsed, "total_expenses"), Decimal::from(20));
    assert_eq!(num(&parsed, "cost_of_goods_sold"), Decimal::ZERO);
    assert_eq!(num(&parsed, "gross_profit"), Decimal::from(100));
    assert_eq!(num(&parsed, "net_profit"), Decimal::from(80));
    assert_eq!(num(&parsed, "cash_in_register"), Decimal::from(85));
}

#[test]
fn export_summary_csv() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("summary.csv");
    export(&conn, "CSV", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "metric,value");
    assert!(lines.contains(&"Cash,100.00"));
    assert!(lines.contains(&"Cash in register,85.00"));
}

#[test]
fn export_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("summary.xml");
    assert!(export(&conn, "xml", &out_path.to_string_lossy()).is_err());
    assert!(!out_path.exists());
}
