// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use tillbook::models::Status;
use tillbook::{cli, commands::sales, db};

fn sale_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["tillbook", "sale"];
    full.extend_from_slice(args);
    let m = cli::build_cli().get_matches_from(full);
    match m.subcommand() {
        Some(("sale", s)) => s.clone(),
        _ => panic!("no sale subcommand"),
    }
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    for (date, total) in [("2025-05-01", "10"), ("2025-05-02", "15"), ("2025-05-02", "5")] {
        sales::handle(
            &conn,
            &sale_matches(&["add", "--date", date, "--total", total, "--method", "cash"]),
        )
        .unwrap();
    }
    conn
}

#[test]
fn add_stores_items_and_commission() {
    let conn = setup();
    sales::handle(
        &conn,
        &sale_matches(&[
            "add", "--date", "2025-05-03", "--total", "42.50", "--method", "Card",
            "--commission", "4.25", "--item", "SKU-1:2", "--item", "SKU-2:1.5",
        ]),
    )
    .unwrap();

    let sale = db::load_sales(&conn).unwrap().pop().unwrap();
    assert_eq!(sale.total, Decimal::new(4250, 2));
    assert_eq!(sale.commission, Some(Decimal::new(425, 2)));
    assert_eq!(sale.items.len(), 2);
    assert_eq!(sale.items[1].quantity, Decimal::new(15, 1));
}

#[test]
fn add_rejects_bad_input() {
    let conn = setup();
    let bad = [
        vec!["add", "--date", "2025-05-03", "--total", "10", "--method", "cheque"],
        vec!["add", "--date", "2025-05-03", "--total=-1", "--method", "cash"],
        vec!["add", "--date", "05/03/2025", "--total", "10", "--method", "cash"],
        vec!["add", "--date", "2025-05-03", "--total", "10", "--method", "cash", "--item", "X"],
    ];
    for args in bad {
        assert!(sales::handle(&conn, &sale_matches(&args)).is_err(), "{:?}", args);
    }
    assert_eq!(db::load_sales(&conn).unwrap().len(), 3);
}

#[test]
fn list_groups_by_day_newest_first() {
    let conn = setup();
    sales::handle(&conn, &sale_matches(&["cancel", "--id", "3", "--reason", "test"])).unwrap();

    let m = sale_matches(&["list"]);
    let (_, list_m) = m.subcommand().unwrap();
    let days = sales::query_days(&conn, list_m).unwrap();

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date.to_string(), "2025-05-02");
    assert_eq!(days[0].count, 2);
    assert_eq!(days[0].total, Decimal::from(15));
    assert_eq!(days[1].total, Decimal::from(10));
}

#[test]
fn list_honours_range() {
    let conn = setup();
    let m = sale_matches(&["list", "--to", "2025-05-01"]);
    let (_, list_m) = m.subcommand().unwrap();
    let days = sales::query_days(&conn, list_m).unwrap();
    assert_eq!(days.len(), 1);
}

#[test]
fn cancel_is_one_shot() {
    let conn = setup();
    sales::handle(&conn, &sale_matches(&["cancel", "--id", "1", "--reason", "void"])).unwrap();
    let first = &db::load_sales(&conn).unwrap()[0];
    assert_eq!(first.status, Status::Cancelled);
    assert_eq!(first.cancellation_reason.as_deref(), Some("void"));

    let again = sale_matches(&["cancel", "--id", "1", "--reason", "again"]);
    assert!(sales::handle(&conn, &again).is_err());
    let missing = sale_matches(&["cancel", "--id", "99", "--reason", "x"]);
    assert!(sales::handle(&conn, &missing).is_err());
}
