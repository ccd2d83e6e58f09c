// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use tillbook::calculations::credits_metrics;
use tillbook::{cli, commands::credits, db};

fn credit_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["tillbook", "credit"];
    full.extend_from_slice(args);
    let m = cli::build_cli().get_matches_from(full);
    match m.subcommand() {
        Some(("credit", s)) => s.clone(),
        _ => panic!("no credit subcommand"),
    }
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    credits::handle(
        &conn,
        &credit_matches(&["add", "--customer", "Ana", "--due", "2025-03-01", "--amount", "100"]),
    )
    .unwrap();
    credits::handle(
        &conn,
        &credit_matches(&["add", "--customer", "Luis", "--due", "2025-04-01", "--amount", "60"]),
    )
    .unwrap();
    conn
}

#[test]
fn payments_reduce_pending() {
    let conn = setup();
    for amount in ["30", "20"] {
        credits::handle(
            &conn,
            &credit_matches(&["pay", "--id", "1", "--amount", amount, "--date", "2025-02-01"]),
        )
        .unwrap();
    }
    credits::handle(&conn, &credit_matches(&["cancel-payment", "--id", "2"])).unwrap();

    let rows = credits::query_rows(&conn).unwrap();
    assert_eq!(rows[0].paid, Decimal::from(30));
    assert_eq!(rows[0].pending, Decimal::from(70));
    assert_eq!(rows[1].paid, Decimal::ZERO);
    assert_eq!(rows[1].pending, Decimal::from(60));

    let totals = credits_metrics(&db::load_credits(&conn).unwrap());
    assert_eq!(totals.total_amount, Decimal::from(160));
    assert_eq!(totals.total_paid, Decimal::from(30));
    assert_eq!(totals.pending_amount, totals.total_amount - totals.total_paid);
}

#[test]
fn pay_unknown_credit_fails() {
    let conn = setup();
    let res = credits::handle(&conn, &credit_matches(&["pay", "--id", "9", "--amount", "5"]));
    assert!(res.is_err());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM credit_payments", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn non_positive_amounts_rejected() {
    let conn = setup();
    let zero = credit_matches(&["pay", "--id", "1", "--amount", "0"]);
    assert!(credits::handle(&conn, &zero).is_err());
    assert!(
        credits::handle(
            &conn,
            &credit_matches(&["add", "--customer", "X", "--due", "2025-01-01", "--amount=-5"]),
        )
        .is_err()
    );
}

#[test]
fn blank_customer_rejected() {
    let conn = setup();
    for name in ["", "   "] {
        let args = ["add", "--customer", name, "--due", "2025-05-01", "--amount", "10"];
        assert!(credits::handle(&conn, &credit_matches(&args)).is_err());
    }
    assert_eq!(db::load_credits(&conn).unwrap().len(), 2);
}
