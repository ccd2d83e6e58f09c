// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use tillbook::{commands::doctor, db};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO products(code, name, cost_price, sale_price, stock) VALUES ('A', 'Coffee', '4', '10', '3');
        INSERT INTO sales(id, date, status, total, payment_method) VALUES (1, '2025-01-01', 'active', '10', 'cash');
        INSERT INTO sales(id, date, status, total, payment_method) VALUES (2, '2025-01-02', 'cancelled', '10', 'cash');
        INSERT INTO sale_items(sale_id, product_code, quantity) VALUES (1, 'A', '1');
        INSERT INTO credits(id, customer, due_date, total_amount) VALUES (1, 'Ana', '2025-02-01', '50');
        INSERT INTO credit_payments(credit_id, date, status, amount) VALUES (1, '2025-01-15', 'active', '50');
        "#,
    )
    .unwrap();
    conn
}

#[test]
fn clean_ledger_has_no_issues() {
    let conn = setup();
    assert!(doctor::find_issues(&conn).unwrap().is_empty());
}

#[test]
fn flags_unknown_products_and_overpaid_credits() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO sale_items(sale_id, product_code, quantity) VALUES (1, 'GHOST', '2');
        INSERT INTO sale_items(sale_id, product_code, quantity) VALUES (2, 'IGNORED', '2');
        INSERT INTO credit_payments(credit_id, date, status, amount) VALUES (1, '2025-01-20', 'active', '7.5');
        "#,
    )
    .unwrap();

    let issues = doctor::find_issues(&conn).unwrap();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].0, "unknown_product");
    assert!(issues[0].1.ends_with("GHOST"));
    assert_eq!(issues[1].0, "credit_overpaid");
    assert!(issues[1].1.ends_with("7.50"));
}
