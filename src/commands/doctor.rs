// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{load_credits, load_products, load_sales};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashSet;
use tracing::warn;

/// Returns `(issue, detail)` pairs; empty means the ledger is consistent.
pub fn find_issues(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut issues = Vec::new();

    // 1) Items that fall out of COGS because their product is unknown
    let codes: HashSet<String> = load_products(conn)?.into_iter().map(|p| p.code).collect();
    for sale in load_sales(conn)?.iter().filter(|s| !s.status.is_cancelled()) {
        for item in sale.items.iter().filter(|i| !codes.contains(&i.code)) {
            issues.push((
                "unknown_product".to_string(),
                format!("sale #{} on {}: {}", sale.id, sale.date, item.code),
            ));
        }
    }

    // 2) Credits that collected more than they were owed
    for credit in load_credits(conn)? {
        let pending = credit.pending_amount();
        if pending.is_sign_negative() && !pending.is_zero() {
            issues.push((
                "credit_overpaid".to_string(),
                format!("credit #{} ({}): {:.2}", credit.id, credit.customer, -pending),
            ));
        }
    }

    Ok(issues)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = find_issues(conn)?;
    if issues.is_empty() {
        println!("doctor: no issues found");
        return Ok(());
    }
    warn!(count = issues.len(), "ledger issues found");
    let rows = issues.into_iter().map(|(k, v)| vec![k, v]).collect();
    println!("{}", pretty_table(&["Issue", "Detail"], rows));
    Ok(())
}
