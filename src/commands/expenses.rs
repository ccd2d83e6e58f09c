// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calculations::expenses_total;
use crate::db::load_expenses;
use crate::models::{Expense, Status};
use crate::utils::{date_range_arg, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("cancel", sub)) => cancel(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let expense = Expense {
        id: 0,
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        status: Status::Active,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        description: sub.get_one::<String>("description").unwrap().trim().to_string(),
    };
    expense.validate()?;
    conn.execute(
        "INSERT INTO expenses(date, status, amount, description) VALUES (?1, ?2, ?3, ?4)",
        params![
            expense.date.to_string(),
            expense.status.as_str(),
            expense.amount.to_string(),
            expense.description
        ],
    )?;
    info!(id = conn.last_insert_rowid(), "expense recorded");
    println!(
        "Recorded expense {} on {} ({})",
        expense.amount, expense.date, expense.description
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let range = date_range_arg(sub)?;
    let expenses: Vec<Expense> = load_expenses(conn)?
        .into_iter()
        .filter(|e| range.contains(e.date))
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &expenses)? {
        return Ok(());
    }
    let total = expenses_total(&expenses);
    let rows = expenses
        .into_iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.date.to_string(),
                e.description,
                format!("{:.2}", e.amount),
                e.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Date", "Description", "Amount", "Status"], rows)
    );
    println!("Active total: {:.2}", total);
    Ok(())
}

fn cancel(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let changed = conn.execute(
        "UPDATE expenses SET status='cancelled' WHERE id=?1 AND status='active'",
        params![id],
    )?;
    if changed == 0 {
        bail!("Expense #{} not found or already cancelled", id);
    }
    info!(id, "expense cancelled");
    println!("Cancelled expense #{}", id);
    Ok(())
}
