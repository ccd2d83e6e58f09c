// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calculations::credits_metrics;
use crate::db::load_credits;
use crate::models::Credit;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("cancel-payment", sub)) => cancel_payment(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let customer = sub.get_one::<String>("customer").unwrap().trim();
    if customer.is_empty() {
        bail!("Customer name cannot be empty");
    }
    let due = parse_date(sub.get_one::<String>("due").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= Decimal::ZERO {
        bail!("Credit amount must be positive, got {}", amount);
    }
    conn.execute(
        "INSERT INTO credits(customer, due_date, total_amount) VALUES (?1, ?2, ?3)",
        params![customer, due.to_string(), amount.to_string()],
    )?;
    let id = conn.last_insert_rowid();
    info!(id, "credit opened");
    println!("Opened credit #{} for {}: {} due {}", id, customer, amount, due);
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let credit_id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= Decimal::ZERO {
        bail!("Payment amount must be positive, got {}", amount);
    }
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };
    let exists: Option<i64> = conn
        .query_row("SELECT id FROM credits WHERE id=?1", params![credit_id], |r| {
            r.get(0)
        })
        .optional()?;
    exists.with_context(|| format!("Credit #{} not found", credit_id))?;

    conn.execute(
        "INSERT INTO credit_payments(credit_id, date, status, amount) VALUES (?1, ?2, 'active', ?3)",
        params![credit_id, date.to_string(), amount.to_string()],
    )?;
    let credit = load_credits(conn)?
        .into_iter()
        .find(|c| c.id == credit_id)
        .with_context(|| format!("Credit #{} vanished", credit_id))?;
    let pending = credit.pending_amount();
    if pending.is_sign_negative() && !pending.is_zero() {
        warn!(credit_id, %pending, "credit overpaid");
    }
    info!(credit_id, %amount, "credit payment recorded");
    println!(
        "Recorded payment of {} on credit #{} (pending {:.2})",
        amount, credit_id, pending
    );
    Ok(())
}

fn cancel_payment(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let changed = conn.execute(
        "UPDATE credit_payments SET status='cancelled' WHERE id=?1 AND status='active'",
        params![id],
    )?;
    if changed == 0 {
        bail!("Payment #{} not found or already cancelled", id);
    }
    info!(id, "credit payment cancelled");
    println!("Cancelled payment #{}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct CreditRow {
    pub id: i64,
    pub customer: String,
    pub due_date: String,
    pub total: Decimal,
    pub paid: Decimal,
    pub pending: Decimal,
}

fn to_rows(credits: &[Credit]) -> Vec<CreditRow> {
    credits
        .iter()
        .map(|c| CreditRow {
            id: c.id,
            customer: c.customer.clone(),
            due_date: c.due_date.to_string(),
            total: c.total_amount,
            paid: c.paid_amount(),
            pending: c.pending_amount(),
        })
        .collect()
}

pub fn query_rows(conn: &Connection) -> Result<Vec<CreditRow>> {
    Ok(to_rows(&load_credits(conn)?))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let credits = load_credits(conn)?;
    let rows = to_rows(&credits);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let totals = credits_metrics(&credits);
    let mut data: Vec<Vec<String>> = rows
        .into_iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.customer,
                r.due_date,
                format!("{:.2}", r.total),
                format!("{:.2}", r.paid),
                format!("{:.2}", r.pending),
            ]
        })
        .collect();
    data.push(vec![
        String::new(),
        "TOTAL".into(),
        String::new(),
        format!("{:.2}", totals.total_amount),
        format!("{:.2}", totals.total_paid),
        format!("{:.2}", totals.pending_amount),
    ]);
    println!(
        "{}",
        pretty_table(
            &["ID", "Customer", "Due", "Total", "Paid", "Pending"],
            data
        )
    );
    Ok(())
}
