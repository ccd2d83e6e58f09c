// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calculations::{DailySales, daily_sales};
use crate::db::{insert_sale, load_sales};
use crate::models::{PaymentMethod, Sale, SaleItem, Status};
use crate::utils::{date_range_arg, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use tracing::{info, warn};

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
    let items = sub
        .get_many::<String>("item")
        .unwrap_or_default()
        .map(|s| SaleItem::parse(s))
        .collect::<Result<Vec<_>, _>>()?;
    let sale = Sale {
        id: 0,
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        status: Status::Active,
        total: parse_decimal(sub.get_one::<String>("total").unwrap())?,
        payment_method: sub.get_one::<String>("method").unwrap().parse::<PaymentMethod>()?,
        commission: sub
            .get_one::<String>("commission")
            .map(|s| parse_decimal(s))
            .transpose()?,
        note: sub.get_one::<String>("note").cloned(),
        cancellation_reason: None,
        items,
    };
    sale.validate()?;
    let id = insert_sale(conn, &sale)?;
    info!(id, items = sale.items.len(), "sale recorded");
    println!(
        "Recorded sale #{} of {} ({}) on {}",
        id, sale.total, sale.payment_method, sale.date
    );
    Ok(())
}

/// Sales in the requested period, cancelled ones included, grouped per day.
pub fn query_days(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<DailySales>> {
    let range = date_range_arg(sub)?;
    let sales: Vec<Sale> = load_sales(conn)?
        .into_iter()
        .filter(|s| range.contains(s.date))
        .collect();
    Ok(daily_sales(&sales))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let days = query_days(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &days)? {
        return Ok(());
    }
    if days.is_empty() {
        println!("No sales recorded");
        return Ok(());
    }
    for day in days {
        let plural = if day.count == 1 { "" } else { "s" };
        println!(
            "{}  {} sale{}  total {:.2}",
            day.date, day.count, plural, day.total
        );
        let rows = day
            .sales
            .iter()
            .map(|s| {
                let items = s
                    .items
                    .iter()
                    .map(|i| format!("{}x{}", i.code, i.quantity.normalize()))
                    .collect::<Vec<_>>()
                    .join(", ");
                let status = match (&s.status, &s.cancellation_reason) {
                    (Status::Cancelled, Some(r)) => format!("cancelled: {}", r),
                    (st, _) => st.to_string(),
                };
                vec![
                    s.id.to_string(),
                    format!("{:.2}", s.total),
                    s.payment_method.to_string(),
                    s.commission.map(|c| format!("{:.2}", c)).unwrap_or_default(),
                    items,
                    status,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Total", "Method", "Commission", "Items", "Status"],
                rows
            )
        );
    }
    Ok(())
}

fn cancel(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let reason = sub.get_one::<String>("reason").unwrap().trim();
    let changed = conn.execute(
        "UPDATE sales SET status='cancelled', cancellation_reason=?2
         WHERE id=?1 AND status='active'",
        params![id, reason],
    )?;
    if changed == 0 {
        warn!(id, "cancel requested for missing or already cancelled sale");
        bail!("Sale #{} not found or already cancelled", id);
    }
    info!(id, "sale cancelled");
    println!("Cancelled sale #{}", id);
    Ok(())
}
