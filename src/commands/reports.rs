// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calculations::{
    DateRange, MonthlySummary, ReportInputs, ReportMetrics, cost_of_goods_sold, daily_sales,
    monthly_breakdown, report_calculations,
};
use crate::db::{load_credits, load_expenses, load_products, load_sales};
use crate::utils::{
    date_range_arg, fmt_money, fmt_pct, get_currency, get_petty_cash, maybe_print_json,
    pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("monthly", sub)) => monthly(conn, sub)?,
        Some(("daily", sub)) => daily(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Loads the ledger and narrows it to `range`: active sales and expenses in
/// the window, credits due in the window, the whole catalogue.
pub fn build_inputs(conn: &Connection, range: &DateRange) -> Result<ReportInputs> {
    let inputs = ReportInputs {
        sales: range.filter_sales(&load_sales(conn)?),
        expenses: range.filter_expenses(&load_expenses(conn)?),
        credits: range.filter_credits(&load_credits(conn)?),
        products: load_products(conn)?,
        petty_cash: get_petty_cash(conn)?,
    };
    debug!(?range, sales = inputs.sales.len(), "report inputs loaded");
    Ok(inputs)
}

pub fn query_summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<ReportMetrics> {
    let range = date_range_arg(sub)?;
    Ok(report_calculations(&build_inputs(conn, &range)?))
}

/// Label/value pairs in display order, shared with the exporter.
pub fn summary_lines(m: &ReportMetrics, petty_cash: Decimal) -> Vec<(&'static str, String)> {
    vec![
        ("Total sales", format!("{:.2}", m.sales.total_sales)),
        ("  Cash", format!("{:.2}", m.sales.cash_sales)),
        ("  Card", format!("{:.2}", m.sales.card_sales)),
        ("  Transfer", format!("{:.2}", m.sales.transfer_sales)),
        ("Cost of goods sold", format!("{:.2}", m.cost_of_goods_sold)),
        ("Gross profit", format!("{:.2}", m.profit.gross_profit)),
        ("Gross margin", fmt_pct(&m.profit.gross_profit_margin)),
        ("Expenses", format!("{:.2}", m.total_expenses)),
        ("Commissions", format!("{:.2}", m.sales.total_commissions)),
        ("Net profit", format!("{:.2}", m.profit.net_profit)),
        ("Net margin", fmt_pct(&m.profit.net_profit_margin)),
        ("Credit issued", format!("{:.2}", m.credits.total_amount)),
        ("Credit collected", format!("{:.2}", m.credits.total_paid)),
        ("Credit pending", format!("{:.2}", m.credits.pending_amount)),
        ("Petty cash", format!("{:.2}", petty_cash)),
        ("Cash in register", format!("{:.2}", m.cash_in_register)),
    ]
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let metrics = query_summary(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &metrics)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let rows = summary_lines(&metrics, get_petty_cash(conn)?)
        .into_iter()
        .map(|(k, v)| vec![k.to_string(), v])
        .collect();
    println!("{}", pretty_table(&["Metric", &format!("Amount ({})", ccy)], rows));
    Ok(())
}

pub fn query_monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<MonthlySummary>> {
    let range = date_range_arg(sub)?;
    let months = *sub.get_one::<usize>("months").unwrap_or(&3);
    let inputs = build_inputs(conn, &range)?;
    let cogs = cost_of_goods_sold(&inputs.sales, &inputs.products);
    let mut rows = monthly_breakdown(&inputs.sales, &inputs.expenses, cogs);
    rows.truncate(months);
    Ok(rows)
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rows = query_monthly(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let data = rows
        .into_iter()
        .map(|m| {
            vec![
                m.month,
                format!("{:.2}", m.sales),
                format!("{:.2}", m.cogs),
                format!("{:.2} ({:.1}%)", m.gross_profit, m.gross_margin),
                format!("{:.2}", m.expenses),
                format!("{:.2} ({:.1}%)", m.net_profit, m.net_margin),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Month", "Sales", "COGS", "Gross profit", "Expenses", "Net profit"],
            data
        )
    );
    Ok(())
}

#[derive(Serialize)]
struct DailyRow {
    date: String,
    count: usize,
    total: Decimal,
}

fn daily(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let range = date_range_arg(sub)?;
    let in_range: Vec<_> = load_sales(conn)?
        .into_iter()
        .filter(|s| range.contains(s.date))
        .collect();
    let rows: Vec<DailyRow> = daily_sales(&in_range)
        .into_iter()
        .map(|d| DailyRow {
            date: d.date.to_string(),
            count: d.count,
            total: d.total,
        })
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let data = rows
        .into_iter()
        .map(|r| vec![r.date, r.count.to_string(), fmt_money(&r.total, &ccy)])
        .collect();
    println!("{}", pretty_table(&["Date", "Sales", "Total"], data));
    Ok(())
}
