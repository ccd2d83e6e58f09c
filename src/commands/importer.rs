// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{insert_sale, upsert_product};
use crate::models::{PaymentMethod, Product, Sale, SaleItem, Status};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("products", sub)) => import_products(conn, sub),
        Some(("sales", sub)) => import_sales(conn, sub),
        _ => Ok(()),
    }
}

fn reader(sub: &clap::ArgMatches) -> Result<(String, csv::Reader<std::fs::File>)> {
    let path = sub.get_one::<String>("path").unwrap().trim().to_string();
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(&path)
        .with_context(|| format!("Open CSV {}", path))?;
    Ok((path, rdr))
}

/// Columns: code,name,cost,price[,stock]
fn import_products(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (path, mut rdr) = reader(sub)?;
    let tx = conn.transaction()?;
    let mut count = 0usize;
    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = line + 2;
        let code = rec.get(0).context("code missing")?.to_string();
        let product = Product {
            name: rec.get(1).context("name missing")?.to_string(),
            cost_price: parse_decimal(rec.get(2).context("cost missing")?)
                .with_context(|| format!("Row {}: bad cost for {}", row, code))?,
            sale_price: parse_decimal(rec.get(3).context("price missing")?)
                .with_context(|| format!("Row {}: bad price for {}", row, code))?,
            stock: match rec.get(4).filter(|s| !s.is_empty()) {
                Some(s) => parse_decimal(s)
                    .with_context(|| format!("Row {}: bad stock for {}", row, code))?,
                None => Default::default(),
            },
            code,
        };
        product
            .validate()
            .with_context(|| format!("Row {} rejected", row))?;
        upsert_product(&tx, &product)?;
        count += 1;
    }
    tx.commit()?;
    info!(count, path = %path, "products imported");
    println!("Imported {} products from {}", count, path);
    Ok(())
}

/// Columns: date,total,method,commission,items,note
/// where items is `CODE:QTY` separated by `;`.
fn import_sales(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (path, mut rdr) = reader(sub)?;
    let tx = conn.transaction()?;
    let mut count = 0usize;
    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = line + 2;
        let items = rec
            .get(4)
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(SaleItem::parse)
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Row {}: bad items", row))?;
        let sale = Sale {
            id: 0,
            date: parse_date(rec.get(0).context("date missing")?)
                .with_context(|| format!("Row {}: bad date", row))?,
            status: Status::Active,
            total: parse_decimal(rec.get(1).context("total missing")?)
                .with_context(|| format!("Row {}: bad total", row))?,
            payment_method: rec
                .get(2)
                .context("method missing")?
                .parse::<PaymentMethod>()
                .with_context(|| format!("Row {}: bad payment method", row))?,
            commission: rec
                .get(3)
                .filter(|s| !s.is_empty())
                .map(parse_decimal)
                .transpose()
                .with_context(|| format!("Row {}: bad commission", row))?,
            note: rec.get(5).filter(|s| !s.is_empty()).map(str::to_string),
            cancellation_reason: None,
            items,
        };
        sale.validate().with_context(|| format!("Row {} rejected", row))?;
        insert_sale(&tx, &sale)?;
        count += 1;
    }
    tx.commit()?;
    info!(count, path = %path, "sales imported");
    println!("Imported {} sales from {}", count, path);
    Ok(())
}
