// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calculations::inventory_value;
use crate::db::{load_products, upsert_product};
use crate::models::Product;
use crate::utils::{fmt_money, get_currency, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("inventory", sub)) => inventory(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let product = Product {
        code: sub.get_one::<String>("code").unwrap().trim().to_string(),
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        cost_price: parse_decimal(sub.get_one::<String>("cost").unwrap())?,
        sale_price: parse_decimal(sub.get_one::<String>("price").unwrap())?,
        stock: parse_decimal(sub.get_one::<String>("stock").unwrap())?,
    };
    product.validate()?;
    upsert_product(conn, &product)?;
    info!(code = %product.code, "product saved");
    println!("Saved product {} ({})", product.code, product.name);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let products = load_products(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &products)? {
        let rows = products
            .into_iter()
            .map(|p| {
                vec![
                    p.code,
                    p.name,
                    format!("{:.2}", p.cost_price),
                    format!("{:.2}", p.sale_price),
                    p.stock.normalize().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Code", "Name", "Cost", "Price", "Stock"], rows)
        );
    }
    Ok(())
}

fn inventory(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let value = inventory_value(&load_products(conn)?);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &value)? {
        let ccy = get_currency(conn)?;
        let rows = vec![
            vec!["Products".into(), value.products.to_string()],
            vec!["Units in stock".into(), value.units.normalize().to_string()],
            vec!["Value at cost".into(), fmt_money(&value.cost_value, &ccy)],
            vec!["Value at sale price".into(), fmt_money(&value.retail_value, &ccy)],
            vec!["Potential profit".into(), fmt_money(&value.potential_profit, &ccy)],
        ];
        println!("{}", pretty_table(&["Inventory", "Value"], rows));
    }
    Ok(())
}
