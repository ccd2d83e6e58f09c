// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::models::{Credit, CreditPayment, Expense, PaymentMethod, Product, Sale, SaleItem, Status};
use crate::utils::{parse_date, parse_decimal};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tillbook", "tillbook"));

pub const DB_ENV: &str = "TILLBOOK_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("tillbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    info!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS products(
        code TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        cost_price TEXT NOT NULL,
        sale_price TEXT NOT NULL,
        stock TEXT NOT NULL DEFAULT '0'
    );

    CREATE TABLE IF NOT EXISTS sales(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','cancelled')),
        total TEXT NOT NULL,
        payment_method TEXT NOT NULL CHECK(payment_method IN ('cash','card','transfer')),
        commission TEXT,
        note TEXT,
        cancellation_reason TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_sales_date ON sales(date);

    -- product_code is not a foreign key; unknown codes cost zero
    CREATE TABLE IF NOT EXISTS sale_items(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sale_id INTEGER NOT NULL,
        product_code TEXT NOT NULL,
        quantity TEXT NOT NULL,
        FOREIGN KEY(sale_id) REFERENCES sales(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','cancelled')),
        amount TEXT NOT NULL,
        description TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

    CREATE TABLE IF NOT EXISTS credits(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer TEXT NOT NULL,
        due_date TEXT NOT NULL,
        total_amount TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS credit_payments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        credit_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','cancelled')),
        amount TEXT NOT NULL,
        FOREIGN KEY(credit_id) REFERENCES credits(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}

fn dec_col(raw: &str, what: &str) -> Result<Decimal> {
    parse_decimal(raw).with_context(|| format!("Corrupt {} in database", what))
}

pub fn load_products(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn.prepare(
        "SELECT code, name, cost_price, sale_price, stock FROM products ORDER BY code",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let code: String = r.get(0)?;
        let cost: String = r.get(2)?;
        let price: String = r.get(3)?;
        let stock: String = r.get(4)?;
        out.push(Product {
            name: r.get(1)?,
            cost_price: dec_col(&cost, "cost price")?,
            sale_price: dec_col(&price, "sale price")?,
            stock: dec_col(&stock, "stock")?,
            code,
        });
    }
    debug!(count = out.len(), "loaded products");
    Ok(out)
}

pub fn load_sales(conn: &Connection) -> Result<Vec<Sale>> {
    let mut items: HashMap<i64, Vec<SaleItem>> = HashMap::new();
    {
        let mut stmt =
            conn.prepare("SELECT sale_id, product_code, quantity FROM sale_items ORDER BY id")?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            let sale_id: i64 = r.get(0)?;
            let qty: String = r.get(2)?;
            items.entry(sale_id).or_default().push(SaleItem {
                code: r.get(1)?,
                quantity: dec_col(&qty, "item quantity")?,
            });
        }
    }

    let mut stmt = conn.prepare(
        "SELECT id, date, status, total, payment_method, commission, note, cancellation_reason
         FROM sales ORDER BY date, id",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let status: String = r.get(2)?;
        let total: String = r.get(3)?;
        let method: String = r.get(4)?;
        let commission: Option<String> = r.get(5)?;
        out.push(Sale {
            id,
            date: parse_date(&date)?,
            status: status.parse::<Status>()?,
            total: dec_col(&total, "sale total")?,
            payment_method: method.parse::<PaymentMethod>()?,
            commission: commission
                .as_deref()
                .map(|c| dec_col(c, "commission"))
                .transpose()?,
            note: r.get(6)?,
            cancellation_reason: r.get(7)?,
            items: items.remove(&id).unwrap_or_default(),
        });
    }
    debug!(count = out.len(), "loaded sales");
    Ok(out)
}

pub fn load_expenses(conn: &Connection) -> Result<Vec<Expense>> {
    let mut stmt = conn
        .prepare("SELECT id, date, status, amount, description FROM expenses ORDER BY date, id")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(1)?;
        let status: String = r.get(2)?;
        let amount: String = r.get(3)?;
        out.push(Expense {
            id: r.get(0)?,
            date: parse_date(&date)?,
            status: status.parse::<Status>()?,
            amount: dec_col(&amount, "expense amount")?,
            description: r.get(4)?,
        });
    }
    debug!(count = out.len(), "loaded expenses");
    Ok(out)
}

pub fn load_credits(conn: &Connection) -> Result<Vec<Credit>> {
    let mut payments: HashMap<i64, Vec<CreditPayment>> = HashMap::new();
    {
        let mut stmt = conn.prepare(
            "SELECT id, credit_id, date, status, amount FROM credit_payments ORDER BY date, id",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            let credit_id: i64 = r.get(1)?;
            let date: String = r.get(2)?;
            let status: String = r.get(3)?;
            let amount: String = r.get(4)?;
            payments.entry(credit_id).or_default().push(CreditPayment {
                id: r.get(0)?,
                date: parse_date(&date)?,
                status: status.parse::<Status>()?,
                amount: dec_col(&amount, "payment amount")?,
            });
        }
    }

    let mut stmt = conn
        .prepare("SELECT id, customer, due_date, total_amount FROM credits ORDER BY due_date, id")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let due: String = r.get(2)?;
        let total: String = r.get(3)?;
        out.push(Credit {
            id,
            customer: r.get(1)?,
            due_date: parse_date(&due)?,
            total_amount: dec_col(&total, "credit amount")?,
            payments: payments.remove(&id).unwrap_or_default(),
        });
    }
    debug!(count = out.len(), "loaded credits");
    Ok(out)
}

/// Writes a sale and its items; returns the new sale id.
pub fn insert_sale(conn: &Connection, sale: &Sale) -> Result<i64> {
    conn.execute(
        "INSERT INTO sales(date, status, total, payment_method, commission, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            sale.date.to_string(),
            sale.status.as_str(),
            sale.total.to_string(),
            sale.payment_method.as_str(),
            sale.commission.map(|c| c.to_string()),
            sale.note
        ],
    )?;
    let id = conn.last_insert_rowid();
    for item in &sale.items {
        conn.execute(
            "INSERT INTO sale_items(sale_id, product_code, quantity) VALUES (?1, ?2, ?3)",
            params![id, item.code, item.quantity.to_string()],
        )?;
    }
    Ok(id)
}

pub fn upsert_product(conn: &Connection, p: &Product) -> Result<()> {
    conn.execute(
        "INSERT INTO products(code, name, cost_price, sale_price, stock) VALUES (?1,?2,?3,?4,?5)
         ON CONFLICT(code) DO UPDATE SET name=excluded.name, cost_price=excluded.cost_price,
         sale_price=excluded.sale_price, stock=excluded.stock",
        params![
            p.code,
            p.name,
            p.cost_price.to_string(),
            p.sale_price.to_string(),
            p.stock.to_string()
        ],
    )?;
    Ok(())
}
