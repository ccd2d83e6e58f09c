// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::margin;
use crate::models::{Expense, Product, Sale};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: String, // YYYY-MM
    pub sales: Decimal,
    pub expenses: Decimal,
    pub cogs: Decimal,
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
    pub gross_margin: Decimal,
    pub net_margin: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub count: usize,
    pub total: Decimal,
    pub sales: Vec<Sale>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryValue {
    pub products: usize,
    pub units: Decimal,
    pub cost_value: Decimal,
    pub retail_value: Decimal,
    pub potential_profit: Decimal,
}

fn month_key(d: NaiveDate) -> String {
    format!("{:04}-{:02}", d.year(), d.month())
}

/// Buckets sales and expenses by calendar month, most recent first.
///
/// Per-sale cost is not tracked by month, so `cogs` (the period total) is
/// spread across months in proportion to each month's share of sales.
pub fn monthly_breakdown(
    sales: &[Sale],
    expenses: &[Expense],
    cogs: Decimal,
) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<String, MonthlySummary> = BTreeMap::new();

    for sale in sales.iter().filter(|s| !s.status.is_cancelled()) {
        let key = month_key(sale.date);
        months
            .entry(key.clone())
            .or_insert_with(|| MonthlySummary {
                month: key,
                ..MonthlySummary::default()
            })
            .sales += sale.total;
    }
    for expense in expenses.iter().filter(|e| !e.status.is_cancelled()) {
        let key = month_key(expense.date);
        months
            .entry(key.clone())
            .or_insert_with(|| MonthlySummary {
                month: key,
                ..MonthlySummary::default()
            })
            .expenses += expense.amount;
    }

    let total_sales: Decimal = months.values().map(|m| m.sales).sum();
    months
        .into_values()
        .rev()
        .map(|mut m| {
            m.cogs = if total_sales.is_zero() {
                Decimal::ZERO
            } else {
                (m.sales / total_sales).saturating_mul(cogs)
            };
            m.gross_profit = m.sales - m.cogs;
            m.net_profit = m.gross_profit - m.expenses;
            m.gross_margin = margin(m.gross_profit, m.sales);
            m.net_margin = margin(m.net_profit, m.sales);
            m
        })
        .collect()
}

/// Groups sales by day, most recent first. Cancelled sales stay in the group
/// and its count but are left out of the day's total.
pub fn daily_sales(sales: &[Sale]) -> Vec<DailySales> {
    let mut days: BTreeMap<NaiveDate, Vec<Sale>> = BTreeMap::new();
    for sale in sales {
        days.entry(sale.date).or_default().push(sale.clone());
    }
    days.into_iter()
        .rev()
        .map(|(date, sales)| DailySales {
            date,
            count: sales.len(),
            total: sales
                .iter()
                .filter(|s| !s.status.is_cancelled())
                .map(|s| s.total)
                .sum(),
            sales,
        })
        .collect()
}

pub fn inventory_value(products: &[Product]) -> InventoryValue {
    let mut v = products
        .iter()
        .fold(InventoryValue::default(), |mut acc, p| {
            acc.units += p.stock;
            acc.cost_value += p.cost_price * p.stock;
            acc.retail_value += p.sale_price * p.stock;
            acc
        });
    v.products = products.len();
    v.potential_profit = v.retail_value - v.cost_value;
    v
}
