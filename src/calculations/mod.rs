// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure reductions over ledger snapshots.
//!
//! Every function here takes already-loaded records and returns plain
//! metrics; nothing touches the database or the terminal.

mod breakdown;
mod range;

pub use breakdown::{
    DailySales, InventoryValue, MonthlySummary, daily_sales, inventory_value, monthly_breakdown,
};
pub use range::DateRange;

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::models::{Credit, Expense, PaymentMethod, Product, Sale};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesMetrics {
    pub total_sales: Decimal,
    pub cash_sales: Decimal,
    pub card_sales: Decimal,
    pub transfer_sales: Decimal,
    pub total_commissions: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreditsMetrics {
    pub total_amount: Decimal,
    pub total_paid: Decimal,
    pub pending_amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfitMetrics {
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
    pub gross_profit_margin: Decimal,
    pub net_profit_margin: Decimal,
}

/// Flat record handed to the report views.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportMetrics {
    #[serde(flatten)]
    pub sales: SalesMetrics,
    pub total_expenses: Decimal,
    #[serde(flatten)]
    pub credits: CreditsMetrics,
    pub cost_of_goods_sold: Decimal,
    #[serde(flatten)]
    pub profit: ProfitMetrics,
    pub cash_in_register: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportInputs {
    pub sales: Vec<Sale>,
    pub expenses: Vec<Expense>,
    pub credits: Vec<Credit>,
    pub products: Vec<Product>,
    pub petty_cash: Decimal,
}

pub fn sales_metrics(sales: &[Sale]) -> SalesMetrics {
    sales
        .iter()
        .filter(|s| !s.status.is_cancelled())
        .fold(SalesMetrics::default(), |mut acc, sale| {
            acc.total_sales += sale.total;
            match sale.payment_method {
                PaymentMethod::Cash => acc.cash_sales += sale.total,
                PaymentMethod::Card => acc.card_sales += sale.total,
                PaymentMethod::Transfer => acc.transfer_sales += sale.total,
            }
            acc.total_commissions += sale.commission.unwrap_or(Decimal::ZERO);
            acc
        })
}

pub fn expenses_total(expenses: &[Expense]) -> Decimal {
    expenses
        .iter()
        .filter(|e| !e.status.is_cancelled())
        .map(|e| e.amount)
        .sum()
}

pub fn credits_metrics(credits: &[Credit]) -> CreditsMetrics {
    credits
        .iter()
        .fold(CreditsMetrics::default(), |mut acc, credit| {
            let paid = credit.paid_amount();
            acc.total_amount += credit.total_amount;
            acc.total_paid += paid;
            acc.pending_amount += credit.total_amount - paid;
            acc
        })
}

/// Cost of the goods behind non-cancelled sales. Items whose code has no
/// matching product cost nothing. Saturates instead of overflowing.
pub fn cost_of_goods_sold(sales: &[Sale], products: &[Product]) -> Decimal {
    // First product wins on duplicate codes.
    let mut by_code: HashMap<&str, &Product> = HashMap::with_capacity(products.len());
    for p in products {
        by_code.entry(p.code.as_str()).or_insert(p);
    }

    sales
        .iter()
        .filter(|s| !s.status.is_cancelled())
        .flat_map(|s| s.items.iter())
        .filter_map(|item| {
            by_code
                .get(item.code.as_str())
                .map(|p| p.cost_price.saturating_mul(item.quantity))
        })
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

pub fn profit_metrics(
    total_sales: Decimal,
    cost_of_goods_sold: Decimal,
    total_expenses: Decimal,
    total_commissions: Decimal,
) -> ProfitMetrics {
    let gross_profit = total_sales - cost_of_goods_sold;
    let net_profit = gross_profit - total_expenses - total_commissions;
    ProfitMetrics {
        gross_profit,
        net_profit,
        gross_profit_margin: margin(gross_profit, total_sales),
        net_profit_margin: margin(net_profit, total_sales),
    }
}

pub fn cash_in_register(
    cash_sales: Decimal,
    total_expenses: Decimal,
    total_commissions: Decimal,
    petty_cash: Decimal,
) -> Decimal {
    cash_sales - total_expenses - total_commissions + petty_cash
}

/// Percentage of `part` over `whole`; zero when `whole` is zero. Ratios past
/// the `Decimal` range clamp to `Decimal::MAX` or `Decimal::MIN`.
pub fn margin(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() || part.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_sign_negative() == whole.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}

pub fn report_calculations(inputs: &ReportInputs) -> ReportMetrics {
    let sales = sales_metrics(&inputs.sales);
    let total_expenses = expenses_total(&inputs.expenses);
    let credits = credits_metrics(&inputs.credits);
    let cost_of_goods_sold = cost_of_goods_sold(&inputs.sales, &inputs.products);
    let profit = profit_metrics(
        sales.total_sales,
        cost_of_goods_sold,
        total_expenses,
        sales.total_commissions,
    );
    let cash_in_register = cash_in_register(
        sales.cash_sales,
        total_expenses,
        sales.total_commissions,
        inputs.petty_cash,
    );
    debug!(
        sales = inputs.sales.len(),
        expenses = inputs.expenses.len(),
        credits = inputs.credits.len(),
        products = inputs.products.len(),
        "computed report metrics"
    );

    ReportMetrics {
        sales,
        total_expenses,
        credits,
        cost_of_goods_sold,
        profit,
        cash_in_register,
    }
}

/// Caches the last computed report and only recomputes when the inputs change.
#[derive(Debug, Default)]
pub struct ReportMemo {
    cached: Option<(ReportInputs, ReportMetrics)>,
    recomputations: usize,
}

impl ReportMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, inputs: &ReportInputs) -> &ReportMetrics {
        let fresh = matches!(&self.cached, Some((prev, _)) if prev == inputs);
        if !fresh {
            debug!("report inputs changed, recomputing");
            self.recomputations += 1;
            self.cached = None;
        }
        let (_, metrics) = self
            .cached
            .get_or_insert_with(|| (inputs.clone(), report_calculations(inputs)));
        metrics
    }

    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::models::{
        Credit, CreditPayment, Expense, PaymentMethod, Product, Sale, SaleItem, Status,
    };

    pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    pub fn sale(date: NaiveDate, total: i64, method: PaymentMethod, status: Status) -> Sale {
        Sale {
            id: 0,
            date,
            status,
            total: dec(total),
            payment_method: method,
            commission: None,
            note: None,
            cancellation_reason: None,
            items: Vec::new(),
        }
    }

    pub fn item(code: &str, qty: i64) -> SaleItem {
        SaleItem {
            code: code.into(),
            quantity: dec(qty),
        }
    }

    pub fn expense(date: NaiveDate, amount: i64, status: Status) -> Expense {
        Expense {
            id: 0,
            date,
            status,
            amount: dec(amount),
            description: "supplies".into(),
        }
    }

    pub fn product(code: &str, cost: i64, price: i64, stock: i64) -> Product {
        Product {
            code: code.into(),
            name: code.to_lowercase(),
            cost_price: dec(cost),
            sale_price: dec(price),
            stock: dec(stock),
        }
    }

    pub fn credit(due: NaiveDate, total: i64, payments: &[(i64, Status)]) -> Credit {
        Credit {
            id: 0,
            customer: "walk-in".into(),
            due_date: due,
            total_amount: dec(total),
            payments: payments
                .iter()
                .enumerate()
                .map(|(i, (amount, status))| CreditPayment {
                    id: i as i64 + 1,
                    date: due,
                    status: *status,
                    amount: dec(*amount),
                })
                .collect(),
        }
    }
}
