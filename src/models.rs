// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Largest amount or quantity accepted on input (one trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

static PRODUCT_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Lifecycle state shared by sales, expenses and credit payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Cancelled,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Cancelled => "cancelled",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Status::Cancelled)
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Status::Active),
            "cancelled" | "canceled" => Ok(Status::Cancelled),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "transfer" => Ok(PaymentMethod::Transfer),
            other => Err(ValidationError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub code: String,
    pub quantity: Decimal,
}

impl SaleItem {
    /// Parses the `CODE:QTY` form used on the command line.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let (code, qty) = s
            .split_once(':')
            .ok_or_else(|| ValidationError::MalformedItem(s.to_string()))?;
        let quantity = qty
            .trim()
            .parse::<Decimal>()
            .map_err(|_| ValidationError::MalformedItem(s.to_string()))?;
        let item = SaleItem {
            code: code.trim().to_string(),
            quantity,
        };
        item.validate()?;
        Ok(item)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_code(&self.code)?;
        if self.quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity {
                code: self.code.clone(),
                quantity: self.quantity,
            });
        }
        within_limit("quantity", self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub date: NaiveDate,
    pub status: Status,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub commission: Option<Decimal>,
    pub note: Option<String>,
    pub cancellation_reason: Option<String>,
    pub items: Vec<SaleItem>,
}

impl Sale {
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_negative("sale total", self.total)?;
        if let Some(c) = self.commission {
            non_negative("commission", c)?;
        }
        for item in &self.items {
            item.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub status: Status,
    pub amount: Decimal,
    pub description: String,
}

impl Expense {
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_negative("expense amount", self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditPayment {
    pub id: i64,
    pub date: NaiveDate,
    pub status: Status,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    pub id: i64,
    pub customer: String,
    pub due_date: NaiveDate,
    pub total_amount: Decimal,
    pub payments: Vec<CreditPayment>,
}

impl Credit {
    /// Sum of the active payments.
    pub fn paid_amount(&self) -> Decimal {
        self.payments
            .iter()
            .filter(|p| p.status == Status::Active)
            .map(|p| p.amount)
            .sum()
    }

    pub fn pending_amount(&self) -> Decimal {
        self.total_amount - self.paid_amount()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub code: String,
    pub name: String,
    pub cost_price: Decimal,
    pub sale_price: Decimal,
    pub stock: Decimal,
}

impl Product {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_code(&self.code)?;
        non_negative("cost price", self.cost_price)?;
        non_negative("sale price", self.sale_price)?;
        non_negative("stock", self.stock)
    }
}

fn validate_code(code: &str) -> Result<(), ValidationError> {
    if PRODUCT_CODE.is_match(code) {
        Ok(())
    } else {
        Err(ValidationError::InvalidProductCode(code.to_string()))
    }
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    within_limit(field, value)
}

fn within_limit(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge { field, value });
    }
    Ok(())
}
