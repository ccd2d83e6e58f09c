// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejections raised while turning user or CSV input into ledger records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unknown status '{0}', expected active|cancelled")]
    UnknownStatus(String),

    #[error("Unknown payment method '{0}', expected cash|card|transfer")]
    UnknownPaymentMethod(String),

    #[error("Invalid product code '{0}', expected letters, digits, '-' or '_'")]
    InvalidProductCode(String),

    #[error("Malformed item '{0}', expected CODE:QTY")]
    MalformedItem(String),

    #[error("Quantity for '{code}' must be positive, got {quantity}")]
    NonPositiveQuantity { code: String, quantity: Decimal },

    #[error("{field} cannot be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("{field} is too large, got {value}")]
    AmountTooLarge { field: &'static str, value: Decimal },

    #[error("Invalid date range: {from} is after {to}")]
    InvertedRange { from: String, to: String },
}
