// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::models::{Credit, Expense, Sale};

/// Inclusive reporting window. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, ValidationError> {
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(ValidationError::InvertedRange {
                    from: f.to_string(),
                    to: t.to_string(),
                });
            }
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        self.from.is_none_or(|f| d >= f) && self.to.is_none_or(|t| d <= t)
    }

    /// Active sales dated inside the window.
    pub fn filter_sales(&self, sales: &[Sale]) -> Vec<Sale> {
        sales
            .iter()
            .filter(|s| !s.status.is_cancelled() && self.contains(s.date))
            .cloned()
            .collect()
    }

    /// Active expenses dated inside the window.
    pub fn filter_expenses(&self, expenses: &[Expense]) -> Vec<Expense> {
        expenses
            .iter()
            .filter(|e| !e.status.is_cancelled() && self.contains(e.date))
            .cloned()
            .collect()
    }

    /// Credits falling due inside the window.
    pub fn filter_credits(&self, credits: &[Credit]) -> Vec<Credit> {
        credits
            .iter()
            .filter(|c| self.contains(c.due_date))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::fixtures::*;
    use crate::models::{PaymentMethod, Status};

    #[test]
    fn bounds_are_inclusive() {
        let r = DateRange::new(Some(day(2025, 1, 1)), Some(day(2025, 1, 31))).unwrap();
        assert!(r.contains(day(2025, 1, 1)));
        assert!(r.contains(day(2025, 1, 31)));
        assert!(!r.contains(day(2025, 2, 1)));
        assert!(!r.contains(day(2024, 12, 31)));
    }

    #[test]
    fn open_range_accepts_everything() {
        assert!(DateRange::default().contains(day(1999, 1, 1)));
    }

    #[test]
    fn inverted_range_rejected() {
        assert!(DateRange::new(Some(day(2025, 2, 1)), Some(day(2025, 1, 1))).is_err());
    }

    #[test]
    fn filters_drop_cancelled_and_out_of_range() {
        let r = DateRange::new(Some(day(2025, 1, 1)), None).unwrap();
        let sales = vec![
            sale(day(2025, 1, 3), 10, PaymentMethod::Cash, Status::Active),
            sale(day(2025, 1, 4), 10, PaymentMethod::Cash, Status::Cancelled),
            sale(day(2024, 12, 30), 10, PaymentMethod::Cash, Status::Active),
        ];
        assert_eq!(r.filter_sales(&sales).len(), 1);

        let credits = vec![credit(day(2024, 6, 1), 10, &[]), credit(day(2025, 6, 1), 10, &[])];
        assert_eq!(r.filter_credits(&credits).len(), 1);
    }
}
