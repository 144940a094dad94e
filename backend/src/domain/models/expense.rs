use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::payment_progress::{self, PaymentStatus};
use crate::domain::period::Period;

/// Fixed (recurring) or variable expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseType {
    #[serde(rename = "fijo")]
    Fixed,
    #[serde(rename = "variable")]
    Variable,
}

impl ExpenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::Fixed => "fijo",
            ExpenseType::Variable => "variable",
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fijo" | "fixed" => Ok(ExpenseType::Fixed),
            "variable" => Ok(ExpenseType::Variable),
            other => Err(format!("Unknown expense type: '{}'", other)),
        }
    }
}

/// A persisted expense.
///
/// Only the independent fields are stored. `amount` and `is_paid` are always
/// computed from them, so stored and derived values cannot drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub expense_type: ExpenseType,
    /// Always the first day of a month
    pub date: NaiveDate,
    /// "YYYY-MM", set on records created by a rollover
    pub month_year: Option<String>,
    pub paid_amount: f64,
    pub created_at: String,
}

impl Expense {
    pub fn amount(&self) -> f64 {
        line_amount(self.quantity, self.unit_price)
    }

    pub fn is_paid(&self) -> bool {
        payment_progress::is_paid(self.amount(), self.paid_amount)
    }

    pub fn progress(&self) -> f64 {
        payment_progress::progress(self.amount(), self.paid_amount)
    }

    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::from_amounts(self.amount(), self.paid_amount)
    }
}

/// quantity * unit_price, with non-finite prices counted as 0
pub fn line_amount(quantity: u32, unit_price: f64) -> f64 {
    quantity as f64 * payment_progress::finite_or_zero(unit_price)
}

/// An expense ready to be inserted; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub user_id: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub expense_type: ExpenseType,
    pub date: NaiveDate,
    pub month_year: Option<String>,
    pub paid_amount: f64,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePatch {
    pub category: Option<String>,
    pub quantity: Option<u32>,
    pub unit_price: Option<f64>,
    pub paid_amount: Option<f64>,
}

impl ExpensePatch {
    pub fn paid_amount(paid_amount: f64) -> Self {
        Self {
            paid_amount: Some(paid_amount),
            ..Default::default()
        }
    }

    pub fn quantity(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.quantity.is_none()
            && self.unit_price.is_none()
            && self.paid_amount.is_none()
    }

    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(category) = &self.category {
            expense.category = category.trim().to_string();
        }
        if let Some(quantity) = self.quantity {
            expense.quantity = quantity;
        }
        if let Some(unit_price) = self.unit_price {
            expense.unit_price = unit_price;
        }
        if let Some(paid_amount) = self.paid_amount {
            expense.paid_amount = paid_amount;
        }
    }
}

/// Store-side filter for listing a user's expenses. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub expense_type: Option<ExpenseType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn for_period(period: Period) -> Self {
        Self {
            expense_type: None,
            date_from: Some(period.first_day()),
            date_to: Some(period.last_day()),
        }
    }

    pub fn with_type(mut self, expense_type: Option<ExpenseType>) -> Self {
        self.expense_type = expense_type;
        self
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(expense_type) = self.expense_type {
            if expense.expense_type != expense_type {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if expense.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if expense.date > to {
                return false;
            }
        }
        true
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::expense;
    use super::*;

    #[test]
    fn test_amount_follows_quantity_and_price() {
        let mut e = expense("a", ExpenseType::Fixed, 3, 12.5, 0.0);
        assert_eq!(e.amount(), 37.5);

        ExpensePatch::quantity(4).apply_to(&mut e);
        assert_eq!(e.amount(), 50.0);

        ExpensePatch { unit_price: Some(2.0), ..Default::default() }.apply_to(&mut e);
        assert_eq!(e.amount(), 8.0);
    }

    #[test]
    fn test_is_paid_tracks_paid_amount() {
        let mut e = expense("a", ExpenseType::Variable, 1, 150.0, 0.0);
        assert!(!e.is_paid());
        assert_eq!(e.payment_status(), PaymentStatus::Pending);

        ExpensePatch::paid_amount(150.0).apply_to(&mut e);
        assert!(e.is_paid());
        assert_eq!(e.progress(), 100.0);

        // raising the price reopens the expense
        ExpensePatch { unit_price: Some(200.0), ..Default::default() }.apply_to(&mut e);
        assert!(!e.is_paid());
        assert_eq!(e.progress(), 75.0);
    }

    #[test]
    fn test_expense_type_parsing() {
        assert_eq!("fijo".parse::<ExpenseType>().unwrap(), ExpenseType::Fixed);
        assert_eq!("Fixed".parse::<ExpenseType>().unwrap(), ExpenseType::Fixed);
        assert_eq!(" VARIABLE ".parse::<ExpenseType>().unwrap(), ExpenseType::Variable);
        assert!("monthly".parse::<ExpenseType>().is_err());
    }

    #[test]
    fn test_filter_for_period() {
        let period = Period::new(2025, 12).unwrap();
        let filter = ExpenseFilter::for_period(period).with_type(Some(ExpenseType::Fixed));

        let mut e = expense("a", ExpenseType::Fixed, 1, 1.0, 0.0);
        assert!(filter.matches(&e));

        e.expense_type = ExpenseType::Variable;
        assert!(!filter.matches(&e));

        e.expense_type = ExpenseType::Fixed;
        e.date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(!filter.matches(&e));
    }
}
