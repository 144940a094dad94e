//! Inputs and outcomes of the expense service operations.

use crate::domain::aggregation::BudgetTotals;
use crate::domain::models::expense::{Expense, ExpenseType};
use crate::domain::period::Period;

/// Form submission for a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateExpenseCommand {
    pub user_name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub expense_type: ExpenseType,
    /// "YYYY-MM" or "YYYY-MM-DD"
    pub date: Option<String>,
}

/// One user's month: expenses split by type plus totals against the budget.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodOverview {
    pub period: Period,
    pub budget: f64,
    pub fixed_expenses: Vec<Expense>,
    pub variable_expenses: Vec<Expense>,
    pub totals: BudgetTotals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RolloverOutcome {
    pub target: Period,
    pub copied: Vec<Expense>,
}

impl RolloverOutcome {
    pub fn copied_count(&self) -> usize {
        self.copied.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionTotal {
    pub total: f64,
    pub selected_count: usize,
    pub unmatched_ids: Vec<String>,
}
