//! Monthly totals over a list of expenses.

use serde::{Deserialize, Serialize};

use crate::domain::models::expense::{Expense, ExpenseType};
use crate::domain::payment_progress::finite_or_zero;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetTotals {
    pub total_fixed: f64,
    pub total_variable: f64,
    pub total_expenses: f64,
    /// Sum of paid amounts across both types
    pub total_paid: f64,
    /// Budget left after expenses; floored at 0 when overspent
    pub remaining: f64,
}

pub fn aggregate(expenses: &[Expense], budget: f64) -> BudgetTotals {
    let mut total_fixed = 0.0;
    let mut total_variable = 0.0;
    let mut total_paid = 0.0;

    for expense in expenses {
        let amount = finite_or_zero(expense.amount());
        match expense.expense_type {
            ExpenseType::Fixed => total_fixed += amount,
            ExpenseType::Variable => total_variable += amount,
        }
        total_paid += finite_or_zero(expense.paid_amount);
    }

    let total_expenses = total_fixed + total_variable;
    let remaining = (finite_or_zero(budget) - total_expenses).max(0.0);

    BudgetTotals {
        total_fixed,
        total_variable,
        total_expenses,
        total_paid,
        remaining,
    }
}

/// Split a list into (fixed, variable), keeping the original order.
pub fn split_by_type(expenses: Vec<Expense>) -> (Vec<Expense>, Vec<Expense>) {
    expenses
        .into_iter()
        .partition(|e| e.expense_type == ExpenseType::Fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::expense::test_support::expense;

    #[test]
    fn test_empty_list_leaves_budget_untouched() {
        let totals = aggregate(&[], 1000.0);
        assert_eq!(totals.total_fixed, 0.0);
        assert_eq!(totals.total_variable, 0.0);
        assert_eq!(totals.total_expenses, 0.0);
        assert_eq!(totals.total_paid, 0.0);
        assert_eq!(totals.remaining, 1000.0);
    }

    #[test]
    fn test_mixed_month() {
        let expenses = vec![
            expense("rent", ExpenseType::Fixed, 1, 300.0, 300.0),
            expense("food", ExpenseType::Variable, 1, 200.0, 50.0),
        ];
        let totals = aggregate(&expenses, 1000.0);
        assert_eq!(totals.total_fixed, 300.0);
        assert_eq!(totals.total_variable, 200.0);
        assert_eq!(totals.total_expenses, 500.0);
        assert_eq!(totals.total_paid, 350.0);
        assert_eq!(totals.remaining, 500.0);
    }

    #[test]
    fn test_overspending_floors_remaining() {
        let expenses = vec![
            expense("rent", ExpenseType::Fixed, 2, 400.0, 0.0),
            expense("trip", ExpenseType::Variable, 1, 500.0, 0.0),
        ];
        let totals = aggregate(&expenses, 1000.0);
        assert_eq!(totals.total_expenses, 1300.0);
        assert_eq!(totals.remaining, 0.0);
    }

    #[test]
    fn test_garbage_numbers_count_as_zero() {
        let expenses = vec![
            expense("a", ExpenseType::Fixed, 1, f64::NAN, f64::NAN),
            expense("b", ExpenseType::Variable, 2, 10.0, f64::INFINITY),
        ];
        let totals = aggregate(&expenses, f64::NAN);
        assert_eq!(totals.total_fixed, 0.0);
        assert_eq!(totals.total_variable, 20.0);
        assert_eq!(totals.total_paid, 0.0);
        assert_eq!(totals.remaining, 0.0);
    }

    #[test]
    fn test_split_by_type_keeps_order() {
        let expenses = vec![
            expense("a", ExpenseType::Variable, 1, 1.0, 0.0),
            expense("b", ExpenseType::Fixed, 1, 1.0, 0.0),
            expense("c", ExpenseType::Variable, 1, 1.0, 0.0),
        ];
        let (fixed, variable) = split_by_type(expenses);
        assert_eq!(fixed.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(variable.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);
    }
}
