//! Copying a month's expenses into the following month.

use crate::domain::models::expense::{Expense, NewExpense};
use crate::domain::period::Period;

/// Build next month's records from `expenses` of period `from`.
///
/// Every record lands on the first day of the next month with `month_year`
/// set and payment state reset. Source records are not touched.
pub fn rollover(expenses: &[Expense], from: Period) -> Vec<NewExpense> {
    let target = from.next();
    let date = target.first_day();
    let month_year = target.month_year();

    expenses
        .iter()
        .map(|expense| NewExpense {
            user_id: expense.user_id.clone(),
            category: expense.category.clone(),
            quantity: expense.quantity,
            unit_price: expense.unit_price,
            expense_type: expense.expense_type,
            date,
            month_year: Some(month_year.clone()),
            paid_amount: 0.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::expense::test_support::expense;
    use crate::domain::models::expense::ExpenseType;
    use chrono::NaiveDate;

    #[test]
    fn test_december_rolls_into_january() {
        let source = vec![
            expense("rent", ExpenseType::Fixed, 1, 900.0, 900.0),
            expense("internet", ExpenseType::Fixed, 2, 25.5, 10.0),
        ];
        let records = rollover(&source, Period::new(2025, 12).unwrap());

        assert_eq!(records.len(), 2);
        for (record, original) in records.iter().zip(&source) {
            assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
            assert_eq!(record.month_year.as_deref(), Some("2026-01"));
            assert_eq!(record.paid_amount, 0.0);
            assert_eq!(record.user_id, original.user_id);
            assert_eq!(record.category, original.category);
            assert_eq!(record.quantity, original.quantity);
            assert_eq!(record.unit_price, original.unit_price);
            assert_eq!(record.expense_type, original.expense_type);
        }
    }

    #[test]
    fn test_mid_year_and_empty() {
        let source = vec![expense("food", ExpenseType::Variable, 1, 60.0, 0.0)];
        let records = rollover(&source, Period::new(2025, 6).unwrap());
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(records[0].month_year.as_deref(), Some("2025-07"));

        assert!(rollover(&[], Period::new(2025, 6).unwrap()).is_empty());
    }
}
