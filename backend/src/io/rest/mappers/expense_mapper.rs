use crate::domain::aggregation::BudgetTotals as DomainBudgetTotals;
use crate::domain::models::expense::{
    Expense as DomainExpense, ExpensePatch, ExpenseType as DomainExpenseType,
};
use shared::{
    BudgetTotals as SharedBudgetTotals, Expense as SharedExpense,
    ExpenseType as SharedExpenseType, UpdateExpenseRequest,
};

pub struct ExpenseMapper;

impl ExpenseMapper {
    /// Derived fields are computed here; the domain entity does not carry them.
    pub fn to_dto(domain: DomainExpense) -> SharedExpense {
        let amount = domain.amount();
        let is_paid = domain.is_paid();
        let progress = domain.progress();
        SharedExpense {
            id: domain.id,
            user_id: domain.user_id,
            category: domain.category,
            quantity: domain.quantity,
            unit_price: domain.unit_price,
            amount,
            expense_type: Self::to_dto_type(domain.expense_type),
            date: domain.date.format("%Y-%m-%d").to_string(),
            month_year: domain.month_year,
            paid_amount: domain.paid_amount,
            is_paid,
            progress,
        }
    }

    pub fn to_dtos(domain: Vec<DomainExpense>) -> Vec<SharedExpense> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_patch(request: UpdateExpenseRequest) -> ExpensePatch {
        ExpensePatch {
            category: request.category,
            quantity: request.quantity,
            unit_price: request.unit_price,
            paid_amount: request.paid_amount,
        }
    }

    pub fn totals_to_dto(totals: DomainBudgetTotals) -> SharedBudgetTotals {
        SharedBudgetTotals {
            total_fixed: totals.total_fixed,
            total_variable: totals.total_variable,
            total_expenses: totals.total_expenses,
            total_paid: totals.total_paid,
            remaining: totals.remaining,
        }
    }

    pub fn to_domain_type(dto_type: SharedExpenseType) -> DomainExpenseType {
        match dto_type {
            SharedExpenseType::Fixed => DomainExpenseType::Fixed,
            SharedExpenseType::Variable => DomainExpenseType::Variable,
        }
    }

    pub fn to_dto_type(domain_type: DomainExpenseType) -> SharedExpenseType {
        match domain_type {
            DomainExpenseType::Fixed => SharedExpenseType::Fixed,
            DomainExpenseType::Variable => SharedExpenseType::Variable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::expense::test_support::expense;

    #[test]
    fn test_to_dto_fills_derived_fields() {
        let dto = ExpenseMapper::to_dto(expense("e1", DomainExpenseType::Variable, 3, 50.0, 60.0));
        assert_eq!(dto.amount, 150.0);
        assert!(!dto.is_paid);
        assert_eq!(dto.progress, 40.0);
        assert_eq!(dto.date, "2025-12-01");
        assert_eq!(dto.expense_type, SharedExpenseType::Variable);
    }
}
