//! Client-side state for one user's monthly budget view.
//!
//! The session owns everything the view shows: the active month, the budget,
//! the loaded expenses and the checklist selection. Views read snapshots
//! through the accessors and change state only through the methods here.
//! All store-backed methods take `&mut self`, so a session never has more
//! than one request in flight.

use tracing::{info, warn};

use crate::domain::aggregation::{aggregate, BudgetTotals};
use crate::domain::commands::{CreateExpenseCommand, RolloverOutcome};
use crate::domain::error::{ServiceError, ServiceResult};
use crate::domain::expense_service::ExpenseService;
use crate::domain::models::expense::{Expense, ExpensePatch, ExpenseType};
use crate::domain::payment_progress::toggled_paid_amount;
use crate::domain::period::Period;
use crate::domain::selection::Selection;
use crate::domain::validation::{validate_budget, validate_paid_amount, validate_user_name, ExpenseValidationError};
use crate::storage::Connection;

pub struct BudgetSession<C: Connection> {
    service: ExpenseService<C>,
    user_name: String,
    period: Period,
    budget: f64,
    expenses: Vec<Expense>,
    selection: Selection,
}

impl<C: Connection> BudgetSession<C> {
    pub fn new(service: ExpenseService<C>, user_name: &str, period: Period, budget: f64) -> ServiceResult<Self> {
        let user_name = validate_user_name(user_name)?.to_string();
        let budget = validate_budget(budget)?;
        Ok(Self {
            service,
            user_name,
            period,
            budget,
            expenses: Vec::new(),
            selection: Selection::new(),
        })
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn expenses_of_type(&self, expense_type: ExpenseType) -> Vec<Expense> {
        self.expenses
            .iter()
            .filter(|e| e.expense_type == expense_type)
            .cloned()
            .collect()
    }

    pub fn expense(&self, expense_id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == expense_id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn totals(&self) -> BudgetTotals {
        aggregate(&self.expenses, self.budget)
    }

    pub fn selected_total(&self) -> f64 {
        self.selection.selected_total(&self.expenses)
    }

    pub fn set_budget(&mut self, budget: f64) -> Result<(), ExpenseValidationError> {
        self.budget = validate_budget(budget)?;
        Ok(())
    }

    /// Replace the list with the store's view of the active month. Selected
    /// ids that are no longer listed are dropped.
    pub async fn load(&mut self) -> ServiceResult<()> {
        let expenses = self
            .service
            .list_period_expenses(&self.user_name, self.period, None)
            .await?;
        self.replace_list(expenses);
        Ok(())
    }

    /// Switch month. The selection belongs to the old month and is cleared.
    pub async fn set_period(&mut self, period: Period) -> ServiceResult<()> {
        if period != self.period {
            self.selection.clear();
            self.expenses.clear();
            self.period = period;
        }
        self.load().await
    }

    pub fn toggle_selection(&mut self, expense_id: &str) -> bool {
        self.selection.toggle(expense_id)
    }

    /// Select-all checkbox for one table (or the whole month when `None`).
    pub fn toggle_all(&mut self, expense_type: Option<ExpenseType>) {
        let visible: Vec<Expense> = match expense_type {
            Some(expense_type) => self.expenses_of_type(expense_type),
            None => self.expenses.clone(),
        };
        self.selection = self.selection.toggle_all(&visible);
    }

    /// Create an expense in the active month for the session's user.
    pub async fn add_expense(
        &mut self,
        category: &str,
        quantity: u32,
        unit_price: f64,
        expense_type: ExpenseType,
    ) -> ServiceResult<Expense> {
        let command = CreateExpenseCommand {
            user_name: self.user_name.clone(),
            category: category.to_string(),
            quantity,
            unit_price,
            expense_type,
            date: Some(self.period.month_year()),
        };
        let expense = self.service.create_expense(command).await?;
        self.load().await?;
        Ok(expense)
    }

    /// Show `paid_amount` immediately, then reconcile with the store. If the
    /// store rejects the write the previous amount is restored.
    pub async fn set_paid_amount(&mut self, expense_id: &str, paid_amount: f64) -> ServiceResult<Expense> {
        let paid_amount = validate_paid_amount(paid_amount)?;
        let previous = self.local_expense(expense_id)?.paid_amount;

        self.patch_local(expense_id, |expense| expense.paid_amount = paid_amount);
        match self.service.set_paid_amount(expense_id, paid_amount).await {
            Ok(confirmed) => {
                self.replace_local(confirmed.clone());
                Ok(confirmed)
            }
            Err(e) => {
                warn!(
                    "Paid amount for {} not saved, restoring {:.2}: {}",
                    expense_id, previous, e
                );
                self.patch_local(expense_id, |expense| expense.paid_amount = previous);
                Err(e)
            }
        }
    }

    pub async fn toggle_payment_status(&mut self, expense_id: &str) -> ServiceResult<Expense> {
        let expense = self.local_expense(expense_id)?;
        let paid_amount = toggled_paid_amount(expense.amount(), expense.paid_amount);
        self.set_paid_amount(expense_id, paid_amount).await
    }

    pub async fn adjust_quantity(&mut self, expense_id: &str, delta: i64) -> ServiceResult<Expense> {
        self.local_expense(expense_id)?;
        let confirmed = self.service.adjust_quantity(expense_id, delta).await?;
        self.replace_local(confirmed.clone());
        Ok(confirmed)
    }

    pub async fn update_expense(&mut self, expense_id: &str, patch: ExpensePatch) -> ServiceResult<Expense> {
        self.local_expense(expense_id)?;
        let confirmed = self.service.update_expense(expense_id, patch).await?;
        self.replace_local(confirmed.clone());
        Ok(confirmed)
    }

    pub async fn delete_expense(&mut self, expense_id: &str) -> ServiceResult<()> {
        self.local_expense(expense_id)?;
        self.service.delete_expense(expense_id).await?;
        self.expenses.retain(|e| e.id != expense_id);
        self.selection.deselect(expense_id);
        Ok(())
    }

    pub async fn copy_to_next_month(&mut self, expense_type: Option<ExpenseType>) -> ServiceResult<RolloverOutcome> {
        self.service
            .copy_to_next_month(&self.user_name, self.period, expense_type)
            .await
    }

    fn local_expense(&self, expense_id: &str) -> ServiceResult<&Expense> {
        self.expense(expense_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Expense {} in {}", expense_id, self.period)))
    }

    fn patch_local(&mut self, expense_id: &str, change: impl FnOnce(&mut Expense)) {
        if let Some(expense) = self.expenses.iter_mut().find(|e| e.id == expense_id) {
            change(expense);
        }
    }

    fn replace_local(&mut self, confirmed: Expense) {
        if let Some(expense) = self.expenses.iter_mut().find(|e| e.id == confirmed.id) {
            *expense = confirmed;
        }
    }

    fn replace_list(&mut self, expenses: Vec<Expense>) {
        self.expenses = expenses;
        let dropped = self.selection.retain_present(&self.expenses);
        if !dropped.is_empty() {
            info!("Dropped {} stale selection(s) after reload", dropped.len());
        }
    }
}
