//! Expense operations for one user and month.
//!
//! Every mutation validates its input first, issues exactly one store call
//! (plus a re-read for confirmation), and returns the record as the store
//! now holds it. Derived values are recomputed from that record.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::aggregation::{aggregate, split_by_type};
use crate::domain::commands::{CreateExpenseCommand, PeriodOverview, RolloverOutcome, SelectionTotal};
use crate::domain::error::{ServiceError, ServiceResult};
use crate::domain::models::expense::{Expense, ExpenseFilter, ExpensePatch, ExpenseType, NewExpense};
use crate::domain::payment_progress::toggled_paid_amount;
use crate::domain::period::Period;
use crate::domain::rollover::rollover;
use crate::domain::selection::Selection;
use crate::domain::user_service::UserService;
use crate::domain::validation::{
    normalize_expense_date, validate_budget, validate_category, validate_paid_amount, validate_patch,
    validate_quantity, validate_unit_price, validate_user_name,
};
use crate::storage::{Connection, ExpenseStorage};

#[derive(Clone)]
pub struct ExpenseService<C: Connection> {
    expense_repository: C::ExpenseRepository,
    user_service: UserService<C>,
}

impl<C: Connection> ExpenseService<C> {
    pub fn new(connection: Arc<C>, user_service: UserService<C>) -> Self {
        Self {
            expense_repository: connection.create_expense_repository(),
            user_service,
        }
    }

    pub fn user_service(&self) -> &UserService<C> {
        &self.user_service
    }

    /// Validate a form submission, create the user if needed and store the expense.
    pub async fn create_expense(&self, command: CreateExpenseCommand) -> ServiceResult<Expense> {
        let user_name = validate_user_name(&command.user_name)?.to_string();
        let category = validate_category(&command.category)?;
        let quantity = validate_quantity(command.quantity)?;
        let unit_price = validate_unit_price(command.unit_price)?;
        let date = normalize_expense_date(command.date.as_deref())?;

        let user = self.user_service.find_or_create_user(&user_name).await?;
        let record = NewExpense {
            user_id: user.id,
            category,
            quantity,
            unit_price,
            expense_type: command.expense_type,
            date,
            month_year: None,
            paid_amount: 0.0,
        };

        let expense = self.expense_repository.insert_expense(&record).await.map_err(|e| {
            error!("Failed to store expense for '{}': {:#}", user_name, e);
            ServiceError::Storage(e)
        })?;
        info!(
            "Created expense {} '{}' ({}) for '{}' on {}",
            expense.id, expense.category, expense.expense_type, user_name, expense.date
        );
        Ok(expense)
    }

    /// A user's expenses for one month, oldest first. Unknown users have none.
    pub async fn list_period_expenses(
        &self,
        user_name: &str,
        period: Period,
        expense_type: Option<ExpenseType>,
    ) -> ServiceResult<Vec<Expense>> {
        let user = match self.user_service.find_user(user_name).await? {
            Some(user) => user,
            None => {
                warn!("No user named '{}', showing an empty month", user_name);
                return Ok(Vec::new());
            }
        };

        let filter = ExpenseFilter::for_period(period).with_type(expense_type);
        let expenses = self
            .expense_repository
            .list_expenses(&user.id, &filter)
            .await
            .map_err(|e| {
                error!("Failed to list expenses for '{}' in {}: {:#}", user.name, period, e);
                ServiceError::Storage(e)
            })?;
        info!("Loaded {} expense(s) for '{}' in {}", expenses.len(), user.name, period);
        Ok(expenses)
    }

    pub async fn period_overview(&self, user_name: &str, period: Period, budget: f64) -> ServiceResult<PeriodOverview> {
        let budget = validate_budget(budget)?;
        let expenses = self.list_period_expenses(user_name, period, None).await?;

        let totals = aggregate(&expenses, budget);
        let (fixed_expenses, variable_expenses) = split_by_type(expenses);
        Ok(PeriodOverview {
            period,
            budget,
            fixed_expenses,
            variable_expenses,
            totals,
        })
    }

    pub async fn get_expense(&self, expense_id: &str) -> ServiceResult<Expense> {
        self.expense_repository
            .get_expense(expense_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Expense {}", expense_id)))
    }

    /// Apply a partial edit and return the record confirmed by the store.
    pub async fn update_expense(&self, expense_id: &str, patch: ExpensePatch) -> ServiceResult<Expense> {
        let patch = validate_patch(&patch)?;
        let updated = self
            .expense_repository
            .update_expense(expense_id, &patch)
            .await
            .map_err(|e| {
                error!("Failed to update expense {}: {:#}", expense_id, e);
                ServiceError::Storage(e)
            })?;
        if updated.is_none() {
            return Err(ServiceError::NotFound(format!("Expense {}", expense_id)));
        }

        let confirmed = self.get_expense(expense_id).await?;
        info!(
            "Updated expense {}: amount={:.2} paid={:.2} status={:?}",
            confirmed.id,
            confirmed.amount(),
            confirmed.paid_amount,
            confirmed.payment_status()
        );
        Ok(confirmed)
    }

    /// Step the quantity by `delta`, never going below 1.
    pub async fn adjust_quantity(&self, expense_id: &str, delta: i64) -> ServiceResult<Expense> {
        let expense = self.get_expense(expense_id).await?;
        let quantity = (expense.quantity as i64)
            .saturating_add(delta)
            .clamp(1, u32::MAX as i64) as u32;
        self.update_expense(expense_id, ExpensePatch::quantity(quantity)).await
    }

    pub async fn set_paid_amount(&self, expense_id: &str, paid_amount: f64) -> ServiceResult<Expense> {
        let paid_amount = validate_paid_amount(paid_amount)?;
        self.update_expense(expense_id, ExpensePatch::paid_amount(paid_amount)).await
    }

    /// Paid expenses go back to 0 paid; pending ones are settled in full.
    pub async fn toggle_payment_status(&self, expense_id: &str) -> ServiceResult<Expense> {
        let expense = self.get_expense(expense_id).await?;
        let paid_amount = toggled_paid_amount(expense.amount(), expense.paid_amount);
        self.update_expense(expense_id, ExpensePatch::paid_amount(paid_amount)).await
    }

    pub async fn delete_expense(&self, expense_id: &str) -> ServiceResult<()> {
        let deleted = self.expense_repository.delete_expense(expense_id).await.map_err(|e| {
            error!("Failed to delete expense {}: {:#}", expense_id, e);
            ServiceError::Storage(e)
        })?;
        if !deleted {
            return Err(ServiceError::NotFound(format!("Expense {}", expense_id)));
        }
        info!("Deleted expense {}", expense_id);
        Ok(())
    }

    /// Copy the month's expenses (optionally one type only) into the next
    /// month as a single batch. A rejected batch fails as a whole.
    pub async fn copy_to_next_month(
        &self,
        user_name: &str,
        period: Period,
        expense_type: Option<ExpenseType>,
    ) -> ServiceResult<RolloverOutcome> {
        let source = self.list_period_expenses(user_name, period, expense_type).await?;
        let target = period.next();
        let records = rollover(&source, period);
        if records.is_empty() {
            info!("Nothing to copy from {} to {}", period, target);
            return Ok(RolloverOutcome { target, copied: Vec::new() });
        }

        let copied = self.expense_repository.insert_expenses(&records).await.map_err(|e| {
            error!("Failed to copy {} expense(s) from {} to {}: {:#}", records.len(), period, target, e);
            ServiceError::Storage(e)
        })?;
        info!("Copied {} expense(s) from {} to {}", copied.len(), period, target);
        Ok(RolloverOutcome { target, copied })
    }

    /// Total of the selected expenses within the month.
    pub async fn selection_total(&self, user_name: &str, period: Period, selected_ids: Vec<String>) -> ServiceResult<SelectionTotal> {
        let expenses = self.list_period_expenses(user_name, period, None).await?;
        let selection: Selection = selected_ids.into_iter().collect();
        Ok(SelectionTotal {
            total: selection.selected_total(&expenses),
            selected_count: selection.selected_count(&expenses),
            unmatched_ids: selection.unmatched_ids(&expenses),
        })
    }
}
