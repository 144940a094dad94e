//! # Domain Module
//!
//! Business rules of the budget tracker, independent of HTTP and of the
//! storage backend.
//!
//! ## Module Organization
//!
//! - **models**: Expense and user entities, partial updates and filters
//! - **period**: Calendar month arithmetic ("YYYY-MM")
//! - **payment_progress**: Paid/pending status and progress percentage
//! - **aggregation**: Monthly totals and remaining budget
//! - **selection**: Checklist selection and the total of selected rows
//! - **rollover**: Building next month's records from the current month
//! - **validation**: Input checks run before anything reaches the store
//! - **user_service** / **expense_service**: Store-backed operations
//! - **budget_session**: Per-view state with optimistic payment edits
//!
//! ## Business Rules
//!
//! - `amount` is always `quantity * unit_price` and is never stored
//! - An expense is paid once `paid_amount >= amount`
//! - Remaining budget never goes below zero
//! - A rolled-over expense starts the new month unpaid

pub mod aggregation;
pub mod budget_session;
pub mod commands;
pub mod error;
pub mod expense_service;
pub mod models;
pub mod payment_progress;
pub mod period;
pub mod rollover;
pub mod selection;
pub mod user_service;
pub mod validation;

pub use aggregation::{aggregate, BudgetTotals};
pub use budget_session::BudgetSession;
pub use commands::{CreateExpenseCommand, PeriodOverview, RolloverOutcome, SelectionTotal};
pub use error::{ServiceError, ServiceResult};
pub use expense_service::ExpenseService;
pub use period::{Period, PeriodError};
pub use selection::Selection;
pub use user_service::UserService;
pub use validation::ExpenseValidationError;
