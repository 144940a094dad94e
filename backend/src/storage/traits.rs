//! # Storage Traits
//!
//! Store abstraction used by the domain layer. Any backend that can filter,
//! insert, update and delete user and expense rows can sit behind these traits.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::expense::{Expense, ExpenseFilter, ExpensePatch, NewExpense};
use crate::domain::models::user::User;

#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Look up a user by exact, case-sensitive name
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>>;

    /// Return the user with this exact name, creating it if there is none.
    /// Lookup and insert are one atomic step, so a name never maps to two users.
    async fn find_or_create_user(&self, name: &str) -> Result<User>;
}

#[async_trait]
pub trait ExpenseStorage: Send + Sync {
    /// List a user's expenses matching `filter`, ordered by date ascending
    async fn list_expenses(&self, user_id: &str, filter: &ExpenseFilter) -> Result<Vec<Expense>>;

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>>;

    async fn insert_expense(&self, record: &NewExpense) -> Result<Expense>;

    /// Insert several records at once. Either all of them are stored or none.
    async fn insert_expenses(&self, records: &[NewExpense]) -> Result<Vec<Expense>>;

    /// Apply a partial update. Returns the stored record, or `None` if the id is unknown.
    async fn update_expense(&self, expense_id: &str, patch: &ExpensePatch) -> Result<Option<Expense>>;

    /// Returns true if the expense existed and was deleted
    async fn delete_expense(&self, expense_id: &str) -> Result<bool>;
}

/// Factory for the repositories of one storage backend.
pub trait Connection: Send + Sync + Clone {
    type UserRepository: UserStorage + Clone;
    type ExpenseRepository: ExpenseStorage + Clone;

    fn create_user_repository(&self) -> Self::UserRepository;

    fn create_expense_repository(&self) -> Self::ExpenseRepository;
}
