//! CSV-backed record store: one file for users, one for expenses.

pub mod connection;
pub mod expense_repository;
pub mod user_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use expense_repository::ExpenseRepository;
pub use user_repository::UserRepository;
