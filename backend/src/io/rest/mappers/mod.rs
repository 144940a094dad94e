//! Conversions between domain entities and the shared API DTOs.

pub mod expense_mapper;
pub mod user_mapper;

pub use expense_mapper::ExpenseMapper;
pub use user_mapper::UserMapper;
