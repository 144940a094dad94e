//! # Storage Module
//!
//! Persistence for users and expenses. The domain layer only sees the traits
//! in [`traits`]; the CSV store is the bundled implementation.

pub mod csv;
pub mod traits;

pub use self::csv::CsvConnection;
pub use traits::{Connection, ExpenseStorage, UserStorage};
