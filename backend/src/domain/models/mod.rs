pub mod expense;
pub mod user;
