//! # REST API Interface Layer
//!
//! HTTP endpoints for the budget tracker. This layer handles:
//! - JSON request/response serialization
//! - Translation of domain errors into status codes
//! - Request logging
//!
//! Handlers contain no business rules; they map DTOs to domain calls and back.

pub mod errors;
pub mod expense_apis;
pub mod mappers;
pub mod summary_apis;
pub mod user_apis;

pub use expense_apis::*;
pub use summary_apis::*;
pub use user_apis::*;
