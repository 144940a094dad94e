//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services. Requests are
//! deserialized into shared DTOs, handed to the services, and the results
//! are mapped back with derived fields filled in.

pub mod rest;

pub use rest::*;
