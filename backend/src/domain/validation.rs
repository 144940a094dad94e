//! Input validation for expense forms and edits.
//!
//! Everything here runs before the store is contacted; a rejected input
//! never mutates any state.

use chrono::NaiveDate;

use crate::domain::models::expense::ExpensePatch;
use crate::domain::period::Period;

pub const MAX_CATEGORY_LENGTH: usize = 256;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpenseValidationError {
    #[error("A user name is required")]
    EmptyUserName,
    #[error("A category is required")]
    EmptyCategory,
    #[error("Category is too long ({0} characters, maximum is 256)")]
    CategoryTooLong(usize),
    #[error("Quantity must be at least 1")]
    QuantityNotPositive,
    #[error("Unit price must be a number of 0 or more")]
    InvalidUnitPrice,
    #[error("Paid amount must be a number of 0 or more")]
    InvalidPaidAmount,
    #[error("Budget must be a number")]
    InvalidBudget,
    #[error("An expense date is required")]
    MissingDate,
    #[error("{0}")]
    InvalidPeriod(String),
    #[error("Nothing to update")]
    EmptyUpdate,
}

/// Names are identity keys and are matched exactly, so they are returned
/// unchanged. Only blank names are rejected.
pub fn validate_user_name(name: &str) -> Result<&str, ExpenseValidationError> {
    if name.trim().is_empty() {
        return Err(ExpenseValidationError::EmptyUserName);
    }
    Ok(name)
}

pub fn validate_category(category: &str) -> Result<String, ExpenseValidationError> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(ExpenseValidationError::EmptyCategory);
    }
    let length = trimmed.chars().count();
    if length > MAX_CATEGORY_LENGTH {
        return Err(ExpenseValidationError::CategoryTooLong(length));
    }
    Ok(trimmed.to_string())
}

pub fn validate_quantity(quantity: u32) -> Result<u32, ExpenseValidationError> {
    if quantity < 1 {
        return Err(ExpenseValidationError::QuantityNotPositive);
    }
    Ok(quantity)
}

pub fn validate_unit_price(unit_price: f64) -> Result<f64, ExpenseValidationError> {
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(ExpenseValidationError::InvalidUnitPrice);
    }
    Ok(unit_price)
}

pub fn validate_paid_amount(paid_amount: f64) -> Result<f64, ExpenseValidationError> {
    if !paid_amount.is_finite() || paid_amount < 0.0 {
        return Err(ExpenseValidationError::InvalidPaidAmount);
    }
    Ok(paid_amount)
}

pub fn validate_budget(budget: f64) -> Result<f64, ExpenseValidationError> {
    if !budget.is_finite() {
        return Err(ExpenseValidationError::InvalidBudget);
    }
    Ok(budget)
}

pub fn validate_period(year: i32, month: u32) -> Result<Period, ExpenseValidationError> {
    Period::new(year, month).map_err(|e| ExpenseValidationError::InvalidPeriod(e.to_string()))
}

/// Parse a form date ("YYYY-MM" or "YYYY-MM-DD") into the first day of its month.
pub fn normalize_expense_date(date: Option<&str>) -> Result<NaiveDate, ExpenseValidationError> {
    let raw = date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or(ExpenseValidationError::MissingDate)?;
    let period: Period = raw
        .parse()
        .map_err(|e: crate::domain::period::PeriodError| ExpenseValidationError::InvalidPeriod(e.to_string()))?;
    Ok(period.first_day())
}

/// Check every present field of a patch and trim the category.
pub fn validate_patch(patch: &ExpensePatch) -> Result<ExpensePatch, ExpenseValidationError> {
    if patch.is_empty() {
        return Err(ExpenseValidationError::EmptyUpdate);
    }
    Ok(ExpensePatch {
        category: patch.category.as_deref().map(validate_category).transpose()?,
        quantity: patch.quantity.map(validate_quantity).transpose()?,
        unit_price: patch.unit_price.map(validate_unit_price).transpose()?,
        paid_amount: patch.paid_amount.map(validate_paid_amount).transpose()?,
    })
}
