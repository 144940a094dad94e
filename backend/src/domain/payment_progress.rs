//! Payment progress for a single expense.
//!
//! Both the paid/pending indicator and the progress bar read from the
//! functions here, so they can never disagree.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn from_amounts(amount: f64, paid_amount: f64) -> Self {
        if is_paid(amount, paid_amount) {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        }
    }
}

/// Stored numbers can be garbage; treat anything non-finite as 0.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Percentage of `amount` covered by `paid_amount`, clamped to 0..=100.
/// A zero amount reports 0.
pub fn progress(amount: f64, paid_amount: f64) -> f64 {
    let amount = finite_or_zero(amount);
    let paid_amount = finite_or_zero(paid_amount);
    if amount == 0.0 {
        return 0.0;
    }
    (paid_amount / amount * 100.0).clamp(0.0, 100.0)
}

pub fn is_paid(amount: f64, paid_amount: f64) -> bool {
    finite_or_zero(paid_amount) >= finite_or_zero(amount)
}

/// Paid amount after flipping the status: a paid expense goes back to 0,
/// a pending one is settled in full.
pub fn toggled_paid_amount(amount: f64, paid_amount: f64) -> f64 {
    match PaymentStatus::from_amounts(amount, paid_amount) {
        PaymentStatus::Paid => 0.0,
        PaymentStatus::Pending => finite_or_zero(amount),
    }
}
