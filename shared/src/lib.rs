use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense record as exposed over the API.
///
/// `amount`, `is_paid` and `progress` are derived on read from `quantity`,
/// `unit_price` and `paid_amount`; clients must never send them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    /// ID of the user owning this expense
    pub user_id: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    /// quantity * unit_price
    pub amount: f64,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    /// First day of the expense's month (YYYY-MM-DD)
    pub date: String,
    /// "YYYY-MM", only set on records produced by a month rollover
    pub month_year: Option<String>,
    pub paid_amount: f64,
    /// paid_amount >= amount
    pub is_paid: bool,
    /// Paid percentage clamped to 0..=100
    pub progress: f64,
}

/// Fixed (recurring) or variable expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseType {
    #[serde(rename = "fijo")]
    Fixed,
    #[serde(rename = "variable")]
    Variable,
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpenseType::Fixed => write!(f, "fijo"),
            ExpenseType::Variable => write!(f, "variable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    /// User name; the user is created on first use
    pub user_name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    /// "YYYY-MM" or "YYYY-MM-DD"; normalized to the first day of the month
    pub date: Option<String>,
}

/// Partial update of an expense. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    pub category: Option<String>,
    pub quantity: Option<u32>,
    pub unit_price: Option<f64>,
    pub paid_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustQuantityRequest {
    /// Signed step; the resulting quantity never drops below 1
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteExpenseResponse {
    pub deleted_id: String,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloverRequest {
    pub user_name: String,
    pub year: i32,
    pub month: u32,
    /// Restrict the copy to one expense type; copies everything when absent
    #[serde(rename = "type", default)]
    pub expense_type: Option<ExpenseType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloverResponse {
    pub copied_count: usize,
    /// Target period, "YYYY-MM"
    pub target_month_year: String,
    pub success_message: String,
}

/// Aggregated totals for one user and month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTotals {
    pub total_fixed: f64,
    pub total_variable: f64,
    pub total_expenses: f64,
    pub total_paid: f64,
    /// max(budget - total_expenses, 0)
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummaryResponse {
    pub user_name: String,
    /// "YYYY-MM"
    pub month_year: String,
    pub budget: f64,
    pub fixed_expenses: Vec<Expense>,
    pub variable_expenses: Vec<Expense>,
    pub totals: BudgetTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionTotalRequest {
    pub user_name: String,
    pub year: i32,
    pub month: u32,
    pub selected_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionTotalResponse {
    pub selected_total: f64,
    /// Number of selected ids that matched an expense of the period
    pub selected_count: usize,
    /// Selected ids that do not belong to the period; they contribute nothing
    pub unmatched_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
