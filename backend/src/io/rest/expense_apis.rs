//! # REST API for Expenses
//!
//! Endpoints for listing, creating, editing, deleting and rolling over
//! expenses. Every expense in a response carries its derived `amount`,
//! `is_paid` and `progress`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use crate::domain::commands::CreateExpenseCommand;
use crate::domain::validation::validate_period;
use crate::io::rest::errors::error_response;
use crate::io::rest::mappers::ExpenseMapper;
use crate::AppState;
use shared::{
    AdjustQuantityRequest, CreateExpenseRequest, DeleteExpenseResponse, ExpenseListResponse,
    ExpenseType, RolloverRequest, RolloverResponse, UpdateExpenseRequest,
};

/// Query parameters for expense listing
#[derive(Debug, Deserialize)]
pub struct ExpenseListQuery {
    pub user: String,
    pub year: i32,
    pub month: u32,
    #[serde(rename = "type")]
    pub expense_type: Option<ExpenseType>,
}

/// List one user's expenses for a month, optionally restricted to one type
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseListQuery>,
) -> impl IntoResponse {
    info!("GET /api/expenses - query: {:?}", query);

    let period = match validate_period(query.year, query.month) {
        Ok(period) => period,
        Err(e) => return error_response("list expenses", e.into()),
    };
    let expense_type = query.expense_type.map(ExpenseMapper::to_domain_type);

    match state
        .expense_service
        .list_period_expenses(&query.user, period, expense_type)
        .await
    {
        Ok(expenses) => (
            StatusCode::OK,
            Json(ExpenseListResponse {
                expenses: ExpenseMapper::to_dtos(expenses),
            }),
        )
            .into_response(),
        Err(e) => error_response("list expenses", e),
    }
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    info!("POST /api/expenses - request: {:?}", request);

    let command = CreateExpenseCommand {
        user_name: request.user_name,
        category: request.category,
        quantity: request.quantity,
        unit_price: request.unit_price,
        expense_type: ExpenseMapper::to_domain_type(request.expense_type),
        date: request.date,
    };

    match state.expense_service.create_expense(command).await {
        Ok(expense) => (StatusCode::CREATED, Json(ExpenseMapper::to_dto(expense))).into_response(),
        Err(e) => error_response("create expense", e),
    }
}

/// Partial edit of category, quantity, unit price or paid amount
pub async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
    Json(request): Json<UpdateExpenseRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/expenses/{} - request: {:?}", expense_id, request);

    let patch = ExpenseMapper::to_patch(request);
    match state.expense_service.update_expense(&expense_id, patch).await {
        Ok(expense) => (StatusCode::OK, Json(ExpenseMapper::to_dto(expense))).into_response(),
        Err(e) => error_response("update expense", e),
    }
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/expenses/{}", expense_id);

    match state.expense_service.delete_expense(&expense_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(DeleteExpenseResponse {
                success_message: "Expense deleted".to_string(),
                deleted_id: expense_id,
            }),
        )
            .into_response(),
        Err(e) => error_response("delete expense", e),
    }
}

/// Step the quantity up or down; it never goes below 1
pub async fn adjust_quantity(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
    Json(request): Json<AdjustQuantityRequest>,
) -> impl IntoResponse {
    info!("POST /api/expenses/{}/quantity - request: {:?}", expense_id, request);

    match state.expense_service.adjust_quantity(&expense_id, request.delta).await {
        Ok(expense) => (StatusCode::OK, Json(ExpenseMapper::to_dto(expense))).into_response(),
        Err(e) => error_response("adjust quantity", e),
    }
}

/// Mark fully paid, or back to unpaid if it already was
pub async fn toggle_paid(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/expenses/{}/toggle-paid", expense_id);

    match state.expense_service.toggle_payment_status(&expense_id).await {
        Ok(expense) => (StatusCode::OK, Json(ExpenseMapper::to_dto(expense))).into_response(),
        Err(e) => error_response("toggle payment status", e),
    }
}

/// Copy a month's expenses into the following month as unpaid records
pub async fn rollover(
    State(state): State<AppState>,
    Json(request): Json<RolloverRequest>,
) -> impl IntoResponse {
    info!("POST /api/expenses/rollover - request: {:?}", request);

    let period = match validate_period(request.year, request.month) {
        Ok(period) => period,
        Err(e) => return error_response("roll over expenses", e.into()),
    };
    let expense_type = request.expense_type.map(ExpenseMapper::to_domain_type);

    match state
        .expense_service
        .copy_to_next_month(&request.user_name, period, expense_type)
        .await
    {
        Ok(outcome) => {
            let copied_count = outcome.copied_count();
            let target_month_year = outcome.target.month_year();
            let success_message = if copied_count == 0 {
                format!("No expenses to copy from {}", period)
            } else {
                format!("Copied {} expense(s) to {}", copied_count, target_month_year)
            };
            (
                StatusCode::OK,
                Json(RolloverResponse {
                    copied_count,
                    target_month_year,
                    success_message,
                }),
            )
                .into_response()
        }
        Err(e) => error_response("roll over expenses", e),
    }
}
