//! # REST API for Monthly Summaries
//!
//! Read-only views over one user's month: the budget overview with totals,
//! and the total of a checklist selection.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use crate::domain::validation::validate_period;
use crate::io::rest::errors::error_response;
use crate::io::rest::mappers::ExpenseMapper;
use crate::AppState;
use shared::{BudgetSummaryResponse, SelectionTotalRequest, SelectionTotalResponse};

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub user: String,
    pub year: i32,
    pub month: u32,
    /// Monthly budget; 0 when omitted
    #[serde(default)]
    pub budget: f64,
}

pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    info!("GET /api/summary - query: {:?}", query);

    let period = match validate_period(query.year, query.month) {
        Ok(period) => period,
        Err(e) => return error_response("build summary", e.into()),
    };

    match state
        .expense_service
        .period_overview(&query.user, period, query.budget)
        .await
    {
        Ok(overview) => (
            StatusCode::OK,
            Json(BudgetSummaryResponse {
                user_name: query.user,
                month_year: overview.period.month_year(),
                budget: overview.budget,
                fixed_expenses: ExpenseMapper::to_dtos(overview.fixed_expenses),
                variable_expenses: ExpenseMapper::to_dtos(overview.variable_expenses),
                totals: ExpenseMapper::totals_to_dto(overview.totals),
            }),
        )
            .into_response(),
        Err(e) => error_response("build summary", e),
    }
}

/// Sum of the selected expenses of a month. Ids from other months or users
/// are reported back and contribute nothing.
pub async fn selection_total(
    State(state): State<AppState>,
    Json(request): Json<SelectionTotalRequest>,
) -> impl IntoResponse {
    info!("POST /api/selection/total - request: {:?}", request);

    let period = match validate_period(request.year, request.month) {
        Ok(period) => period,
        Err(e) => return error_response("total selection", e.into()),
    };

    match state
        .expense_service
        .selection_total(&request.user_name, period, request.selected_ids)
        .await
    {
        Ok(total) => (
            StatusCode::OK,
            Json(SelectionTotalResponse {
                selected_total: total.total,
                selected_count: total.selected_count,
                unmatched_ids: total.unmatched_ids,
            }),
        )
            .into_response(),
        Err(e) => error_response("total selection", e),
    }
}
