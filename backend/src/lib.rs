//! # Budget Tracker Backend
//!
//! Household budget tracking: monthly fixed and variable expenses per user,
//! payment progress, checklist totals and month-to-month rollover.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (business rules, services, session state)
//!     ↓
//! Storage Layer (CSV files behind storage traits)
//! ```
//!
//! `initialize_backend` wires the layers together and `create_router` exposes
//! them over HTTP.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{ExpenseService, UserService};
use crate::storage::CsvConnection;

/// Services shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService<CsvConnection>,
    pub expense_service: ExpenseService<CsvConnection>,
}

impl AppState {
    pub fn new(connection: CsvConnection) -> Self {
        let connection = Arc::new(connection);
        let user_service = UserService::new(connection.clone());
        let expense_service = ExpenseService::new(connection, user_service.clone());
        Self {
            user_service,
            expense_service,
        }
    }
}

/// Open the data directory and build the application state
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage in {}", config.data_dir.display());
    let connection = CsvConnection::new(&config.data_dir)?;

    info!("Setting up application state");
    Ok(AppState::new(connection))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, allowed_origin: &str) -> Result<Router> {
    let origin = allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid allowed origin '{}'", allowed_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/users", post(io::create_user))
        .route("/users/:name", get(io::get_user))
        .route("/expenses", get(io::list_expenses).post(io::create_expense))
        .route("/expenses/rollover", post(io::rollover))
        .route(
            "/expenses/:id",
            patch(io::update_expense).delete(io::delete_expense),
        )
        .route("/expenses/:id/quantity", post(io::adjust_quantity))
        .route("/expenses/:id/toggle-paid", post(io::toggle_paid))
        .route("/summary", get(io::get_summary))
        .route("/selection/total", post(io::selection_total));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{read_json, setup_test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use shared::{BudgetSummaryResponse, Expense, RolloverResponse};
    use tower::ServiceExt;

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_month_flow_through_router() {
        let (_env, state) = setup_test_state();
        let app = create_router(state, "http://localhost:8080").unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/expenses",
                r#"{"user_name":"ana","category":"Rent","quantity":1,"unit_price":300.0,"type":"fijo","date":"2025-12"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let rent: Expense = read_json(response).await;

        let response = app
            .clone()
            .oneshot(empty_request("POST", &format!("/api/expenses/{}/toggle-paid", rent.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/expenses/rollover",
                r#"{"user_name":"ana","year":2025,"month":12}"#,
            ))
            .await
            .unwrap();
        let rollover: RolloverResponse = read_json(response).await;
        assert_eq!(rollover.copied_count, 1);

        let response = app
            .oneshot(empty_request("GET", "/api/summary?user=ana&year=2026&month=1&budget=1000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let summary: BudgetSummaryResponse = read_json(response).await;
        assert_eq!(summary.fixed_expenses.len(), 1);
        assert_eq!(summary.totals.total_paid, 0.0);
        assert_eq!(summary.totals.remaining, 700.0);
    }

    #[tokio::test]
    async fn test_list_filters_by_type_query() {
        let (_env, state) = setup_test_state();
        let app = create_router(state, "http://localhost:8080").unwrap();

        for body in [
            r#"{"user_name":"ana","category":"Rent","quantity":1,"unit_price":300.0,"type":"fijo","date":"2025-12-01"}"#,
            r#"{"user_name":"ana","category":"Food","quantity":3,"unit_price":20.0,"type":"variable","date":"2025-12-01"}"#,
        ] {
            let response = app.clone().oneshot(json_request("POST", "/api/expenses", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .oneshot(empty_request("GET", "/api/expenses?user=ana&year=2025&month=12&type=variable"))
            .await
            .unwrap();
        let body: shared::ExpenseListResponse = read_json(response).await;
        assert_eq!(body.expenses.len(), 1);
        assert_eq!(body.expenses[0].amount, 60.0);
    }

    #[tokio::test]
    async fn test_unknown_route_and_bad_origin() {
        let (_env, state) = setup_test_state();
        assert!(create_router(state.clone(), "bad\norigin").is_err());

        let app = create_router(state, "http://localhost:8080").unwrap();
        let response = app
            .oneshot(empty_request("DELETE", "/api/expenses/missing"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
