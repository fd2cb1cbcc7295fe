//! HTTP route handlers for the dashboard.
//!
//! Every handler goes through `Dashboard`, so the page, the JSON view and
//! the CSV export always agree on the cached snapshot.

use crate::error::{DashboardError, DataFetchError};
use crate::templates::{base_html, html_escape, render_dashboard, render_error_page};
use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

// ============================================================================
// Error Responses
// ============================================================================

pub fn error_status(error: &DashboardError) -> StatusCode {
    match error {
        DashboardError::DataFetch(DataFetchError::Unreachable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        DashboardError::DataFetch(DataFetchError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
        DashboardError::DataFetch(_) | DashboardError::InputShape(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DashboardError::ReportUnavailable => StatusCode::NOT_IMPLEMENTED,
        DashboardError::Narrative(_) | DashboardError::Config(_) | DashboardError::Export(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_page(state: &AppState, error: &DashboardError) -> Response {
    (
        error_status(error),
        Html(render_error_page(error, &state.dashboard.source_identity())),
    )
        .into_response()
}

// ============================================================================
// Dashboard Page
// ============================================================================

pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard.snapshot().await {
        Ok(snapshot) => {
            Html(render_dashboard(&snapshot, None, state.dashboard.narrator_name())).into_response()
        }
        Err(e) => error_page(&state, &e),
    }
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard.refresh().await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => error_page(&state, &e),
    }
}

pub async fn narrative(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard.narrative().await {
        Ok((snapshot, narrative)) => Html(render_dashboard(
            &snapshot,
            Some(&narrative),
            state.dashboard.narrator_name(),
        ))
        .into_response(),
        Err(e) => error_page(&state, &e),
    }
}

// ============================================================================
// API & Export
// ============================================================================

/// Serializes `value` as the JSON body. A serialization failure is logged
/// and returned as a 500 carrying the message.
pub fn json_response<T: Serialize>(value: &T) -> Response {
    match serde_json::to_string(value) {
        Ok(body) => ([("content-type", "application/json")], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to serialize JSON response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({ "error": format!("serialization failed: {}", e) })),
            )
                .into_response()
        }
    }
}

pub async fn graph_api(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard.snapshot().await {
        Ok(snapshot) => json_response(snapshot.as_ref()),
        Err(e) => (
            error_status(&e),
            axum::Json(json!({ "error": e.to_string(), "hints": e.hints() })),
        )
            .into_response(),
    }
}

pub async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = match state.dashboard.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return error_page(&state, &e),
    };
    match state.dashboard.export_csv().await {
        Ok(csv) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}.csv\"", snapshot.table_name),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(e) => error_page(&state, &e),
    }
}

pub async fn report(State(state): State<Arc<AppState>>) -> Response {
    let Err(e) = state.dashboard.generate_report() else {
        return Redirect::to("/").into_response();
    };
    warn!(error = %e, "report requested");
    let content = format!(
        r#"<h1>Report</h1>
        <div class="message warning">{}</div>
        <p><a href="/">Back to the dashboard</a></p>"#,
        html_escape(&e.to_string())
    );
    (
        error_status(&e),
        Html(base_html("Report", &content, &state.dashboard.source_identity())),
    )
        .into_response()
}
