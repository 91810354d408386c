use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

use crate::application::TrendService;
use crate::domain::{AllTrends, Metric, MetricsSnapshot, MetricsStats, NetworkMetrics, TimeWindow, TrendPoint};

/// Error type rendered as `{ success: false, error }`
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub trend_service: Arc<TrendService>,
    pub expected_chain_id: Option<u64>,
}

/// Query params for windowed endpoints
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub hours: Option<u32>,
}

fn window_from(query: Result<Query<WindowQuery>, QueryRejection>) -> Result<TimeWindow, AppError> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    match params.hours {
        Some(hours) => TimeWindow::hours(hours).map_err(|e| AppError::BadRequest(e.to_string())),
        None => Ok(TimeWindow::default()),
    }
}

/// Response for the single-metric trend endpoints
#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub success: bool,
    pub trend: Vec<Map<String, Value>>,
}

/// Response for /api/trends
#[derive(Debug, Serialize)]
pub struct AllTrendsResponse {
    pub success: bool,
    pub trends: AllTrends,
}

/// Response for /api/stats
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: Option<MetricsStats>,
}

/// Response for POST /api/snapshots
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<MetricsSnapshot>,
}

/// Response for /api/network
#[derive(Debug, Serialize)]
pub struct NetworkResponse {
    pub success: bool,
    pub data: NetworkMetrics,
    pub connected: bool,
}

/// Response for /api/health
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub history_size: usize,
    pub capacity: usize,
    pub latest_snapshot: Option<MetricsSnapshot>,
}

/// Render a point with the metric name as its value key, e.g. `{timestamp, time, gasPrice}`
fn keyed_point(metric: Metric, point: TrendPoint) -> Map<String, Value> {
    let mut entry = Map::new();
    entry.insert("timestamp".to_string(), Value::String(point.timestamp.to_rfc3339()));
    entry.insert("time".to_string(), Value::String(point.time));
    entry.insert(
        metric.key().to_string(),
        serde_json::to_value(point.value).unwrap_or(Value::Null),
    );
    entry
}

fn metric_trend(
    state: &AppState,
    metric: Metric,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<TrendResponse>, AppError> {
    let window = window_from(query)?;
    let trend = state
        .trend_service
        .trend(metric, window)
        .into_iter()
        .map(|point| keyed_point(metric, point))
        .collect();

    Ok(Json(TrendResponse {
        success: true,
        trend,
    }))
}

/// Handler for GET /api/health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "chainpulse",
        history_size: state.trend_service.size(),
        capacity: state.trend_service.capacity(),
        latest_snapshot: state.trend_service.latest(),
    })
}

/// Handler for GET /api/trends/gas-price
pub async fn gas_price_trend_handler(
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<TrendResponse>, AppError> {
    metric_trend(&state, Metric::GasPrice, query)
}

/// Handler for GET /api/trends/block-time
pub async fn block_time_trend_handler(
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<TrendResponse>, AppError> {
    metric_trend(&state, Metric::BlockTime, query)
}

/// Handler for GET /api/trends/transactions
pub async fn transaction_trend_handler(
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<TrendResponse>, AppError> {
    metric_trend(&state, Metric::Transactions, query)
}

/// Handler for GET /api/trends
#[debug_handler]
pub async fn all_trends_handler(
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<AllTrendsResponse>, AppError> {
    let window = window_from(query)?;
    Ok(Json(AllTrendsResponse {
        success: true,
        trends: state.trend_service.all_trends(window),
    }))
}

/// Handler for GET /api/stats
#[debug_handler]
pub async fn stats_handler(
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<StatsResponse>, AppError> {
    let window = window_from(query)?;
    Ok(Json(StatsResponse {
        success: true,
        stats: state.trend_service.stats(window),
    }))
}

/// Handler for POST /api/snapshots
#[debug_handler]
pub async fn record_snapshot_handler(
    State(state): State<AppState>,
) -> Result<Json<SnapshotResponse>, AppError> {
    match state.trend_service.record_snapshot().await {
        Ok(snapshot) => Ok(Json(SnapshotResponse {
            success: true,
            message: "Snapshot recorded".to_string(),
            snapshot: Some(snapshot),
        })),
        Err(e) => {
            error!("Error recording snapshot: {}", e);
            Err(AppError::Upstream("Failed to record snapshot".to_string()))
        }
    }
}

/// Handler for DELETE /api/snapshots
pub async fn clear_history_handler(State(state): State<AppState>) -> Json<SnapshotResponse> {
    state.trend_service.clear();
    Json(SnapshotResponse {
        success: true,
        message: "History cleared".to_string(),
        snapshot: None,
    })
}

/// Handler for GET /api/network
#[debug_handler]
pub async fn network_handler(State(state): State<AppState>) -> Json<NetworkResponse> {
    let (data, connected) = tokio::join!(
        state.trend_service.network_metrics(),
        state.trend_service.is_connected(state.expected_chain_id),
    );

    Json(NetworkResponse {
        success: true,
        data,
        connected,
    })
}
