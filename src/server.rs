use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::cache::AdviceCache;
use crate::config::Config;
use crate::ingest::parse_snapshot;
use crate::lineup::optimizer::optimize_lineup;
use crate::lineup::LineupResult;
use crate::report::{build_report, sales_advice, SaleAdvice, SquadReport};
use crate::transfers::recommender::recommend_transfers;
use crate::transfers::TransferRecommendation;
use crate::types::{LeagueSnapshot, Metric, SaleGoal};

#[derive(Clone)]
struct ApiState {
    config: Config,
    cache: Arc<Mutex<AdviceCache>>,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

/// Every advice route takes the raw league payload inline; the server holds
/// no fetcher and never talks to the provider itself.
#[derive(Debug, Clone, Deserialize)]
struct AdviceRequest {
    snapshot: Value,
    league: Option<String>,
    metric: Option<String>,
    goal: Option<String>,
    top: Option<usize>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct LineupResponse {
    league_id: String,
    lineup: LineupResult,
}

#[derive(Debug, Serialize)]
struct SalesResponse {
    league_id: String,
    sales: Vec<SaleAdvice>,
}

#[derive(Debug, Serialize)]
struct TransfersResponse {
    league_id: String,
    transfers: Vec<TransferRecommendation>,
}

#[derive(Debug, Serialize)]
struct ReportResponse {
    cached: bool,
    report: SquadReport,
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let state = ApiState {
        config,
        cache: Arc::new(Mutex::new(AdviceCache::new())),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/config", get(show_config))
        .route("/v1/lineup", post(lineup))
        .route("/v1/sales", post(sales))
        .route("/v1/transfers", post(transfers))
        .route("/v1/report", post(report))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse { status: "ok" })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn lineup(
    State(state): State<ApiState>,
    Json(request): Json<AdviceRequest>,
) -> ApiResult<LineupResponse> {
    let (snapshot, metric, _) = resolve_request(&state, &request)?;
    Ok(ok(LineupResponse {
        lineup: optimize_lineup(&snapshot.roster, metric),
        league_id: snapshot.league_id,
    }))
}

async fn sales(
    State(state): State<ApiState>,
    Json(request): Json<AdviceRequest>,
) -> ApiResult<SalesResponse> {
    let (snapshot, metric, goal) = resolve_request(&state, &request)?;
    let mut sales = sales_advice(&snapshot, metric, goal, &state.config);
    if let Some(top) = request.top {
        sales.truncate(top.max(1));
    }
    Ok(ok(SalesResponse {
        sales,
        league_id: snapshot.league_id,
    }))
}

async fn transfers(
    State(state): State<ApiState>,
    Json(request): Json<AdviceRequest>,
) -> ApiResult<TransfersResponse> {
    let (snapshot, _, _) = resolve_request(&state, &request)?;
    let mut transfers = recommend_transfers(
        &snapshot.market,
        &snapshot.roster,
        snapshot.budget,
        &state.config.transfers,
    );
    if let Some(top) = request.top {
        transfers.truncate(top.max(1));
    }
    Ok(ok(TransfersResponse {
        transfers,
        league_id: snapshot.league_id,
    }))
}

async fn report(
    State(state): State<ApiState>,
    Json(request): Json<AdviceRequest>,
) -> ApiResult<ReportResponse> {
    let (snapshot, metric, goal) = resolve_request(&state, &request)?;
    let fingerprint = snapshot.fingerprint();

    {
        let cache = state
            .cache
            .lock()
            .map_err(|_| ApiError::internal("advice cache lock poisoned"))?;
        if let Some(cached) = cache.lookup(&snapshot.league_id, &fingerprint) {
            return Ok(ok(ReportResponse {
                cached: true,
                report: cached.clone(),
            }));
        }
    }

    let report = build_report(&snapshot, metric, goal, &state.config);
    state
        .cache
        .lock()
        .map_err(|_| ApiError::internal("advice cache lock poisoned"))?
        .store(&snapshot.league_id, &fingerprint, report.clone());

    Ok(ok(ReportResponse {
        cached: false,
        report,
    }))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

fn resolve_request(
    state: &ApiState,
    request: &AdviceRequest,
) -> std::result::Result<(LeagueSnapshot, Metric, SaleGoal), ApiError> {
    let (mut snapshot, ingest) =
        parse_snapshot(&request.snapshot).map_err(|e| ApiError::bad_request(e.to_string()))?;
    if ingest.dropped_total() > 0 {
        warn!(
            dropped_players = ingest.dropped_players,
            dropped_listings = ingest.dropped_listings,
            "snapshot entities dropped during ingest"
        );
    }
    if let Some(league) = &request.league {
        snapshot.league_id = league.clone();
    } else if snapshot.league_id == "default" && !state.config.league.id.is_empty() {
        snapshot.league_id = state.config.league.id.clone();
    }

    let metric = request
        .metric
        .as_deref()
        .unwrap_or(&state.config.engine.metric);
    let metric = Metric::from_str(metric).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let goal = request.goal.as_deref().unwrap_or(&state.config.engine.goal);
    let goal = SaleGoal::from_str(goal).map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok((snapshot, metric, goal))
}
