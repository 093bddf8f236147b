use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::cooldown::wait_secs;
use crate::report::FarmReport;
use crate::validate::validate;

/// Caller used when a request carries no identity headers.
pub const ANONYMOUS_CALLER: &str = "anonymous";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub source: &'static str,
    pub cooldown_seconds: u64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let cooldown_seconds = state.cooldowns.read().await.window().as_secs();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        source: state.source.name(),
        cooldown_seconds,
    })
}

#[derive(Debug, Deserialize)]
pub struct FarmReportParams {
    /// Evaluate readiness at this instant (epoch ms) instead of now
    pub now: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct FarmReportResponse {
    pub farm_id: String,
    pub now: i64,
    #[serde(flatten)]
    pub report: FarmReport,
}

/// Who a request counts against for cooldowns.
pub fn caller_id(headers: &HeaderMap) -> String {
    ["x-caller-id", "cf-connecting-ip"]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(ANONYMOUS_CALLER)
        .to_string()
}

pub async fn farm_report(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(farm_id): Path<String>,
    Query(params): Query<FarmReportParams>,
) -> Result<Json<FarmReportResponse>, ApiError> {
    let caller = caller_id(&headers);
    let received_at = Utc::now();

    {
        let mut cooldowns = state.cooldowns.write().await;
        cooldowns.prune(received_at);
        if let Err(remaining) = cooldowns.check(&caller, received_at) {
            return Err(ApiError::TooManyRequests {
                retry_after: wait_secs(remaining),
            });
        }
    }

    info!("Report for farm {} requested by {}", farm_id, caller);

    let raw = state.source.fetch_farm(&farm_id).await?;
    let doc = validate(&raw)?;

    let now = params.now.unwrap_or_else(|| received_at.timestamp_millis());
    let report = FarmReport::build(&doc, now);

    Ok(Json(FarmReportResponse {
        farm_id,
        now,
        report,
    }))
}
