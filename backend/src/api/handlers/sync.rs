use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::{SecondsFormat, Utc};
use log::info;
use std::sync::Arc;

use super::{error_response, internal_error, AppState};
use crate::api::models::{SyncCheckResponse, SyncTriggerResponse};
use crate::cache::CacheTag;
use crate::database::{self, tournaments};
use crate::services::sync::configured_sources;

/// Bearer token must match the configured cron secret
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(secret) = state.config.sync.cron_secret.as_deref() else {
        return Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, "CRON_SECRET not configured"));
    };

    let expected = format!("Bearer {}", secret);
    let provided = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());
    if provided != Some(expected.as_str()) {
        return Err(error_response(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }
    Ok(())
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Manual trigger: reports which providers could be synced
pub async fn trigger_sync(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    let configured_sources = configured_sources(&state.config.sync);
    info!("Tournament sync triggered, configured sources: {:?}", configured_sources);

    state.leaderboards.invalidate(CacheTag::Tournaments);
    state.leaderboards.invalidate(CacheTag::Leaderboard);

    Json(SyncTriggerResponse {
        message: "Tournament sync endpoint ready",
        timestamp: timestamp(),
        status: "pending_api_integration",
        note: "Configure APT_API_KEY or PPA_API_TOKEN to enable data sync",
        sync_enabled: !configured_sources.is_empty(),
        configured_sources,
    })
    .into_response()
}

/// Scheduled check: reports the live tournament count
pub async fn check_sync(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    const FAILURE: &str = "Cron sync failed";
    let count = database::get_connection(&state.pool).and_then(|mut conn| tournaments::count_live(&mut conn));

    match count {
        Ok(current_tournaments) => Json(SyncCheckResponse {
            message: "Cron sync check complete",
            timestamp: timestamp(),
            current_tournaments,
            next_sync_ready: !configured_sources(&state.config.sync).is_empty(),
        })
        .into_response(),
        Err(e) => internal_error(FAILURE, e),
    }
}
