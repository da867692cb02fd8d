use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;

use crate::api::models::ErrorResponse;
use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::services::leaderboard::LeaderboardService;

pub mod catalog;
pub mod leaderboard;
pub mod sync;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub leaderboards: Arc<LeaderboardService>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let leaderboards = Arc::new(LeaderboardService::new(pool.clone(), &config.cache));
        Self {
            pool,
            config,
            leaderboards,
        }
    }
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

/// Log the cause and answer with a generic 500
pub(crate) fn internal_error(message: &str, error: anyhow::Error) -> Response {
    log::error!("{}: {:#}", message, error);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}
