use axum::{routing::get, Router};
use std::sync::Arc;

use crate::api::handlers::{
    catalog::{get_equipment, get_players, get_tournaments},
    leaderboard::get_leaderboard,
    sync::{check_sync, trigger_sync},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/players", get(get_players))
        .route("/api/equipment", get(get_equipment))
        .route("/api/tournaments", get(get_tournaments))
        .route("/api/sync/tournaments", get(check_sync).post(trigger_sync))
        .with_state(state)
}
