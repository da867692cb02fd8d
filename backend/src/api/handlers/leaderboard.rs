use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{internal_error, AppState};
use crate::api::models::{EquipmentBoardResponse, PlayerBoardResponse};
use crate::domain::models::EquipmentType;
use crate::services::leaderboard::clamp_limit;

#[derive(Deserialize)]
pub struct LeaderboardParams {
    #[serde(rename = "type")]
    pub board: Option<String>,
    pub limit: Option<String>,
}

const FAILURE: &str = "Failed to fetch leaderboard";

/// One board for `type=paddle|shoe|player`, otherwise all three
pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
) -> Response {
    let limit = clamp_limit(params.limit.as_deref().and_then(|raw| raw.trim().parse().ok()));
    let board = params.board.as_deref().map(str::to_ascii_uppercase);

    match board.as_deref() {
        Some("PLAYER") => match state.leaderboards.player_leaderboard(limit) {
            Ok(players) => Json(PlayerBoardResponse { players }).into_response(),
            Err(e) => internal_error(FAILURE, e),
        },
        Some(kind @ ("PADDLE" | "SHOE")) => {
            let equipment_type = if kind == "PADDLE" {
                EquipmentType::Paddle
            } else {
                EquipmentType::Shoe
            };
            match state.leaderboards.equipment_leaderboard(equipment_type, limit) {
                Ok(equipment) => Json(EquipmentBoardResponse { equipment }).into_response(),
                Err(e) => internal_error(FAILURE, e),
            }
        }
        _ => match state.leaderboards.all_leaderboards(limit).await {
            Ok(boards) => Json(boards).into_response(),
            Err(e) => internal_error(FAILURE, e),
        },
    }
}
