use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{error_response, internal_error, AppState};
use crate::api::models::{
    AllTournamentsResponse, EquipmentListResponse, EquipmentResponse, PlayerListResponse,
    PlayerResponse, TournamentListResponse, TournamentResponse,
};
use crate::database::{self, equipment, players, tournaments, DbConn};
use crate::domain::models::EquipmentType;
use crate::services::leaderboard::clamp_limit;

#[derive(Deserialize)]
pub struct SlugParams {
    pub slug: Option<String>,
}

#[derive(Deserialize)]
pub struct EquipmentParams {
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
}

#[derive(Deserialize)]
pub struct TournamentParams {
    pub slug: Option<String>,
    pub limit: Option<String>,
}

fn connection(state: &AppState, failure: &str) -> Result<DbConn, Response> {
    database::get_connection(&state.pool).map_err(|e| internal_error(failure, e))
}

pub async fn get_players(State(state): State<Arc<AppState>>, Query(params): Query<SlugParams>) -> Response {
    const FAILURE: &str = "Failed to fetch players";
    let mut conn = match connection(&state, FAILURE) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    match params.slug {
        Some(slug) => match players::load_profile(&mut conn, &slug) {
            Ok(Some(player)) => Json(PlayerResponse { player }).into_response(),
            Ok(None) => error_response(StatusCode::NOT_FOUND, "Player not found"),
            Err(e) => internal_error(FAILURE, e),
        },
        None => match players::list_all(&mut conn) {
            Ok(players) => Json(PlayerListResponse { players }).into_response(),
            Err(e) => internal_error(FAILURE, e),
        },
    }
}

pub async fn get_equipment(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EquipmentParams>,
) -> Response {
    const FAILURE: &str = "Failed to fetch equipment";
    let mut conn = match connection(&state, FAILURE) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    if let Some(slug) = params.slug {
        return match equipment::load_detail(&mut conn, &slug) {
            Ok(Some(equipment)) => Json(EquipmentResponse { equipment }).into_response(),
            Ok(None) => error_response(StatusCode::NOT_FOUND, "Equipment not found"),
            Err(e) => internal_error(FAILURE, e),
        };
    }

    // An unrecognised type lists everything
    let equipment_type = params
        .equipment_type
        .as_deref()
        .and_then(|raw| raw.parse::<EquipmentType>().ok());

    match equipment::list_all(&mut conn, equipment_type) {
        Ok(equipment) => Json(EquipmentListResponse { equipment }).into_response(),
        Err(e) => internal_error(FAILURE, e),
    }
}

/// `slug` for one tournament, `limit` for the most recent ones, or all of them
pub async fn get_tournaments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TournamentParams>,
) -> Response {
    const FAILURE: &str = "Failed to fetch tournaments";
    let mut conn = match connection(&state, FAILURE) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    if let Some(slug) = params.slug {
        return match tournaments::load_detail(&mut conn, &slug) {
            Ok(Some(tournament)) => Json(TournamentResponse { tournament }).into_response(),
            Ok(None) => error_response(StatusCode::NOT_FOUND, "Tournament not found"),
            Err(e) => internal_error(FAILURE, e),
        };
    }

    match params.limit {
        Some(raw) => {
            let limit = clamp_limit(raw.trim().parse().ok());
            match tournaments::list_recent(&mut conn, limit) {
                Ok(tournaments) => Json(TournamentListResponse { tournaments }).into_response(),
                Err(e) => internal_error(FAILURE, e),
            }
        }
        None => match tournaments::list_all(&mut conn) {
            Ok(tournaments) => Json(AllTournamentsResponse { tournaments }).into_response(),
            Err(e) => internal_error(FAILURE, e),
        },
    }
}
