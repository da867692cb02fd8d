use serde::Serialize;

use crate::database::models::{Equipment, Player, Tournament};
use crate::domain::{
    EquipmentDetail, EquipmentStats, PlayerProfile, PlayerStats, TournamentDetail, TournamentSummary,
};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct EquipmentBoardResponse {
    pub equipment: Vec<EquipmentStats>,
}

#[derive(Serialize)]
pub struct PlayerBoardResponse {
    pub players: Vec<PlayerStats>,
}

#[derive(Serialize)]
pub struct PlayerListResponse {
    pub players: Vec<Player>,
}

#[derive(Serialize)]
pub struct PlayerResponse {
    pub player: PlayerProfile,
}

#[derive(Serialize)]
pub struct EquipmentListResponse {
    pub equipment: Vec<Equipment>,
}

#[derive(Serialize)]
pub struct EquipmentResponse {
    pub equipment: EquipmentDetail,
}

#[derive(Serialize)]
pub struct TournamentListResponse {
    pub tournaments: Vec<TournamentSummary>,
}

#[derive(Serialize)]
pub struct AllTournamentsResponse {
    pub tournaments: Vec<Tournament>,
}

#[derive(Serialize)]
pub struct TournamentResponse {
    pub tournament: TournamentDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncTriggerResponse {
    pub message: &'static str,
    pub timestamp: String,
    pub status: &'static str,
    pub note: &'static str,
    pub configured_sources: Vec<&'static str>,
    pub sync_enabled: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncCheckResponse {
    pub message: &'static str,
    pub timestamp: String,
    pub current_tournaments: i64,
    pub next_sync_ready: bool,
}
