use serde::Serialize;

use crate::database::models::{
    AffiliateLink, Equipment, EquipmentUsage, MatchResult, Player, Tournament,
};

/// A usage row together with every live match result of its player
#[derive(Debug, Clone)]
pub struct UsageWithResults {
    pub usage: EquipmentUsage,
    pub results: Vec<MatchResult>,
}

/// Live equipment with its usages, as read for the equipment leaderboard
#[derive(Debug, Clone)]
pub struct EquipmentGraph {
    pub equipment: Equipment,
    pub usages: Vec<UsageWithResults>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageWithEquipment {
    #[serde(flatten)]
    pub usage: EquipmentUsage,
    pub equipment: Equipment,
}

/// Live player with results and usages, as read for the player leaderboard.
/// Usages keep their retrieval order.
#[derive(Debug, Clone)]
pub struct PlayerGraph {
    pub player: Player,
    pub results: Vec<MatchResult>,
    pub usages: Vec<UsageWithEquipment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultWithTournament {
    #[serde(flatten)]
    pub result: MatchResult,
    pub tournament: Tournament,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultWithPlayer {
    #[serde(flatten)]
    pub result: MatchResult,
    pub player: Player,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageWithPlayer {
    #[serde(flatten)]
    pub usage: EquipmentUsage,
    pub player: Player,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    #[serde(flatten)]
    pub player: Player,
    pub match_results: Vec<ResultWithTournament>,
    pub equipment_usages: Vec<UsageWithEquipment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentDetail {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub usages: Vec<UsageWithPlayer>,
    pub affiliate_links: Vec<AffiliateLink>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDetail {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub match_results: Vec<ResultWithPlayer>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSummary {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub result_count: u32,
}
