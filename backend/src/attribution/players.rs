use super::rank_by_points;
use crate::domain::models::EquipmentType;
use crate::domain::{EquipmentSummary, PlayerGraph, PlayerStats, UsageWithEquipment};

/// Totals for one player over every result, whatever gear was in use
pub fn player_stats(graph: &PlayerGraph) -> PlayerStats {
    let total_points = graph.results.iter().map(|r| u64::from(r.points)).sum();
    let total_wins = graph.results.iter().filter(|r| r.placement == 1).count() as u32;

    let player = &graph.player;
    PlayerStats {
        id: player.id,
        name: player.name.clone(),
        slug: player.slug.clone(),
        ranking: player.ranking,
        country: player.country.clone(),
        image_url: player.image_url.clone(),
        current_paddle: current_gear(&graph.usages, EquipmentType::Paddle),
        current_shoes: current_gear(&graph.usages, EquipmentType::Shoe),
        total_points,
        total_wins,
    }
}

// First open usage of the type in retrieval order
fn current_gear(usages: &[UsageWithEquipment], equipment_type: EquipmentType) -> Option<EquipmentSummary> {
    usages
        .iter()
        .find(|u| u.usage.end_date.is_none() && u.equipment.equipment_type == equipment_type)
        .map(|u| EquipmentSummary::from(&u.equipment))
}

/// Player leaderboard: points descending, ties in input order
pub fn rank_players(graphs: &[PlayerGraph], limit: usize) -> Vec<PlayerStats> {
    let stats: Vec<PlayerStats> = graphs.iter().map(player_stats).collect();
    rank_by_points(stats, limit, |s| s.total_points)
}
