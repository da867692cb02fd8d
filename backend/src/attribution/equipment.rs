use chrono::NaiveDateTime;

use super::{is_within_usage, rank_by_points};
use crate::domain::{EquipmentGraph, EquipmentStats};

/// Totals for one piece of equipment.
///
/// Every usage, open or closed, credits the matches its player played
/// inside the interval. A match covered by usages of several items counts
/// for each of them.
pub fn equipment_stats(graph: &EquipmentGraph, now: NaiveDateTime) -> EquipmentStats {
    let mut total_points = 0u64;
    let mut total_wins = 0u32;

    for entry in &graph.usages {
        for result in &entry.results {
            if !is_within_usage(&entry.usage, result.match_date, now) {
                continue;
            }
            total_points += u64::from(result.points);
            if result.placement == 1 {
                total_wins += 1;
            }
        }
    }

    let active_pro_count = graph
        .usages
        .iter()
        .filter(|entry| entry.usage.end_date.is_none())
        .count() as u32;

    let equipment = &graph.equipment;
    EquipmentStats {
        id: equipment.id,
        name: equipment.name.clone(),
        slug: equipment.slug.clone(),
        brand: equipment.brand.clone(),
        equipment_type: equipment.equipment_type,
        image_url: equipment.image_url.clone(),
        total_wins,
        total_points,
        active_pro_count,
    }
}

/// Equipment leaderboard: points descending, ties in input order
pub fn rank_equipment(graphs: &[EquipmentGraph], now: NaiveDateTime, limit: usize) -> Vec<EquipmentStats> {
    let stats: Vec<EquipmentStats> = graphs.iter().map(|graph| equipment_stats(graph, now)).collect();
    rank_by_points(stats, limit, |s| s.total_points)
}
