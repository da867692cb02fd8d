use serde::Serialize;

use crate::database::models::Equipment;
use crate::domain::models::EquipmentType;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentStats {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    pub image_url: Option<String>,
    pub total_wins: u32,
    pub total_points: u64,
    pub active_pro_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub brand: String,
}

impl From<&Equipment> for EquipmentSummary {
    fn from(equipment: &Equipment) -> Self {
        Self {
            id: equipment.id,
            name: equipment.name.clone(),
            slug: equipment.slug.clone(),
            brand: equipment.brand.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub ranking: Option<u32>,
    pub country: Option<String>,
    pub image_url: Option<String>,
    pub current_paddle: Option<EquipmentSummary>,
    pub current_shoes: Option<EquipmentSummary>,
    pub total_points: u64,
    pub total_wins: u32,
}

/// Every leaderboard at once, as served when no type is requested
#[derive(Debug, Clone, Serialize)]
pub struct AllLeaderboards {
    pub paddles: Vec<EquipmentStats>,
    pub shoes: Vec<EquipmentStats>,
    pub players: Vec<PlayerStats>,
}
