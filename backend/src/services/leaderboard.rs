use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use std::sync::Arc;
use std::time::Duration;

use crate::attribution::{rank_equipment, rank_players};
use crate::cache::{CacheTag, QueryCache};
use crate::config::settings::CacheSettings;
use crate::database::{self, equipment, players, DbPool};
use crate::domain::models::EquipmentType;
use crate::domain::{AllLeaderboards, EquipmentStats, PlayerStats};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Requested board size: missing or zero means the default, capped at the maximum
pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit
        .filter(|&limit| limit > 0)
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT)
}

/// Leaderboards computed from storage and cached per (board, limit)
pub struct LeaderboardService {
    pool: DbPool,
    equipment: QueryCache<Vec<EquipmentStats>>,
    players: QueryCache<Vec<PlayerStats>>,
}

impl LeaderboardService {
    pub fn new(pool: DbPool, settings: &CacheSettings) -> Self {
        let ttl = Duration::from_secs(settings.ttl_secs);
        Self {
            pool,
            equipment: QueryCache::new(
                "equipment-leaderboard",
                ttl,
                &[CacheTag::Leaderboard, CacheTag::Equipment],
            ),
            players: QueryCache::new(
                "player-leaderboard",
                ttl,
                &[CacheTag::Leaderboard, CacheTag::Players],
            ),
        }
    }

    pub fn equipment_leaderboard(&self, equipment_type: EquipmentType, limit: usize) -> Result<Vec<EquipmentStats>> {
        let key = format!("{}:{}", equipment_type, limit);
        self.equipment.get_or_try_insert_with(&key, || {
            let mut conn = database::get_connection(&self.pool)?;
            let graphs = equipment::load_leaderboard_graph(&mut conn, equipment_type)?;
            Ok(rank_equipment(&graphs, Utc::now().naive_utc(), limit))
        })
    }

    pub fn player_leaderboard(&self, limit: usize) -> Result<Vec<PlayerStats>> {
        self.players.get_or_try_insert_with(&limit.to_string(), || {
            let mut conn = database::get_connection(&self.pool)?;
            let graphs = players::load_leaderboard_graph(&mut conn)?;
            Ok(rank_players(&graphs, limit))
        })
    }

    /// Paddle, shoe and player boards computed side by side on blocking threads
    pub async fn all_leaderboards(self: &Arc<Self>, limit: usize) -> Result<AllLeaderboards> {
        let paddles = {
            let service = Arc::clone(self);
            tokio::task::spawn_blocking(move || service.equipment_leaderboard(EquipmentType::Paddle, limit))
        };
        let shoes = {
            let service = Arc::clone(self);
            tokio::task::spawn_blocking(move || service.equipment_leaderboard(EquipmentType::Shoe, limit))
        };
        let players = {
            let service = Arc::clone(self);
            tokio::task::spawn_blocking(move || service.player_leaderboard(limit))
        };

        let (paddles, shoes, players) = tokio::join!(paddles, shoes, players);

        Ok(AllLeaderboards {
            paddles: paddles.context("Paddle leaderboard task failed")??,
            shoes: shoes.context("Shoe leaderboard task failed")??,
            players: players.context("Player leaderboard task failed")??,
        })
    }

    /// Drop cached boards belonging to `tag`
    pub fn invalidate(&self, tag: CacheTag) {
        let dropped: Vec<&str> = [
            self.equipment.invalidate_tag(tag).then_some(self.equipment.name()),
            self.players.invalidate_tag(tag).then_some(self.players.name()),
        ]
        .into_iter()
        .flatten()
        .collect();

        if !dropped.is_empty() {
            info!("Invalidated {:?} for {:?}", dropped, tag);
        }
    }
}
