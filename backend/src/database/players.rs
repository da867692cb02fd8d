use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;

use super::connection::DbConn;
use super::models::{NewPlayer, Player};
use super::{qualify, results, usages};
use crate::domain::{PlayerGraph, PlayerProfile, UsageWithEquipment};

/// Columns read by [`parse_player_row`]
pub(super) const PLAYER_COLUMNS: &str = "id, name, slug, ranking, country, image_url, deleted_at";

const RECENT_RESULTS_LIMIT: usize = 20;

pub(super) fn parse_player_row(row: &rusqlite::Row, start: usize) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(start)?,
        name: row.get(start + 1)?,
        slug: row.get(start + 2)?,
        ranking: row.get(start + 3)?,
        country: row.get(start + 4)?,
        image_url: row.get(start + 5)?,
        deleted_at: row.get(start + 6)?,
    })
}

pub fn insert_player(conn: &mut DbConn, player: &NewPlayer) -> Result<Player> {
    player.validate().context("Invalid player")?;

    let sql = format!(
        "INSERT INTO players (name, slug, ranking, country, image_url) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {}",
        PLAYER_COLUMNS
    );

    conn.query_row(
        &sql,
        params![player.name, player.slug, player.ranking, player.country, player.image_url],
        |row| parse_player_row(row, 0),
    )
    .with_context(|| format!("Failed to insert player {}", player.slug))
}

pub fn find_by_slug(conn: &mut DbConn, slug: &str) -> Result<Option<Player>> {
    let sql = format!(
        "SELECT {} FROM players p WHERE p.slug = ?1 AND p.deleted_at IS NULL",
        qualify("p", PLAYER_COLUMNS)
    );

    conn.query_row(&sql, params![slug], |row| parse_player_row(row, 0))
        .optional()
        .context("Failed to query player by slug")
}

/// Live players, best ranked first and unranked last
pub fn list_all(conn: &mut DbConn) -> Result<Vec<Player>> {
    let sql = format!(
        "SELECT {} FROM players p WHERE p.deleted_at IS NULL ORDER BY p.ranking IS NULL, p.ranking ASC, p.name ASC",
        qualify("p", PLAYER_COLUMNS)
    );
    query_players(conn, &sql)
}

fn list_live(conn: &mut DbConn) -> Result<Vec<Player>> {
    let sql = format!(
        "SELECT {} FROM players p WHERE p.deleted_at IS NULL ORDER BY p.id",
        qualify("p", PLAYER_COLUMNS)
    );
    query_players(conn, &sql)
}

fn query_players(conn: &mut DbConn, sql: &str) -> Result<Vec<Player>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| parse_player_row(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list players")?;

    Ok(rows)
}

pub fn soft_delete(conn: &mut DbConn, id: i64) -> Result<bool> {
    let sql = "UPDATE players SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL";
    let changed = conn
        .execute(sql, params![Utc::now().naive_utc(), id])
        .context("Failed to soft-delete player")?;
    Ok(changed > 0)
}

/// Live players with all their results and usages, for the player leaderboard
pub fn load_leaderboard_graph(conn: &mut DbConn) -> Result<Vec<PlayerGraph>> {
    let players = list_live(conn)?;
    let mut results_by_player = results::list_live_by_player(conn)?;
    let mut usages_by_player = group_by_player(usages::list_live_with_equipment(conn)?);

    let graphs = players
        .into_iter()
        .map(|player| PlayerGraph {
            results: results_by_player.remove(&player.id).unwrap_or_default(),
            usages: usages_by_player.remove(&player.id).unwrap_or_default(),
            player,
        })
        .collect();

    Ok(graphs)
}

fn group_by_player(usages: Vec<UsageWithEquipment>) -> HashMap<i64, Vec<UsageWithEquipment>> {
    let mut grouped: HashMap<i64, Vec<_>> = HashMap::new();
    for usage in usages {
        grouped.entry(usage.usage.player_id).or_default().push(usage);
    }
    grouped
}

/// Player page: recent results newest first, full gear history newest first
pub fn load_profile(conn: &mut DbConn, slug: &str) -> Result<Option<PlayerProfile>> {
    let Some(player) = find_by_slug(conn, slug)? else {
        return Ok(None);
    };

    let match_results = results::list_recent_for_player(conn, player.id, RECENT_RESULTS_LIMIT)?;
    let equipment_usages = usages::list_history_for_player(conn, player.id)?;

    Ok(Some(PlayerProfile {
        player,
        match_results,
        equipment_usages,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::get_connection;
    use crate::database::test_support::test_pool;

    #[test]
    fn test_invalid_player_is_rejected_before_writing() {
        let (_dir, pool) = test_pool();
        let mut conn = get_connection(&pool).unwrap();

        let err = insert_player(
            &mut conn,
            &NewPlayer {
                name: "",
                slug: "",
                ranking: Some(0),
                country: None,
                image_url: Some("not a url"),
            },
        )
        .unwrap_err();

        assert_eq!(format!("{:#}", err), "Invalid player: name must not be empty");
        assert!(list_all(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn test_players_listed_by_ranking_then_name() {
        let (_dir, pool) = test_pool();
        let mut conn = get_connection(&pool).unwrap();
        for (name, ranking) in [("Zed", None), ("Bea", Some(2)), ("Al", Some(2)), ("Cy", Some(1))] {
            insert_player(
                &mut conn,
                &NewPlayer {
                    name,
                    slug: name,
                    ranking,
                    country: None,
                    image_url: None,
                },
            )
            .unwrap();
        }

        let names: Vec<String> = list_all(&mut conn).unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Cy", "Al", "Bea", "Zed"]);
    }
}
