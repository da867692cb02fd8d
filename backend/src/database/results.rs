use anyhow::{Context, Result};
use rusqlite::params;
use std::collections::HashMap;

use super::connection::DbConn;
use super::models::{MatchResult, NewMatchResult};
use super::players::{parse_player_row, PLAYER_COLUMNS};
use super::tournaments::{self, parse_tournament_row, TOURNAMENT_COLUMNS};
use super::{qualify, sql_limit};
use crate::domain::{ResultWithPlayer, ResultWithTournament};
use crate::scoring::calculate_points;

pub(super) const RESULT_COLUMNS: &str =
    "id, player_id, tournament_id, placement, points, match_date, event_type";
pub(super) const RESULT_COLUMN_COUNT: usize = 7;

pub(super) fn parse_result_row(row: &rusqlite::Row, start: usize) -> rusqlite::Result<MatchResult> {
    Ok(MatchResult {
        id: row.get(start)?,
        player_id: row.get(start + 1)?,
        tournament_id: row.get(start + 2)?,
        placement: row.get(start + 3)?,
        points: row.get(start + 4)?,
        match_date: row.get(start + 5)?,
        event_type: row.get(start + 6)?,
    })
}

/// Store a result with points derived from the tournament's tier as of now.
/// The stored points are what every later aggregation reads.
pub fn insert_match_result(conn: &mut DbConn, result: &NewMatchResult) -> Result<MatchResult> {
    result.validate().context("Invalid match result")?;

    let tier = tournaments::find_tier(conn, result.tournament_id)?
        .with_context(|| format!("Unknown tournament {}", result.tournament_id))?;
    let points = calculate_points(result.placement, tier);

    let sql = format!(
        "INSERT INTO match_results (player_id, tournament_id, placement, points, match_date, event_type) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {}",
        RESULT_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            result.player_id,
            result.tournament_id,
            result.placement,
            points,
            result.match_date,
            result.event_type
        ],
        |row| parse_result_row(row, 0),
    )
    .context("Failed to insert match result")
}

/// Results in live tournaments, grouped by player in insertion order
pub fn list_live_by_player(conn: &mut DbConn) -> Result<HashMap<i64, Vec<MatchResult>>> {
    let sql = format!(
        "SELECT {} FROM match_results r JOIN tournaments t ON t.id = r.tournament_id WHERE t.deleted_at IS NULL ORDER BY r.id",
        qualify("r", RESULT_COLUMNS)
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| parse_result_row(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list match results")?;

    let mut grouped: HashMap<i64, Vec<MatchResult>> = HashMap::new();
    for result in rows {
        grouped.entry(result.player_id).or_default().push(result);
    }
    Ok(grouped)
}

pub fn list_recent_for_player(
    conn: &mut DbConn,
    player_id: i64,
    limit: usize,
) -> Result<Vec<ResultWithTournament>> {
    let sql = format!(
        "SELECT {}, {} FROM match_results r JOIN tournaments t ON t.id = r.tournament_id WHERE r.player_id = ?1 AND t.deleted_at IS NULL ORDER BY r.match_date DESC, r.id DESC LIMIT ?2",
        qualify("r", RESULT_COLUMNS),
        qualify("t", TOURNAMENT_COLUMNS)
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id, sql_limit(limit)], |row| {
            Ok(ResultWithTournament {
                result: parse_result_row(row, 0)?,
                tournament: parse_tournament_row(row, RESULT_COLUMN_COUNT)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list results for player")?;

    Ok(rows)
}

/// Standings of a tournament, best placement first
pub fn list_for_tournament(conn: &mut DbConn, tournament_id: i64) -> Result<Vec<ResultWithPlayer>> {
    let sql = format!(
        "SELECT {}, {} FROM match_results r JOIN players p ON p.id = r.player_id WHERE r.tournament_id = ?1 AND p.deleted_at IS NULL ORDER BY r.placement ASC, r.id",
        qualify("r", RESULT_COLUMNS),
        qualify("p", PLAYER_COLUMNS)
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id], |row| {
            Ok(ResultWithPlayer {
                result: parse_result_row(row, 0)?,
                player: parse_player_row(row, RESULT_COLUMN_COUNT)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list results for tournament")?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::get_connection;
    use crate::database::test_support::*;
    use crate::domain::models::TournamentTier;

    #[test]
    fn test_points_are_stored_at_insert() {
        let (_dir, pool) = test_pool();
        let mut conn = get_connection(&pool).unwrap();
        let ben = player(&mut conn, "ben-johns");
        let masters = tournament(&mut conn, "ppa-masters-2024", TournamentTier::Ppa);

        let stored = result(&mut conn, &ben, &masters, 2, day(2024, 3, 10));
        assert_eq!(stored.points, 112);

        // A later retiering must not rewrite what was stored
        conn.execute("UPDATE tournaments SET tier = 'OTHER' WHERE id = ?1", params![masters.id])
            .unwrap();
        let results = list_live_by_player(&mut conn).unwrap();
        assert_eq!(results[&ben.id][0].points, 112);
    }

    #[test]
    fn test_zero_placement_is_rejected_with_a_reason() {
        let (_dir, pool) = test_pool();
        let mut conn = get_connection(&pool).unwrap();
        let ben = player(&mut conn, "ben-johns");
        let open = tournament(&mut conn, "us-open-2024", TournamentTier::Major);

        let err = insert_match_result(
            &mut conn,
            &NewMatchResult {
                player_id: ben.id,
                tournament_id: open.id,
                placement: 0,
                match_date: day(2024, 4, 21),
                event_type: None,
            },
        )
        .unwrap_err();

        assert_eq!(format!("{:#}", err), "Invalid match result: placement must be positive");
    }

    #[test]
    fn test_unknown_tournament_is_an_error() {
        let (_dir, pool) = test_pool();
        let mut conn = get_connection(&pool).unwrap();
        let ben = player(&mut conn, "ben-johns");

        let err = insert_match_result(
            &mut conn,
            &NewMatchResult {
                player_id: ben.id,
                tournament_id: 404,
                placement: 1,
                match_date: day(2024, 1, 1),
                event_type: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unknown tournament 404"));
    }

    #[test]
    fn test_recent_results_newest_first() {
        let (_dir, pool) = test_pool();
        let mut conn = get_connection(&pool).unwrap();
        let ben = player(&mut conn, "ben-johns");
        let open = tournament(&mut conn, "us-open-2024", TournamentTier::Major);

        result(&mut conn, &ben, &open, 3, day(2024, 2, 1));
        result(&mut conn, &ben, &open, 1, day(2024, 4, 21));
        result(&mut conn, &ben, &open, 2, day(2024, 3, 1));

        let recent = list_recent_for_player(&mut conn, ben.id, 2).unwrap();
        let placements: Vec<u32> = recent.iter().map(|r| r.result.placement).collect();
        assert_eq!(placements, vec![1, 2]);
        assert_eq!(recent[0].tournament.slug, "us-open-2024");
    }
}
