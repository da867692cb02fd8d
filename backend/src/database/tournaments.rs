use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{NewTournament, Tournament};
use super::{qualify, results, sql_limit};
use crate::domain::models::TournamentTier;
use crate::domain::{TournamentDetail, TournamentSummary};

/// Columns read by [`parse_tournament_row`]
pub(super) const TOURNAMENT_COLUMNS: &str =
    "id, name, slug, tier, start_date, end_date, location, deleted_at";
pub(super) const TOURNAMENT_COLUMN_COUNT: usize = 8;

pub(super) fn parse_tournament_row(row: &rusqlite::Row, start: usize) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(start)?,
        name: row.get(start + 1)?,
        slug: row.get(start + 2)?,
        tier: row.get(start + 3)?,
        start_date: row.get(start + 4)?,
        end_date: row.get(start + 5)?,
        location: row.get(start + 6)?,
        deleted_at: row.get(start + 7)?,
    })
}

pub fn insert_tournament(conn: &mut DbConn, tournament: &NewTournament) -> Result<Tournament> {
    tournament.validate().context("Invalid tournament")?;

    let sql = format!(
        "INSERT INTO tournaments (name, slug, tier, start_date, end_date, location) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {}",
        TOURNAMENT_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            tournament.name,
            tournament.slug,
            tournament.tier,
            tournament.start_date,
            tournament.end_date,
            tournament.location
        ],
        |row| parse_tournament_row(row, 0),
    )
    .with_context(|| format!("Failed to insert tournament {}", tournament.slug))
}

pub fn find_by_slug(conn: &mut DbConn, slug: &str) -> Result<Option<Tournament>> {
    let sql = format!(
        "SELECT {} FROM tournaments t WHERE t.slug = ?1 AND t.deleted_at IS NULL",
        qualify("t", TOURNAMENT_COLUMNS)
    );

    conn.query_row(&sql, params![slug], |row| parse_tournament_row(row, 0))
        .optional()
        .context("Failed to query tournament by slug")
}

/// Tier of any tournament, deleted or not, for scoring at ingestion
pub fn find_tier(conn: &mut DbConn, id: i64) -> Result<Option<TournamentTier>> {
    conn.query_row(
        "SELECT tier FROM tournaments WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .optional()
    .context("Failed to query tournament tier")
}

/// Most recent live tournaments first, each with its number of results
pub fn list_recent(conn: &mut DbConn, limit: usize) -> Result<Vec<TournamentSummary>> {
    let sql = format!(
        "SELECT {}, (SELECT COUNT(*) FROM match_results r WHERE r.tournament_id = t.id) \
         FROM tournaments t WHERE t.deleted_at IS NULL \
         ORDER BY t.start_date DESC, t.id DESC LIMIT ?1",
        qualify("t", TOURNAMENT_COLUMNS)
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![sql_limit(limit)], |row| {
            Ok(TournamentSummary {
                tournament: parse_tournament_row(row, 0)?,
                result_count: row.get(TOURNAMENT_COLUMN_COUNT)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list recent tournaments")?;

    Ok(rows)
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Tournament>> {
    let sql = format!(
        "SELECT {} FROM tournaments t WHERE t.deleted_at IS NULL ORDER BY t.start_date DESC, t.id DESC",
        qualify("t", TOURNAMENT_COLUMNS)
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| parse_tournament_row(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list tournaments")?;

    Ok(rows)
}

pub fn count_live(conn: &mut DbConn) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM tournaments WHERE deleted_at IS NULL",
        [],
        |row| row.get(0),
    )
    .context("Failed to count tournaments")
}

pub fn soft_delete(conn: &mut DbConn, id: i64) -> Result<bool> {
    let sql = "UPDATE tournaments SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL";
    let changed = conn
        .execute(sql, params![Utc::now().naive_utc(), id])
        .context("Failed to soft-delete tournament")?;
    Ok(changed > 0)
}

/// Tournament page: standings by placement
pub fn load_detail(conn: &mut DbConn, slug: &str) -> Result<Option<TournamentDetail>> {
    let Some(tournament) = find_by_slug(conn, slug)? else {
        return Ok(None);
    };

    let match_results = results::list_for_tournament(conn, tournament.id)?;

    Ok(Some(TournamentDetail {
        tournament,
        match_results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::get_connection;
    use crate::database::test_support::*;

    #[test]
    fn test_recent_tournaments_with_counts() {
        let (_dir, pool) = test_pool();
        let mut conn = get_connection(&pool).unwrap();
        let ben = player(&mut conn, "ben-johns");
        let anna = player(&mut conn, "anna-leigh-waters");

        let early = insert_tournament(
            &mut conn,
            &NewTournament {
                name: "Early",
                slug: "early",
                tier: TournamentTier::App,
                start_date: day(2024, 1, 5),
                end_date: day(2024, 1, 7),
                location: Some("Naples, FL"),
            },
        )
        .unwrap();
        let late = tournament(&mut conn, "late", TournamentTier::Major);
        result(&mut conn, &ben, &late, 1, day(2024, 4, 21));
        result(&mut conn, &anna, &late, 2, day(2024, 4, 21));
        result(&mut conn, &ben, &early, 3, day(2024, 1, 7));

        let recent = list_recent(&mut conn, 10).unwrap();
        let summary: Vec<(&str, u32)> = recent
            .iter()
            .map(|s| (s.tournament.slug.as_str(), s.result_count))
            .collect();
        assert_eq!(summary, vec![("late", 2), ("early", 1)]);

        assert_eq!(list_recent(&mut conn, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_soft_deleted_tournament_is_not_found() {
        let (_dir, pool) = test_pool();
        let mut conn = get_connection(&pool).unwrap();
        let open = tournament(&mut conn, "open", TournamentTier::Ppa);

        assert_eq!(count_live(&mut conn).unwrap(), 1);
        assert!(soft_delete(&mut conn, open.id).unwrap());
        assert!(!soft_delete(&mut conn, open.id).unwrap());

        assert!(find_by_slug(&mut conn, "open").unwrap().is_none());
        assert!(load_detail(&mut conn, "open").unwrap().is_none());
        assert!(list_all(&mut conn).unwrap().is_empty());
        assert_eq!(count_live(&mut conn).unwrap(), 0);
        // Scoring still knows the tier
        assert_eq!(find_tier(&mut conn, open.id).unwrap(), Some(TournamentTier::Ppa));
    }

    #[test]
    fn test_detail_orders_by_placement() {
        let (_dir, pool) = test_pool();
        let mut conn = get_connection(&pool).unwrap();
        let open = tournament(&mut conn, "open", TournamentTier::Major);
        let third = player(&mut conn, "third");
        let first = player(&mut conn, "first");

        result(&mut conn, &third, &open, 3, day(2024, 4, 21));
        result(&mut conn, &first, &open, 1, day(2024, 4, 21));

        let detail = load_detail(&mut conn, "open").unwrap().unwrap();
        let slugs: Vec<&str> = detail
            .match_results
            .iter()
            .map(|r| r.player.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["first", "third"]);
        assert_eq!(detail.match_results[0].result.points, 200);
    }
}
