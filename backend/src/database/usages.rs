use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::params;

use super::connection::DbConn;
use super::equipment::{parse_equipment_row, EQUIPMENT_COLUMNS};
use super::models::{EquipmentUsage, NewEquipmentUsage};
use super::players::{parse_player_row, PLAYER_COLUMNS};
use super::qualify;
use crate::domain::models::EquipmentType;
use crate::domain::{UsageWithEquipment, UsageWithPlayer};

pub(super) const USAGE_COLUMNS: &str =
    "id, player_id, equipment_id, start_date, end_date, verified, source";
pub(super) const USAGE_COLUMN_COUNT: usize = 7;

pub(super) fn parse_usage_row(row: &rusqlite::Row, start: usize) -> rusqlite::Result<EquipmentUsage> {
    Ok(EquipmentUsage {
        id: row.get(start)?,
        player_id: row.get(start + 1)?,
        equipment_id: row.get(start + 2)?,
        start_date: row.get(start + 3)?,
        end_date: row.get(start + 4)?,
        verified: row.get(start + 5)?,
        source: row.get(start + 6)?,
    })
}

/// Record a usage interval. Overlapping intervals are accepted as is.
pub fn insert_usage(conn: &mut DbConn, usage: &NewEquipmentUsage) -> Result<EquipmentUsage> {
    usage.validate().context("Invalid equipment usage")?;

    let sql = format!(
        "INSERT INTO equipment_usages (player_id, equipment_id, start_date, end_date, verified, source) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {}",
        USAGE_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            usage.player_id,
            usage.equipment_id,
            usage.start_date,
            usage.end_date,
            usage.verified,
            usage.source
        ],
        |row| parse_usage_row(row, 0),
    )
    .context("Failed to insert equipment usage")
}

/// Close an open usage. Returns false if it was already closed or missing.
pub fn close_usage(conn: &mut DbConn, usage_id: i64, end_date: NaiveDateTime) -> Result<bool> {
    let sql = "UPDATE equipment_usages SET end_date = ?1 WHERE id = ?2 AND end_date IS NULL";
    let changed = conn
        .execute(sql, params![end_date, usage_id])
        .context("Failed to close equipment usage")?;
    Ok(changed > 0)
}

/// Usages of live equipment of one type by live players, in insertion order
pub fn list_by_live_players_for_type(
    conn: &mut DbConn,
    equipment_type: EquipmentType,
) -> Result<Vec<EquipmentUsage>> {
    let sql = format!(
        "SELECT {} FROM equipment_usages u \
         JOIN players p ON p.id = u.player_id \
         JOIN equipment e ON e.id = u.equipment_id \
         WHERE p.deleted_at IS NULL AND e.deleted_at IS NULL AND e.type = ?1 \
         ORDER BY u.id",
        qualify("u", USAGE_COLUMNS)
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![equipment_type], |row| parse_usage_row(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list usages by type")?;

    Ok(rows)
}

/// Every usage of live equipment joined to that equipment, in insertion order
pub fn list_live_with_equipment(conn: &mut DbConn) -> Result<Vec<UsageWithEquipment>> {
    let sql = format!(
        "SELECT {}, {} FROM equipment_usages u JOIN equipment e ON e.id = u.equipment_id WHERE e.deleted_at IS NULL ORDER BY u.id",
        qualify("u", USAGE_COLUMNS),
        qualify("e", EQUIPMENT_COLUMNS)
    );
    query_with_equipment(conn, &sql, None)
}

/// A player's gear history, most recently started first
pub fn list_history_for_player(conn: &mut DbConn, player_id: i64) -> Result<Vec<UsageWithEquipment>> {
    let sql = format!(
        "SELECT {}, {} FROM equipment_usages u JOIN equipment e ON e.id = u.equipment_id WHERE e.deleted_at IS NULL AND u.player_id = ?1 ORDER BY u.start_date DESC, u.id DESC",
        qualify("u", USAGE_COLUMNS),
        qualify("e", EQUIPMENT_COLUMNS)
    );
    query_with_equipment(conn, &sql, Some(player_id))
}

fn query_with_equipment(
    conn: &mut DbConn,
    sql: &str,
    player_id: Option<i64>,
) -> Result<Vec<UsageWithEquipment>> {
    let mut stmt = conn.prepare(sql)?;
    let map_row = |row: &rusqlite::Row| {
        Ok(UsageWithEquipment {
            usage: parse_usage_row(row, 0)?,
            equipment: parse_equipment_row(row, USAGE_COLUMN_COUNT)?,
        })
    };

    let rows = match player_id {
        Some(id) => stmt.query_map(params![id], map_row)?.collect::<rusqlite::Result<Vec<_>>>(),
        None => stmt.query_map([], map_row)?.collect::<rusqlite::Result<Vec<_>>>(),
    }
    .context("Failed to list usages with equipment")?;

    Ok(rows)
}

/// Live players currently using a piece of equipment
pub fn list_current_with_players(conn: &mut DbConn, equipment_id: i64) -> Result<Vec<UsageWithPlayer>> {
    let sql = format!(
        "SELECT {}, {} FROM equipment_usages u JOIN players p ON p.id = u.player_id WHERE u.equipment_id = ?1 AND u.end_date IS NULL AND p.deleted_at IS NULL ORDER BY u.id",
        qualify("u", USAGE_COLUMNS),
        qualify("p", PLAYER_COLUMNS)
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![equipment_id], |row| {
            Ok(UsageWithPlayer {
                usage: parse_usage_row(row, 0)?,
                player: parse_player_row(row, USAGE_COLUMN_COUNT)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list current users of equipment")?;

    Ok(rows)
}
