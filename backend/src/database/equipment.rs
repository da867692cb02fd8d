use anyhow::{bail, Context, Result};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use std::collections::HashMap;

use super::connection::DbConn;
use super::models::{Equipment, NewEquipment};
use super::{affiliate_links, qualify, results, usages};
use crate::domain::models::{EquipmentSpecs, EquipmentType};
use crate::domain::{EquipmentDetail, EquipmentGraph, UsageWithResults};

/// Columns read by [`parse_equipment_row`]
pub(super) const EQUIPMENT_COLUMNS: &str =
    "id, name, slug, brand, type, specs, image_url, description, deleted_at";

pub(super) fn parse_equipment_row(row: &rusqlite::Row, start: usize) -> rusqlite::Result<Equipment> {
    let equipment_type: EquipmentType = row.get(start + 4)?;
    let specs = row
        .get::<_, Option<String>>(start + 5)?
        .map(|raw| parse_specs(equipment_type, &raw))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(start + 5, Type::Text, Box::new(e)))?;

    Ok(Equipment {
        id: row.get(start)?,
        name: row.get(start + 1)?,
        slug: row.get(start + 2)?,
        brand: row.get(start + 3)?,
        equipment_type,
        specs,
        image_url: row.get(start + 6)?,
        description: row.get(start + 7)?,
        deleted_at: row.get(start + 8)?,
    })
}

fn parse_specs(equipment_type: EquipmentType, raw: &str) -> serde_json::Result<EquipmentSpecs> {
    let value: Value = serde_json::from_str(raw)?;
    EquipmentSpecs::from_json(equipment_type, value)
}

pub fn insert_equipment(conn: &mut DbConn, equipment: &NewEquipment) -> Result<Equipment> {
    equipment.validate().context("Invalid equipment")?;

    let specs = match &equipment.specs {
        Some(specs) if specs.kind() != equipment.equipment_type => bail!(
            "Specs for {} describe a {}, not a {}",
            equipment.slug,
            specs.kind(),
            equipment.equipment_type
        ),
        Some(specs) => Some(serde_json::to_string(specs).context("Failed to serialize specs")?),
        None => None,
    };

    let sql = format!(
        "INSERT INTO equipment (name, slug, brand, type, specs, image_url, description) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING {}",
        EQUIPMENT_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            equipment.name,
            equipment.slug,
            equipment.brand,
            equipment.equipment_type,
            specs,
            equipment.image_url,
            equipment.description
        ],
        |row| parse_equipment_row(row, 0),
    )
    .with_context(|| format!("Failed to insert equipment {}", equipment.slug))
}

pub fn find_by_slug(conn: &mut DbConn, slug: &str) -> Result<Option<Equipment>> {
    let sql = format!(
        "SELECT {} FROM equipment e WHERE e.slug = ?1 AND e.deleted_at IS NULL",
        qualify("e", EQUIPMENT_COLUMNS)
    );

    conn.query_row(&sql, params![slug], |row| parse_equipment_row(row, 0))
        .optional()
        .context("Failed to query equipment by slug")
}

/// Live equipment by name, optionally of one type
pub fn list_all(conn: &mut DbConn, equipment_type: Option<EquipmentType>) -> Result<Vec<Equipment>> {
    let sql = format!(
        "SELECT {} FROM equipment e WHERE e.deleted_at IS NULL AND (?1 IS NULL OR e.type = ?1) ORDER BY e.name ASC",
        qualify("e", EQUIPMENT_COLUMNS)
    );
    query_equipment(conn, &sql, equipment_type)
}

fn list_live_of_type(conn: &mut DbConn, equipment_type: EquipmentType) -> Result<Vec<Equipment>> {
    let sql = format!(
        "SELECT {} FROM equipment e WHERE e.deleted_at IS NULL AND e.type = ?1 ORDER BY e.id",
        qualify("e", EQUIPMENT_COLUMNS)
    );
    query_equipment(conn, &sql, Some(equipment_type))
}

fn query_equipment(
    conn: &mut DbConn,
    sql: &str,
    equipment_type: Option<EquipmentType>,
) -> Result<Vec<Equipment>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![equipment_type], |row| parse_equipment_row(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list equipment")?;

    Ok(rows)
}

pub fn soft_delete(conn: &mut DbConn, id: i64) -> Result<bool> {
    let sql = "UPDATE equipment SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL";
    let changed = conn
        .execute(sql, params![Utc::now().naive_utc(), id])
        .context("Failed to soft-delete equipment")?;
    Ok(changed > 0)
}

/// Live equipment of one type with every usage by a live player, each usage
/// carrying all of that player's live results
pub fn load_leaderboard_graph(
    conn: &mut DbConn,
    equipment_type: EquipmentType,
) -> Result<Vec<EquipmentGraph>> {
    let equipment = list_live_of_type(conn, equipment_type)?;
    let results_by_player = results::list_live_by_player(conn)?;

    let mut usages_by_equipment: HashMap<i64, Vec<UsageWithResults>> = HashMap::new();
    for usage in usages::list_by_live_players_for_type(conn, equipment_type)? {
        let results = results_by_player
            .get(&usage.player_id)
            .cloned()
            .unwrap_or_default();
        usages_by_equipment
            .entry(usage.equipment_id)
            .or_default()
            .push(UsageWithResults { usage, results });
    }

    let graphs = equipment
        .into_iter()
        .map(|equipment| EquipmentGraph {
            usages: usages_by_equipment.remove(&equipment.id).unwrap_or_default(),
            equipment,
        })
        .collect();

    Ok(graphs)
}

/// Gear page: current users and active affiliate links
pub fn load_detail(conn: &mut DbConn, slug: &str) -> Result<Option<EquipmentDetail>> {
    let Some(equipment) = find_by_slug(conn, slug)? else {
        return Ok(None);
    };

    let usages = usages::list_current_with_players(conn, equipment.id)?;
    let affiliate_links = affiliate_links::list_active_for_equipment(conn, equipment.id)?;

    Ok(Some(EquipmentDetail {
        equipment,
        usages,
        affiliate_links,
    }))
}
