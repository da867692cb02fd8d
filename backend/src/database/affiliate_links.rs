use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use super::models::{AffiliateLink, NewAffiliateLink};

const LINK_COLUMNS: &str = "id, equipment_id, retailer, url, priority, commission, active";

fn parse_link_row(row: &rusqlite::Row) -> rusqlite::Result<AffiliateLink> {
    Ok(AffiliateLink {
        id: row.get(0)?,
        equipment_id: row.get(1)?,
        retailer: row.get(2)?,
        url: row.get(3)?,
        priority: row.get(4)?,
        commission: row.get(5)?,
        active: row.get(6)?,
    })
}

pub fn insert_link(conn: &mut DbConn, link: &NewAffiliateLink) -> Result<AffiliateLink> {
    link.validate().context("Invalid affiliate link")?;

    let sql = format!(
        "INSERT INTO affiliate_links (equipment_id, retailer, url, priority, commission) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {}",
        LINK_COLUMNS
    );

    conn.query_row(
        &sql,
        params![link.equipment_id, link.retailer, link.url, link.priority, link.commission],
        parse_link_row,
    )
    .context("Failed to insert affiliate link")
}

/// Active links of one piece of equipment, highest priority first
pub fn list_active_for_equipment(conn: &mut DbConn, equipment_id: i64) -> Result<Vec<AffiliateLink>> {
    let sql = format!(
        "SELECT {} FROM affiliate_links WHERE equipment_id = ?1 AND active = 1 ORDER BY priority DESC, id",
        LINK_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![equipment_id], parse_link_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list affiliate links")?;

    Ok(rows)
}
