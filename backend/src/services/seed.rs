use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use log::info;

use crate::database::models::{
    NewEquipment, NewEquipmentUsage, NewMatchResult, NewPlayer, NewTournament,
};
use crate::database::{self, equipment, players, results, setup, tournaments, usages, DbConn, DbPool};
use crate::domain::models::{
    CoreMaterial, CourtType, EquipmentSpecs, EquipmentType, PaddleSpecs, ShoeSpecs, SurfaceMaterial,
    TournamentTier,
};

/// Rows written by a seed run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    pub paddles: usize,
    pub shoes: usize,
    pub players: usize,
    pub usages: usize,
    pub tournaments: usize,
    pub match_results: usize,
}

// name, slug, brand, description, weight, grip, length, width, surface, core thickness
const PADDLES: [(&str, &str, &str, &str, f64, f64, f64, f64, SurfaceMaterial, f64); 5] = [
    (
        "JOOLA Ben Johns Hyperion CFS 16",
        "joola-ben-johns-hyperion-cfs-16",
        "JOOLA",
        "The signature paddle of Ben Johns, featuring Carbon Friction Surface technology.",
        8.2, 4.125, 16.5, 7.5, SurfaceMaterial::Carbon, 16.0,
    ),
    (
        "Selkirk LUXX Control Air S2",
        "selkirk-luxx-control-air-s2",
        "Selkirk",
        "Advanced paddle with control-focused design and air technology.",
        7.9, 4.25, 16.4, 7.4, SurfaceMaterial::Carbon, 14.0,
    ),
    (
        "Franklin Ben Johns Signature",
        "franklin-ben-johns-signature",
        "Franklin",
        "Former signature paddle featuring MaxGrit technology.",
        8.0, 4.125, 16.5, 7.5, SurfaceMaterial::Fiberglass, 14.0,
    ),
    (
        "Paddletek Bantam EX-L Pro",
        "paddletek-bantam-ex-l-pro",
        "Paddletek",
        "Professional-grade paddle with elongated design.",
        7.8, 4.25, 16.5, 7.375, SurfaceMaterial::Graphite, 13.0,
    ),
    (
        "Engage Pursuit Pro MX",
        "engage-pursuit-pro-mx",
        "Engage",
        "Power-focused paddle with maximum spin potential.",
        8.1, 4.125, 16.5, 7.5, SurfaceMaterial::Carbon, 16.0,
    ),
];

// name, slug, brand, description, weight, drop height, court type
const SHOES: [(&str, &str, &str, &str, f64, f64, CourtType); 4] = [
    (
        "K-Swiss Hypercourt Express 2",
        "k-swiss-hypercourt-express-2",
        "K-Swiss",
        "Lightweight court shoe designed for quick lateral movement.",
        340.0, 9.0, CourtType::Both,
    ),
    (
        "ASICS Gel-Rocket 11",
        "asics-gel-rocket-11",
        "ASICS",
        "Versatile court shoe with GEL cushioning technology.",
        320.0, 10.0, CourtType::Indoor,
    ),
    (
        "Nike Court Air Zoom Vapor Pro 2",
        "nike-court-air-zoom-vapor-pro-2",
        "Nike",
        "Premium court shoe with responsive Zoom Air cushioning.",
        365.0, 8.0, CourtType::Outdoor,
    ),
    (
        "New Balance Fresh Foam LAV v2",
        "new-balance-fresh-foam-lav-v2",
        "New Balance",
        "Court shoe with Fresh Foam midsole for comfort.",
        355.0, 6.0, CourtType::Both,
    ),
];

// name, slug, ranking, country
const PLAYERS: [(&str, &str, u32, &str); 6] = [
    ("Ben Johns", "ben-johns", 1, "USA"),
    ("Tyson McGuffin", "tyson-mcguffin", 2, "USA"),
    ("JW Johnson", "jw-johnson", 3, "USA"),
    ("Federico Staksrud", "federico-staksrud", 4, "Argentina"),
    ("Anna Leigh Waters", "anna-leigh-waters", 1, "USA"),
    ("Catherine Parenteau", "catherine-parenteau", 2, "Canada"),
];

// player slug, equipment slug, start date, verified, source
const USAGES: [(&str, &str, (i32, u32, u32), bool, Option<&str>); 10] = [
    ("ben-johns", "joola-ben-johns-hyperion-cfs-16", (2023, 1, 1), true, Some("Official sponsor")),
    ("ben-johns", "k-swiss-hypercourt-express-2", (2023, 1, 1), true, Some("Tournament footage")),
    ("tyson-mcguffin", "selkirk-luxx-control-air-s2", (2023, 6, 1), true, Some("Official sponsor")),
    ("tyson-mcguffin", "nike-court-air-zoom-vapor-pro-2", (2023, 1, 1), false, Some("Tournament footage")),
    ("jw-johnson", "engage-pursuit-pro-mx", (2024, 1, 1), true, Some("Official sponsor")),
    ("jw-johnson", "asics-gel-rocket-11", (2024, 1, 1), false, None),
    ("federico-staksrud", "paddletek-bantam-ex-l-pro", (2023, 3, 1), true, Some("Official sponsor")),
    ("anna-leigh-waters", "joola-ben-johns-hyperion-cfs-16", (2023, 1, 1), true, Some("Official sponsor")),
    ("anna-leigh-waters", "new-balance-fresh-foam-lav-v2", (2023, 1, 1), true, Some("Tournament footage")),
    ("catherine-parenteau", "selkirk-luxx-control-air-s2", (2023, 9, 1), true, Some("Official sponsor")),
];

// name, slug, tier, start, end, location
const TOURNAMENTS: [(&str, &str, TournamentTier, (i32, u32, u32), (i32, u32, u32), &str); 5] = [
    (
        "US Open Pickleball Championships 2024",
        "us-open-2024",
        TournamentTier::Major,
        (2024, 4, 13),
        (2024, 4, 21),
        "Naples, FL",
    ),
    ("PPA Masters 2024", "ppa-masters-2024", TournamentTier::Ppa, (2024, 3, 7), (2024, 3, 10), "Mesa, AZ"),
    ("MLP Columbus 2024", "mlp-columbus-2024", TournamentTier::Mlp, (2024, 6, 13), (2024, 6, 16), "Columbus, OH"),
    (
        "APP San Clemente Open 2024",
        "app-san-clemente-2024",
        TournamentTier::App,
        (2024, 2, 15),
        (2024, 2, 18),
        "San Clemente, CA",
    ),
    (
        "Beer City Open 2024",
        "beer-city-open-2024",
        TournamentTier::Other,
        (2024, 7, 18),
        (2024, 7, 21),
        "Grand Rapids, MI",
    ),
];

// player slug, tournament slug, placement, match date, event
const MATCH_RESULTS: [(&str, &str, u32, (i32, u32, u32), &str); 14] = [
    ("ben-johns", "us-open-2024", 1, (2024, 4, 21), "Men's Singles"),
    ("tyson-mcguffin", "us-open-2024", 2, (2024, 4, 21), "Men's Singles"),
    ("jw-johnson", "us-open-2024", 3, (2024, 4, 21), "Men's Singles"),
    ("federico-staksrud", "us-open-2024", 4, (2024, 4, 21), "Men's Singles"),
    ("anna-leigh-waters", "us-open-2024", 1, (2024, 4, 21), "Women's Singles"),
    ("catherine-parenteau", "us-open-2024", 2, (2024, 4, 21), "Women's Singles"),
    ("ben-johns", "ppa-masters-2024", 1, (2024, 3, 10), "Men's Singles"),
    ("jw-johnson", "ppa-masters-2024", 2, (2024, 3, 10), "Men's Singles"),
    ("anna-leigh-waters", "ppa-masters-2024", 1, (2024, 3, 10), "Women's Singles"),
    ("tyson-mcguffin", "mlp-columbus-2024", 1, (2024, 6, 16), "Team"),
    ("federico-staksrud", "mlp-columbus-2024", 2, (2024, 6, 16), "Team"),
    ("jw-johnson", "app-san-clemente-2024", 1, (2024, 2, 18), "Men's Singles"),
    ("catherine-parenteau", "app-san-clemente-2024", 1, (2024, 2, 18), "Women's Singles"),
    ("federico-staksrud", "beer-city-open-2024", 1, (2024, 7, 21), "Men's Singles"),
];

/// Resets the database and loads the reference data set
pub struct SeedService {
    pool: DbPool,
}

impl SeedService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn run(&self) -> Result<SeedReport> {
        info!("=== Seeding database ===");
        let mut conn = database::get_connection(&self.pool)?;

        setup::reset_database(&mut conn)?;
        info!("  → Database schema reset");

        let report = seed_all(&mut conn)?;

        info!("  → Created {} paddles", report.paddles);
        info!("  → Created {} shoes", report.shoes);
        info!("  → Created {} players", report.players);
        info!("  → Created {} equipment usages", report.usages);
        info!("  → Created {} tournaments", report.tournaments);
        info!("  → Created {} match results", report.match_results);
        info!("=== Seeding complete ===");
        Ok(report)
    }
}

fn seed_all(conn: &mut DbConn) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for (name, slug, brand, description, weight, grip_size, length, width, surface, core) in PADDLES {
        let specs = EquipmentSpecs::Paddle(PaddleSpecs {
            weight,
            grip_size,
            length,
            width,
            core_material: CoreMaterial::Polymer,
            surface_material: surface,
            core_thickness: core,
            swing_weight: None,
        });
        insert_gear(conn, name, slug, brand, description, EquipmentType::Paddle, specs)?;
        report.paddles += 1;
    }

    for (name, slug, brand, description, weight, drop_height, court_type) in SHOES {
        let specs = EquipmentSpecs::Shoe(ShoeSpecs {
            weight,
            drop_height,
            court_type,
        });
        insert_gear(conn, name, slug, brand, description, EquipmentType::Shoe, specs)?;
        report.shoes += 1;
    }

    for (name, slug, ranking, country) in PLAYERS {
        players::insert_player(
            conn,
            &NewPlayer {
                name,
                slug,
                ranking: Some(ranking),
                country: Some(country),
                image_url: None,
            },
        )?;
        report.players += 1;
    }

    for (player_slug, equipment_slug, start, verified, source) in USAGES {
        let player_id = player_id(conn, player_slug)?;
        let equipment_id = equipment_id(conn, equipment_slug)?;
        usages::insert_usage(
            conn,
            &NewEquipmentUsage {
                player_id,
                equipment_id,
                start_date: date(start)?,
                end_date: None,
                verified,
                source,
            },
        )?;
        report.usages += 1;
    }

    for (name, slug, tier, start, end, location) in TOURNAMENTS {
        tournaments::insert_tournament(
            conn,
            &NewTournament {
                name,
                slug,
                tier,
                start_date: date(start)?,
                end_date: date(end)?,
                location: Some(location),
            },
        )?;
        report.tournaments += 1;
    }

    for (player_slug, tournament_slug, placement, match_date, event_type) in MATCH_RESULTS {
        let player_id = player_id(conn, player_slug)?;
        let tournament_id = tournament_id(conn, tournament_slug)?;
        results::insert_match_result(
            conn,
            &NewMatchResult {
                player_id,
                tournament_id,
                placement,
                match_date: date(match_date)?,
                event_type: Some(event_type),
            },
        )?;
        report.match_results += 1;
    }

    Ok(report)
}

fn insert_gear(
    conn: &mut DbConn,
    name: &str,
    slug: &str,
    brand: &str,
    description: &str,
    equipment_type: EquipmentType,
    specs: EquipmentSpecs,
) -> Result<()> {
    equipment::insert_equipment(
        conn,
        &NewEquipment {
            name,
            slug,
            brand,
            equipment_type,
            specs: Some(specs),
            image_url: None,
            description: Some(description),
        },
    )?;
    Ok(())
}

fn player_id(conn: &mut DbConn, slug: &str) -> Result<i64> {
    players::find_by_slug(conn, slug)?
        .map(|player| player.id)
        .with_context(|| format!("Seed references unknown player {}", slug))
}

fn equipment_id(conn: &mut DbConn, slug: &str) -> Result<i64> {
    equipment::find_by_slug(conn, slug)?
        .map(|equipment| equipment.id)
        .with_context(|| format!("Seed references unknown equipment {}", slug))
}

fn tournament_id(conn: &mut DbConn, slug: &str) -> Result<i64> {
    tournaments::find_by_slug(conn, slug)?
        .map(|tournament| tournament.id)
        .with_context(|| format!("Seed references unknown tournament {}", slug))
}

fn date((year, month, day): (i32, u32, u32)) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .with_context(|| format!("Invalid seed date {}-{}-{}", year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribution::{rank_equipment, rank_players};
    use crate::database::test_support::test_pool;
    use chrono::Utc;

    #[test]
    fn test_seed_counts() {
        let (_dir, pool) = test_pool();
        let report = SeedService::new(pool.clone()).run().unwrap();

        assert_eq!(
            report,
            SeedReport {
                paddles: 5,
                shoes: 4,
                players: 6,
                usages: 10,
                tournaments: 5,
                match_results: 14,
            }
        );

        let mut conn = database::get_connection(&pool).unwrap();
        assert_eq!(tournaments::count_live(&mut conn).unwrap(), 5);
    }

    #[test]
    fn test_seed_is_repeatable() {
        let (_dir, pool) = test_pool();
        let service = SeedService::new(pool.clone());
        service.run().unwrap();
        service.run().unwrap();

        let mut conn = database::get_connection(&pool).unwrap();
        assert_eq!(players::list_all(&mut conn).unwrap().len(), 6);
    }

    #[test]
    fn test_seeded_leaderboards() {
        let (_dir, pool) = test_pool();
        SeedService::new(pool.clone()).run().unwrap();
        let mut conn = database::get_connection(&pool).unwrap();
        let now = Utc::now().naive_utc();

        let board = rank_players(&players::load_leaderboard_graph(&mut conn).unwrap(), 10);
        assert_eq!(board[0].slug, "ben-johns");
        assert_eq!(board[0].total_points, 350);
        assert_eq!(board[0].total_wins, 2);
        assert_eq!(
            board[0].current_paddle.as_ref().map(|g| g.slug.as_str()),
            Some("joola-ben-johns-hyperion-cfs-16")
        );

        let paddles = rank_equipment(
            &equipment::load_leaderboard_graph(&mut conn, EquipmentType::Paddle).unwrap(),
            now,
            10,
        );
        // Ben Johns and Anna Leigh Waters both play the Hyperion
        assert_eq!(paddles[0].slug, "joola-ben-johns-hyperion-cfs-16");
        assert_eq!(paddles[0].total_points, 700);
        assert_eq!(paddles[0].total_wins, 4);
        assert_eq!(paddles[0].active_pro_count, 2);
        // Nobody plays the Franklin paddle
        assert_eq!(paddles.last().map(|p| p.total_points), Some(0));
    }
}
