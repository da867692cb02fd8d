pub mod api;
pub mod attribution;
pub mod cache;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod http;
pub mod scoring;
pub mod services;
pub mod sync;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

use crate::cli::{BoardKind, Command};
use crate::config::retailer_config;
use crate::config::settings::AppConfig;
use crate::domain::models::EquipmentType;
use crate::services::leaderboard::{clamp_limit, LeaderboardService};
use crate::services::seed::SeedService;
use crate::services::server::ServerService;
use crate::services::sync::configured_sources;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_seed() -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.database_path)?;
    let report = SeedService::new(pool).run()?;
    info!("Seeded {:?}", report);
    Ok(())
}

pub fn handle_leaderboard(kind: BoardKind, limit: usize) -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.database_path)?;
    let service = LeaderboardService::new(pool, &config.cache);
    let limit = clamp_limit(Some(limit));

    let json = match kind {
        BoardKind::Paddle => {
            serde_json::to_string_pretty(&service.equipment_leaderboard(EquipmentType::Paddle, limit)?)?
        }
        BoardKind::Shoe => {
            serde_json::to_string_pretty(&service.equipment_leaderboard(EquipmentType::Shoe, limit)?)?
        }
        BoardKind::Player => serde_json::to_string_pretty(&service.player_leaderboard(limit)?)?,
    };
    println!("{}", json);
    Ok(())
}

pub fn handle_sync_status() -> Result<()> {
    let config = AppConfig::new();

    let sources = configured_sources(&config.sync);
    if sources.is_empty() {
        println!("Data sources: none configured (set APT_API_KEY or PPA_API_TOKEN)");
    } else {
        println!("Data sources: {}", sources.join(", "));
    }
    println!(
        "Cron secret: {}",
        if config.sync.cron_secret.is_some() { "set" } else { "missing" }
    );

    let retailers = config.affiliates.configured_retailers();
    if retailers.is_empty() {
        println!("Affiliate programs: none configured");
    }
    for retailer in retailers {
        println!("Affiliate program: {}", retailer_config(retailer).summary());
    }
    Ok(())
}
