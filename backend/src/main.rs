use anyhow::Result;

use pickleball_gear_rankings::cli::Command;
use pickleball_gear_rankings::{
    handle_leaderboard, handle_seed, handle_serve, handle_sync_status, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Seed => handle_seed(),
        Command::Leaderboard { kind, limit } => handle_leaderboard(*kind, *limit),
        Command::SyncStatus => handle_sync_status(),
    }
}
