use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about = "pickleball-gear-rankings backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Reset the database and load the reference data set
    Seed,
    /// Print a leaderboard as JSON
    Leaderboard {
        /// Which board to print
        #[arg(short, long, value_enum, default_value_t = BoardKind::Paddle)]
        kind: BoardKind,
        /// Number of entries (capped at 100)
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show which data sources and retailers are configured
    #[clap(name = "sync-status")]
    SyncStatus,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum BoardKind {
    Paddle,
    Shoe,
    Player,
}
