pub mod leaderboard;
pub mod seed;
pub mod server;
pub mod sync;
