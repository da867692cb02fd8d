pub mod affiliate_links;
pub mod connection;
pub mod equipment;
pub mod models;
pub mod players;
pub mod results;
pub mod setup;
pub mod tournaments;
pub mod usages;

pub use connection::{create_pool, get_connection, DbConn, DbPool};
pub use models::*;

/// Prefix each column of a comma separated list with a table alias
pub(crate) fn qualify(alias: &str, columns: &str) -> String {
    columns
        .split(',')
        .map(|column| format!("{}.{}", alias, column.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
