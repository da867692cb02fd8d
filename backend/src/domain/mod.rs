pub mod graph;
pub mod models;
pub mod stats;

pub use graph::*;
pub use models::*;
pub use stats::*;
