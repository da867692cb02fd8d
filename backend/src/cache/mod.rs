pub mod structs;

pub use structs::{CacheTag, QueryCache};
