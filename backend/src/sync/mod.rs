pub mod adapter;
pub mod conflict;

pub use adapter::{DataSourceAdapter, EquipmentUsageData, MatchResultData, TournamentData};
pub use conflict::{merge_partials, merge_records, resolve_conflict, should_override, SourcedRecord};
