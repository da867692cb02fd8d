use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::conflict::source_priority;
use crate::domain::models::TournamentTier;

/// A tournament as reported by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentData {
    pub external_id: String,
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub location: Option<String>,
    pub tier: TournamentTier,
}

/// A finish as reported by a provider. The provider's own `points` figure is
/// informational; stored points always come from the local scoring policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultData {
    pub external_tournament_id: String,
    pub external_player_id: String,
    pub player_name: String,
    pub placement: u32,
    pub points: u32,
    pub match_date: NaiveDateTime,
    pub event_type: Option<String>,
}

/// Gear a provider saw a player using
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentUsageData {
    pub player_name: String,
    pub paddle_brand: Option<String>,
    pub paddle_model: Option<String>,
    pub shoe_brand: Option<String>,
    pub shoe_model: Option<String>,
    pub source: String,
    pub verified_at: Option<NaiveDateTime>,
}

/// Contract for an external tournament data provider.
///
/// Implementations doing network I/O compose [`crate::http::fetch_with_retry`]
/// (or [`crate::http::HttpClient::get_json`]) so failures surface as
/// `[source] operation: last error`.
#[async_trait]
pub trait DataSourceAdapter: Send + Sync {
    /// Key into the source priority table
    fn source_name(&self) -> &str;

    fn source_priority(&self) -> u32 {
        source_priority(self.source_name())
    }

    /// Tournaments updated after `since`, or all of them
    async fn fetch_tournaments(&self, since: Option<NaiveDateTime>) -> Result<Vec<TournamentData>>;

    async fn fetch_results(&self, tournament_external_id: &str) -> Result<Vec<MatchResultData>>;

    async fn fetch_player_equipment(&self, player_external_id: &str) -> Result<Vec<EquipmentUsageData>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Quiet(&'static str);

    #[async_trait]
    impl DataSourceAdapter for Quiet {
        fn source_name(&self) -> &str {
            self.0
        }

        async fn fetch_tournaments(&self, _since: Option<NaiveDateTime>) -> Result<Vec<TournamentData>> {
            Ok(vec![])
        }

        async fn fetch_results(&self, _id: &str) -> Result<Vec<MatchResultData>> {
            Ok(vec![])
        }

        async fn fetch_player_equipment(&self, _id: &str) -> Result<Vec<EquipmentUsageData>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_priority_comes_from_source_table() {
        assert_eq!(Quiet("ppa").source_priority(), 100);
        assert_eq!(Quiet("novolleys").source_priority(), 40);
        assert_eq!(Quiet("somewhere-else").source_priority(), 0);
    }

    #[test]
    fn test_tournament_data_wire_format() {
        let data: TournamentData = serde_json::from_value(serde_json::json!({
            "externalId": "ppa-2024-atlanta",
            "name": "Atlanta Slam",
            "startDate": "2024-04-13T00:00:00",
            "endDate": "2024-04-21T00:00:00",
            "location": null,
            "tier": "PPA"
        }))
        .unwrap();

        assert_eq!(data.tier, TournamentTier::Ppa);
        assert!(data.location.is_none());
    }
}
