use chrono::{NaiveDateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::config::settings::SyncSettings;
use crate::sync::adapter::{DataSourceAdapter, TournamentData};
use crate::sync::conflict::{resolve_conflict, SourcedRecord};

/// Providers that have credentials, by display name
pub fn configured_sources(settings: &SyncSettings) -> Vec<&'static str> {
    [
        (settings.apt_api_key.is_some(), "AllPickleballTournaments"),
        (settings.ppa_api_token.is_some(), "PPA Tour"),
    ]
    .into_iter()
    .filter_map(|(configured, name)| configured.then_some(name))
    .collect()
}

/// Outcome of one collection pass over every adapter
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// One reconciled record per external id, ordered by id
    pub tournaments: Vec<TournamentData>,
    pub succeeded_sources: Vec<String>,
    pub failed_sources: Vec<String>,
}

/// Runs the data source adapters and reconciles what they report
pub struct SyncService {
    adapters: Vec<Arc<dyn DataSourceAdapter>>,
}

impl SyncService {
    pub fn new(adapters: Vec<Arc<dyn DataSourceAdapter>>) -> Self {
        Self { adapters }
    }

    /// Fetch tournaments from every adapter at once. A failing adapter is
    /// logged and skipped; records sharing an external id are resolved by
    /// source priority, then fetch time.
    pub async fn collect_tournaments(&self, since: Option<NaiveDateTime>) -> SyncReport {
        let mut tasks = JoinSet::new();
        for (index, adapter) in self.adapters.iter().enumerate() {
            let adapter = Arc::clone(adapter);
            tasks.spawn(async move {
                let fetched = adapter.fetch_tournaments(since).await;
                (index, adapter.source_name().to_string(), fetched, Utc::now())
            });
        }

        let mut outcomes = Vec::with_capacity(self.adapters.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => warn!("Adapter task aborted: {}", e),
            }
        }
        // Adapter order, not completion order
        outcomes.sort_by_key(|(index, ..)| *index);

        let mut report = SyncReport::default();
        let mut candidates: BTreeMap<String, Vec<SourcedRecord<TournamentData>>> = BTreeMap::new();

        for (_, source, fetched, fetched_at) in outcomes {
            match fetched {
                Ok(tournaments) => {
                    info!("[{}] fetched {} tournaments", source, tournaments.len());
                    for tournament in tournaments {
                        candidates
                            .entry(tournament.external_id.clone())
                            .or_default()
                            .push(SourcedRecord::new(source.clone(), tournament, fetched_at));
                    }
                    report.succeeded_sources.push(source);
                }
                Err(e) => {
                    warn!("Skipping source {}: {:#}", source, e);
                    report.failed_sources.push(source);
                }
            }
        }

        report.tournaments = candidates.into_values().filter_map(resolve_conflict).collect();
        info!(
            "Collected {} tournaments from {} sources ({} failed)",
            report.tournaments.len(),
            report.succeeded_sources.len(),
            report.failed_sources.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TournamentTier;
    use crate::sync::adapter::{EquipmentUsageData, MatchResultData};
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct FakeSource {
        name: &'static str,
        tournaments: Vec<TournamentData>,
        fail: bool,
    }

    #[async_trait]
    impl DataSourceAdapter for FakeSource {
        fn source_name(&self) -> &str {
            self.name
        }

        async fn fetch_tournaments(&self, since: Option<NaiveDateTime>) -> Result<Vec<TournamentData>> {
            if self.fail {
                bail!("[{}] fetch tournaments: HTTP 503 Service Unavailable", self.name);
            }
            Ok(self
                .tournaments
                .iter()
                .filter(|t| since.is_none_or(|since| t.start_date >= since))
                .cloned()
                .collect())
        }

        async fn fetch_results(&self, _id: &str) -> Result<Vec<MatchResultData>> {
            Ok(vec![])
        }

        async fn fetch_player_equipment(&self, _id: &str) -> Result<Vec<EquipmentUsageData>> {
            Ok(vec![])
        }
    }

    fn tournament(external_id: &str, name: &str, month: u32) -> TournamentData {
        let start = NaiveDate::from_ymd_opt(2024, month, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        TournamentData {
            external_id: external_id.to_string(),
            name: name.to_string(),
            start_date: start,
            end_date: start,
            location: None,
            tier: TournamentTier::Ppa,
        }
    }

    fn source(name: &'static str, tournaments: Vec<TournamentData>) -> Arc<dyn DataSourceAdapter> {
        Arc::new(FakeSource {
            name,
            tournaments,
            fail: false,
        })
    }

    #[test]
    fn test_configured_sources() {
        let mut settings = SyncSettings::default();
        assert!(configured_sources(&settings).is_empty());

        settings.ppa_api_token = Some("token".to_string());
        assert_eq!(configured_sources(&settings), vec!["PPA Tour"]);

        settings.apt_api_key = Some("key".to_string());
        assert_eq!(configured_sources(&settings), vec!["AllPickleballTournaments", "PPA Tour"]);
    }

    #[tokio::test]
    async fn test_higher_priority_source_wins_shared_ids() {
        let service = SyncService::new(vec![
            source("apt", vec![tournament("atl", "Atlanta (apt)", 4), tournament("mesa", "Mesa", 3)]),
            source("ppa", vec![tournament("atl", "Atlanta Slam", 4)]),
        ]);

        let report = service.collect_tournaments(None).await;
        let names: Vec<&str> = report.tournaments.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Atlanta Slam", "Mesa"]);
        assert_eq!(report.succeeded_sources, vec!["apt", "ppa"]);
    }

    #[tokio::test]
    async fn test_failing_source_is_skipped() {
        let broken: Arc<dyn DataSourceAdapter> = Arc::new(FakeSource {
            name: "ppa",
            tournaments: vec![],
            fail: true,
        });
        let service = SyncService::new(vec![broken, source("apt", vec![tournament("mesa", "Mesa", 3)])]);

        let report = service.collect_tournaments(None).await;
        assert_eq!(report.tournaments.len(), 1);
        assert_eq!(report.failed_sources, vec!["ppa"]);
    }

    #[tokio::test]
    async fn test_since_is_passed_through() {
        let service = SyncService::new(vec![source(
            "apt",
            vec![tournament("feb", "Feb", 2), tournament("jun", "Jun", 6)],
        )]);
        let since = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();

        let report = service.collect_tournaments(Some(since)).await;
        assert_eq!(report.tournaments.len(), 1);
        assert_eq!(report.tournaments[0].external_id, "jun");
    }

    #[tokio::test]
    async fn test_no_adapters_yields_empty_report() {
        let report = SyncService::new(vec![]).collect_tournaments(None).await;
        assert!(report.tournaments.is_empty());
        assert!(report.failed_sources.is_empty());
    }
}
