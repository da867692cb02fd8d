use std::env;

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 3600 }
    }
}

#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub backoff_unit_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit_ms: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: "PickleballGearRankings/1.0".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Credentials for the scheduled sync trigger and the tour data providers
#[derive(Debug, Clone, Default)]
pub struct SyncSettings {
    pub cron_secret: Option<String>,
    pub apt_api_key: Option<String>,
    pub ppa_api_token: Option<String>,
}

impl SyncSettings {
    pub fn from_env() -> Self {
        Self {
            cron_secret: read_env("CRON_SECRET"),
            apt_api_key: read_env("APT_API_KEY"),
            ppa_api_token: read_env("PPA_API_TOKEN"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub cache: CacheSettings,
    pub retry: RetrySettings,
    pub http: HttpSettings,
    pub sync: SyncSettings,
    pub affiliates: super::retailers::AffiliateSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    /// Build the configuration from the process environment
    pub fn new() -> Self {
        Self {
            database_path: read_env("DATABASE_PATH")
                .unwrap_or_else(|| "pickleball_gear_rankings.db".to_string()),
            cache: CacheSettings::default(),
            retry: RetrySettings::default(),
            http: HttpSettings::default(),
            sync: SyncSettings::from_env(),
            affiliates: super::retailers::AffiliateSettings::from_env(),
        }
    }
}

/// Unset and blank variables are both treated as missing
pub(super) fn read_env(key: &str) -> Option<String> {
    non_blank(env::var(key).ok())
}

pub(super) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
