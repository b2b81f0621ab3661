use std::path::PathBuf;
use std::time::Duration;
use reqwest::Url;
use crate::config::env::*;
use crate::domain::RecipientId;

const DEFAULT_STATS_URL: &str = "https://www.worldometers.info/coronavirus/";
const DEFAULT_TICKER_URL: &str = "https://news.zing.vn";
const DEFAULT_TICKER_FALLBACK_URL: &str = "https://zingnews.vn";
const DEFAULT_BULLETIN_URL: &str = "https://ncov.moh.gov.vn/";
const DEFAULT_BULLETIN_FALLBACK_URL: &str = "https://suckhoedoisong.vn/";

#[derive(Clone)]
pub struct AppConfig {
    pub home_country: String,
    pub top_limit: usize,
    pub poll_interval: Duration,
    pub freshness_window_minutes: i64,
    pub utc_offset_hours: i64,
    pub broadcast_step: Duration,
    pub include: Vec<RecipientId>,
    pub exclude: Vec<RecipientId>,
    pub state_file: PathBuf,
    pub sources: SourcesConfig,
}

#[derive(Clone)]
pub struct SourcesConfig {
    pub stats_url: Url,
    pub ticker_url: Url,
    pub ticker_fallback_url: Option<Url>,
    /// The ticker names countries in Vietnamese, so the home country goes
    /// by a different string there than in the aggregator table.
    pub ticker_title: String,
    pub bulletin_url: Url,
    pub bulletin_fallback_url: Option<Url>,
    pub utc_offset_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let utc_offset_hours = get_env_value_or_default("ANNOUNCEMENT_UTC_OFFSET", 7);
        let poll_seconds: u64 = get_env_value_or_default("RELOAD_EVERY", 300);
        let broadcast_step_ms: u64 = get_env_value_or_default("BROADCAST_STEP_MS", 90);
        let state_file: String = get_env_value_or_default("STATE_FILE", "./save.txt".to_string());
        Self {
            home_country: get_env_value_or_default("HOME_COUNTRY", "Vietnam".to_string()),
            top_limit: get_env_value_or_default("TOP_LIMIT", 10),
            poll_interval: Duration::from_secs(poll_seconds),
            freshness_window_minutes: get_env_value_or_default("ALERT_FRESHNESS_MINUTES", 180),
            utc_offset_hours,
            broadcast_step: Duration::from_millis(broadcast_step_ms),
            include: get_env_recipient_list("ALERT_INCLUDE"),
            exclude: get_env_recipient_list("ALERT_EXCLUDE"),
            state_file: PathBuf::from(state_file),
            sources: SourcesConfig {
                stats_url: get_env_url("STATS_URL", DEFAULT_STATS_URL),
                ticker_url: get_env_url("TICKER_URL", DEFAULT_TICKER_URL),
                ticker_fallback_url: Some(get_env_url("TICKER_FALLBACK_URL", DEFAULT_TICKER_FALLBACK_URL)),
                ticker_title: get_env_value_or_default("TICKER_TITLE", "Việt Nam".to_string()),
                bulletin_url: get_env_url("BULLETIN_URL", DEFAULT_BULLETIN_URL),
                bulletin_fallback_url: Some(get_env_url("BULLETIN_FALLBACK_URL", DEFAULT_BULLETIN_FALLBACK_URL)),
                utc_offset_hours,
            },
        }
    }
}

fn get_env_url(key: &str, default: &str) -> Url {
    let default = Url::parse(default).expect("hardcoded default URL must be valid");
    get_env_value_or_default(key, default)
}
