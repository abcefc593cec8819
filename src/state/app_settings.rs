use log::LevelFilter;
use rps_api::client::{DEFAULT_BASE_URL, HISTORY_START};
use std::time::Duration;

pub const DEFAULT_LIVE_WS: &str = "wss://bad-api-assignment.reaktor.com/rps/live";

/// Row increments offered by the "load more" control.
pub const PAGE_SIZES: [usize; 4] = [100, 500, 1000, 5000];

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub api_base: String,
    pub history_start: String,
    pub live_ws: String,
    pub page_delay: Duration,
    pub history_retries: u32,
    pub retry_backoff: Duration,
    pub page_size: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            api_base: DEFAULT_BASE_URL.to_string(),
            history_start: HISTORY_START.to_string(),
            live_ws: DEFAULT_LIVE_WS.to_string(),
            page_delay: Duration::from_millis(100),
            history_retries: 3,
            retry_backoff: Duration::from_millis(250),
            page_size: PAGE_SIZES[0],
        }
    }
}

impl AppSettings {
    /// Defaults overridden by `RPSTUI_*` environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Self::default();

        if let Some(base) = var("RPSTUI_API_BASE") {
            settings.api_base = base;
        }
        if let Some(ws) = var("RPSTUI_LIVE_WS") {
            settings.live_ws = ws;
        }
        if let Some(ms) = var("RPSTUI_PAGE_DELAY_MS").and_then(|v| v.parse::<u64>().ok()) {
            settings.page_delay = Duration::from_millis(ms);
        }
        if let Some(n) = var("RPSTUI_HISTORY_RETRIES").and_then(|v| v.parse::<u32>().ok()) {
            settings.history_retries = n;
        }
        if let Some(size) = var("RPSTUI_PAGE_SIZE").and_then(|v| v.parse::<usize>().ok())
            && PAGE_SIZES.contains(&size)
        {
            settings.page_size = size;
        }
        settings.log_level = var("RPSTUI_LOG").and_then(|v| v.parse::<LevelFilter>().ok());

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_from(pairs: &[(&str, &str)]) -> AppSettings {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_without_env() {
        let s = load_from(&[]);
        assert_eq!(s.api_base, DEFAULT_BASE_URL);
        assert_eq!(s.history_start, "/rps/history");
        assert_eq!(s.page_delay, Duration::from_millis(100));
        assert_eq!(s.page_size, 100);
        assert!(s.log_level.is_none());
    }

    #[test]
    fn env_overrides_apply() {
        let s = load_from(&[
            ("RPSTUI_API_BASE", "http://localhost:9000"),
            ("RPSTUI_LIVE_WS", "ws://127.0.0.1:8787"),
            ("RPSTUI_PAGE_DELAY_MS", "5"),
            ("RPSTUI_HISTORY_RETRIES", "0"),
            ("RPSTUI_PAGE_SIZE", "1000"),
            ("RPSTUI_LOG", "debug"),
        ]);
        assert_eq!(s.api_base, "http://localhost:9000");
        assert_eq!(s.live_ws, "ws://127.0.0.1:8787");
        assert_eq!(s.page_delay, Duration::from_millis(5));
        assert_eq!(s.history_retries, 0);
        assert_eq!(s.page_size, 1000);
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn unsupported_page_size_keeps_default() {
        let s = load_from(&[("RPSTUI_PAGE_SIZE", "42"), ("RPSTUI_PAGE_DELAY_MS", "soon")]);
        assert_eq!(s.page_size, 100);
        assert_eq!(s.page_delay, Duration::from_millis(100));
    }
}
