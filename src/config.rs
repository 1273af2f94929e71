use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Live,
    Demo,
}

/// Refresh intervals and list limits. Built once at startup and handed to
/// every component that needs it; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: Source,
    pub text_live_count: usize,
    pub schedule_refresh: Duration,
    pub stats_refresh: Duration,
    pub text_live_refresh: Duration,
    pub request_timeout: Duration,
    pub schedule_days: i64,
    pub fetch_parallelism: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: Source::Live,
            text_live_count: 40,
            schedule_refresh: Duration::from_secs(10),
            stats_refresh: Duration::from_secs(10),
            text_live_refresh: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            schedule_days: 5,
            fetch_parallelism: 4,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let source = match env::var("SPORTX_SOURCE")
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "demo" | "fake" | "offline" => Source::Demo,
            _ => Source::Live,
        };

        Self {
            source,
            text_live_count: env_parse("SPORTX_TEXT_LIVE_COUNT")
                .unwrap_or(defaults.text_live_count)
                .clamp(1, 200),
            schedule_refresh: secs_env("SPORTX_SCHEDULE_POLL_SECS", defaults.schedule_refresh),
            stats_refresh: secs_env("SPORTX_STATS_POLL_SECS", defaults.stats_refresh),
            text_live_refresh: secs_env("SPORTX_TEXT_LIVE_POLL_SECS", defaults.text_live_refresh),
            request_timeout: Duration::from_secs(
                env_parse::<u64>("SPORTX_REQUEST_TIMEOUT_SECS")
                    .unwrap_or(defaults.request_timeout.as_secs())
                    .clamp(1, 60),
            ),
            schedule_days: env_parse::<i64>("SPORTX_SCHEDULE_DAYS")
                .unwrap_or(defaults.schedule_days)
                .clamp(1, 14),
            fetch_parallelism: env_parse::<usize>("SPORTX_FETCH_PARALLELISM")
                .unwrap_or(defaults.fetch_parallelism)
                .clamp(1, 32),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.trim().parse::<T>().ok())
}

fn secs_env(key: &str, default: Duration) -> Duration {
    Duration::from_secs(env_parse::<u64>(key).unwrap_or(default.as_secs()).max(2))
}
