//! Runtime timing configuration for the coordination engine.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_with::{DurationMilliSeconds, serde_as};
use tracing::{info, warn};

/// Default location on disk where the engine looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/invites.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "DUEL_INVITES_CONFIG_PATH";

#[derive(Debug, Clone)]
/// Immutable timing and capacity knobs shared across the engine.
///
/// Every delay and retry bound the source system hardcoded is explicit here.
pub struct CoordinatorConfig {
    /// Seconds a displayed invite stays up before auto-dismissal.
    pub countdown_seconds: u32,
    /// Cadence of countdown decrements.
    pub countdown_tick: Duration,
    /// Questions requested per duel.
    pub question_count: usize,
    /// Attempts to fetch invite details before surfacing the missed-invite
    /// banner.
    pub invite_fetch_attempts: u32,
    /// Delay before the first detail-fetch retry; doubles per attempt.
    pub invite_fetch_initial_delay: Duration,
    /// Upper bound on the detail-fetch retry delay.
    pub invite_fetch_max_delay: Duration,
    /// Delay schedule for the duel-lookup poll after an accepted status
    /// event. Bounded by construction: one lookup per entry, then give up.
    pub duel_poll_delays: Vec<Duration>,
    /// Pause between a successful accept and the duel-list navigation event.
    pub accept_nav_delay: Duration,
    /// Pause between a duel lifecycle event and the duel navigation event,
    /// leaving transient toasts visible before the screen switches.
    pub duel_nav_delay: Duration,
    /// Capacity of the UI event broadcast channel.
    pub ui_channel_capacity: usize,
    /// Capacity of each realtime broadcast channel.
    pub realtime_channel_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: 30,
            countdown_tick: Duration::from_secs(1),
            question_count: 5,
            invite_fetch_attempts: 3,
            invite_fetch_initial_delay: Duration::from_secs(1),
            invite_fetch_max_delay: Duration::from_secs(10),
            duel_poll_delays: vec![Duration::from_secs(1), Duration::from_secs(3)],
            accept_nav_delay: Duration::from_secs(1),
            duel_nav_delay: Duration::from_secs(1),
            ui_channel_capacity: 16,
            realtime_channel_capacity: 16,
        }
    }
}

impl CoordinatorConfig {
    /// Load the configuration from disk, falling back to the built-in
    /// defaults when the file is absent or malformed.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(path = %path.display(), "loaded coordinator config");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

#[serde_as]
#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file; absent fields keep their
/// defaults.
struct RawConfig {
    #[serde(default)]
    countdown_seconds: Option<u32>,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(default)]
    countdown_tick_ms: Option<Duration>,
    #[serde(default)]
    question_count: Option<usize>,
    #[serde(default)]
    invite_fetch_attempts: Option<u32>,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(default)]
    invite_fetch_initial_delay_ms: Option<Duration>,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(default)]
    invite_fetch_max_delay_ms: Option<Duration>,
    #[serde_as(as = "Option<Vec<DurationMilliSeconds<u64>>>")]
    #[serde(default)]
    duel_poll_delays_ms: Option<Vec<Duration>>,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(default)]
    accept_nav_delay_ms: Option<Duration>,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(default)]
    duel_nav_delay_ms: Option<Duration>,
    #[serde(default)]
    ui_channel_capacity: Option<usize>,
    #[serde(default)]
    realtime_channel_capacity: Option<usize>,
}

impl From<RawConfig> for CoordinatorConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            countdown_seconds: raw.countdown_seconds.unwrap_or(defaults.countdown_seconds),
            countdown_tick: raw.countdown_tick_ms.unwrap_or(defaults.countdown_tick),
            question_count: raw.question_count.unwrap_or(defaults.question_count),
            invite_fetch_attempts: raw
                .invite_fetch_attempts
                .unwrap_or(defaults.invite_fetch_attempts),
            invite_fetch_initial_delay: raw
                .invite_fetch_initial_delay_ms
                .unwrap_or(defaults.invite_fetch_initial_delay),
            invite_fetch_max_delay: raw
                .invite_fetch_max_delay_ms
                .unwrap_or(defaults.invite_fetch_max_delay),
            duel_poll_delays: raw
                .duel_poll_delays_ms
                .unwrap_or(defaults.duel_poll_delays),
            accept_nav_delay: raw.accept_nav_delay_ms.unwrap_or(defaults.accept_nav_delay),
            duel_nav_delay: raw.duel_nav_delay_ms.unwrap_or(defaults.duel_nav_delay),
            ui_channel_capacity: raw
                .ui_channel_capacity
                .unwrap_or(defaults.ui_channel_capacity),
            realtime_channel_capacity: raw
                .realtime_channel_capacity
                .unwrap_or(defaults.realtime_channel_capacity),
        }
    }
}

/// Resolve the configuration path taking the environment override into
/// account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
