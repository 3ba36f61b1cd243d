use log::{LevelFilter, warn};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_POLL_SECS: u64 = 12;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MAX_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
    pub stats_dir: Option<PathBuf>,
    pub pitcher_dump: Option<PathBuf>,
    /// Game requested on the command line; skips schedule auto-selection.
    pub game_pk: Option<u64>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            stats_dir: None,
            pitcher_dump: None,
            game_pk: None,
        }
    }
}

impl AppSettings {
    /// Read `PITCHFX_*` environment variables once.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn with_game(mut self, game_pk: Option<u64>) -> Self {
        if game_pk.is_some() {
            self.game_pk = game_pk;
        }
        self
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let seconds = |key: &str| {
            let raw = value(key)?;
            match raw.parse::<u64>() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    warn!("ignoring {key}={raw}: not a whole number of seconds");
                    None
                }
            }
        };

        let poll_interval = seconds("PITCHFX_POLL_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);
        let http_timeout = seconds("PITCHFX_TIMEOUT_SECS")
            .map(|secs| Duration::from_secs(secs.clamp(1, MAX_TIMEOUT_SECS)))
            .unwrap_or(defaults.http_timeout);
        let log_level = value("PITCHFX_LOG").and_then(|raw| match raw.parse::<LevelFilter>() {
            Ok(level) => Some(level),
            Err(_) => {
                warn!("ignoring PITCHFX_LOG={raw}: unknown level");
                None
            }
        });

        Self {
            full_screen: false,
            log_level,
            poll_interval,
            http_timeout,
            stats_dir: value("PITCHFX_STATS_DIR").map(PathBuf::from),
            pitcher_dump: value("PITCHFX_DUMP_PITCHERS").map(PathBuf::from),
            game_pk: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]);
        assert_eq!(s.poll_interval, Duration::from_secs(12));
        assert_eq!(s.http_timeout, Duration::from_secs(10));
        assert!(s.log_level.is_none());
        assert!(s.stats_dir.is_none());
        assert!(s.pitcher_dump.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            ("PITCHFX_POLL_SECS", "30"),
            ("PITCHFX_TIMEOUT_SECS", "5"),
            ("PITCHFX_STATS_DIR", "/tmp/stats"),
            ("PITCHFX_DUMP_PITCHERS", "pitchers.json"),
            ("PITCHFX_LOG", "debug"),
        ]);
        assert_eq!(s.poll_interval, Duration::from_secs(30));
        assert_eq!(s.http_timeout, Duration::from_secs(5));
        assert_eq!(s.stats_dir, Some(PathBuf::from("/tmp/stats")));
        assert_eq!(s.pitcher_dump, Some(PathBuf::from("pitchers.json")));
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn timeout_is_clamped() {
        assert_eq!(settings(&[("PITCHFX_TIMEOUT_SECS", "0")]).http_timeout, Duration::from_secs(1));
        assert_eq!(
            settings(&[("PITCHFX_TIMEOUT_SECS", "600")]).http_timeout,
            Duration::from_secs(60)
        );
    }

    #[test]
    fn bad_values_fall_back() {
        let s = settings(&[
            ("PITCHFX_POLL_SECS", "soon"),
            ("PITCHFX_TIMEOUT_SECS", "-3"),
            ("PITCHFX_LOG", "loud"),
            ("PITCHFX_STATS_DIR", "  "),
        ]);
        assert_eq!(s.poll_interval, Duration::from_secs(12));
        assert_eq!(s.http_timeout, Duration::from_secs(10));
        assert!(s.log_level.is_none());
        assert!(s.stats_dir.is_none());
    }

    #[test]
    fn zero_poll_interval_is_ignored() {
        assert_eq!(settings(&[("PITCHFX_POLL_SECS", "0")]).poll_interval, Duration::from_secs(12));
    }

    #[test]
    fn cli_game_overrides() {
        let s = settings(&[]).with_game(Some(745123));
        assert_eq!(s.game_pk, Some(745123));
        assert_eq!(s.with_game(None).game_pk, Some(745123));
    }
}
