use std::env;

use once_cell::sync::OnceCell;

const DEFAULT_ODDS_WARN_ABOVE: f64 = 100.0;

static CONFIG: OnceCell<CoreConfig> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct CoreConfig {
    // Leg odds above this are logged as suspicious (typo like "210" for "2.10"); never rejected.
    pub odds_warn_above: f64,
    pub split_legacy_teams: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            odds_warn_above: DEFAULT_ODDS_WARN_ABOVE,
            split_legacy_teams: true,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Self {
        let odds_warn_above = env::var("PRONO_ODDS_WARN_ABOVE")
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_ODDS_WARN_ABOVE)
            .clamp(2.0, 100_000.0);
        let split_legacy_teams = env_bool("PRONO_SPLIT_LEGACY", true);

        Self {
            odds_warn_above,
            split_legacy_teams,
        }
    }
}

/// Process-wide configuration, read from the environment on first use.
pub fn core_config() -> &'static CoreConfig {
    CONFIG.get_or_init(CoreConfig::from_env)
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            let t = v.trim().to_ascii_lowercase();
            !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
        })
        .unwrap_or(default)
}
