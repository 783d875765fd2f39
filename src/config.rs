use std::env;
use std::path::PathBuf;

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "MYSH_LOG";
/// Environment variable overriding the history file. Empty disables it.
pub const HISTORY_ENV: &str = "MYSH_HISTORY";

pub const DEFAULT_LOG_FILTER: &str = "warn";
const DEFAULT_HISTORY_FILE: &str = ".mysh_history";

/// Startup settings, read once from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_filter: String,
    /// Where interactive history is loaded from and saved to.
    pub history_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_filter = lookup(LOG_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let history_file = match lookup(HISTORY_ENV) {
            Some(path) if path.is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::home_dir().map(|home| home.join(DEFAULT_HISTORY_FILE)),
        };

        Config { log_filter, history_file }
    }
}
