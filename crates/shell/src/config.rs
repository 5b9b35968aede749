use std::path::PathBuf;

use courtdesk_core::types::{parse_date, Date};

use crate::error::{ShellError, ShellResult};

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Shell configuration loaded from environment variables.
///
/// All fields have defaults suitable for local use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Directory holding the session flag and record snapshots.
    pub data_dir: PathBuf,
    /// Whether store snapshots are written to and loaded from `data_dir`.
    pub persist: bool,
    /// Fixed "today" for the dashboard; `None` uses the current UTC date.
    pub today: Option<Date>,
    pub log_format: LogFormat,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            persist: true,
            today: None,
            log_format: LogFormat::Pretty,
        }
    }
}

const DEFAULT_DATA_DIR: &str = "./courtdesk-data";

/// Name of the session flag file inside `data_dir`.
pub const SESSION_FILE: &str = "session.flag";

impl ShellConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default              |
    /// |----------------------|----------------------|
    /// | `COURTDESK_DATA_DIR` | `./courtdesk-data`   |
    /// | `COURTDESK_PERSIST`  | `true`               |
    /// | `COURTDESK_TODAY`    | current UTC date     |
    /// | `LOG_FORMAT`         | `pretty`             |
    pub fn from_env() -> ShellResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ShellResult<Self> {
        let data_dir = lookup("COURTDESK_DATA_DIR")
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let persist = match lookup("COURTDESK_PERSIST").as_deref().map(str::trim) {
            None | Some("") => true,
            Some("true" | "1" | "yes") => true,
            Some("false" | "0" | "no") => false,
            Some(other) => {
                return Err(ShellError::Config(format!(
                    "COURTDESK_PERSIST must be true or false, got '{other}'"
                )))
            }
        };

        let today = match lookup("COURTDESK_TODAY").filter(|s| !s.trim().is_empty()) {
            None => None,
            Some(raw) => Some(parse_date(&raw).ok_or_else(|| {
                ShellError::Config(format!("COURTDESK_TODAY must be YYYY-MM-DD, got '{raw}'"))
            })?),
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ShellError::Config(format!(
                    "LOG_FORMAT must be pretty or json, got '{other}'"
                )))
            }
        };

        Ok(Self {
            data_dir,
            persist,
            today,
            log_format,
        })
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    /// The configured date, or today's UTC date.
    pub fn today(&self) -> Date {
        self.today
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> ShellResult<ShellConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ShellConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(load(&[]).unwrap(), ShellConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            ("COURTDESK_DATA_DIR", "/tmp/cd"),
            ("COURTDESK_PERSIST", "false"),
            ("COURTDESK_TODAY", "2024-01-15"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/cd"));
        assert!(!config.persist);
        assert_eq!(config.today(), parse_date("2024-01-15").unwrap());
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.session_path(), PathBuf::from("/tmp/cd/session.flag"));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        assert_matches!(load(&[("COURTDESK_PERSIST", "maybe")]), Err(ShellError::Config(_)));
        assert_matches!(load(&[("COURTDESK_TODAY", "15/01/2024")]), Err(ShellError::Config(_)));
        assert_matches!(load(&[("LOG_FORMAT", "xml")]), Err(ShellError::Config(_)));
    }
}
