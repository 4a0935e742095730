//! Runtime configuration.
//!
//! Sources, lowest precedence first: built-in defaults, `unigraph.toml`,
//! environment variables, command-line flags.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use unigraph_core::{AnchorPolicy, MappingOptions};
use unigraph_graph::GraphConfig;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "unigraph.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub graph: GraphConfig,
    pub mapping: MappingConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/Q9Y261.xml"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub anchor: AnchorPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Local wall-clock time of the daily run, `HH:MM`.
    pub daily_at: String,
    pub retries: u32,
    pub retry_delay_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily_at: "00:00".to_string(),
            retries: 10,
            retry_delay_secs: 1,
        }
    }
}

impl ScheduleConfig {
    pub fn trigger_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.daily_at, "%H:%M")
            .with_context(|| format!("Invalid schedule.daily_at '{}', expected HH:MM", self.daily_at))
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl AppConfig {
    /// Load configuration from `path`, or from `unigraph.toml` in the
    /// working directory if present, then apply environment overrides.
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply `NEO4J_*` and `UNIGRAPH_INPUT` overrides.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(uri) = lookup("NEO4J_URI") {
            self.graph.uri = uri;
        }
        if let Some(user) = lookup("NEO4J_USER") {
            self.graph.user = user;
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            self.graph.password = password;
        }
        if let Some(database) = lookup("NEO4J_DATABASE") {
            self.graph.database = database;
        }
        if let Some(input) = lookup("UNIGRAPH_INPUT") {
            self.input.path = PathBuf::from(input);
        }
    }

    pub fn mapping_options(&self) -> MappingOptions {
        MappingOptions {
            anchor: self.mapping.anchor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.input.path, PathBuf::from("data/Q9Y261.xml"));
        assert_eq!(config.graph.uri, "bolt://localhost:7687");
        assert_eq!(config.mapping.anchor, AnchorPolicy::Primary);
        assert_eq!(config.schedule.retries, 10);
        assert_eq!(config.schedule.retry_delay(), Duration::from_secs(1));
        assert_eq!(
            config.schedule.trigger_time().unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[graph]
uri = "bolt://graph:7687"

[mapping]
anchor = "every_accession"

[schedule]
daily_at = "06:30"
retries = 2
retry_delay_secs = 900
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.graph.uri, "bolt://graph:7687");
        assert_eq!(config.graph.user, "neo4j");
        assert_eq!(config.mapping.anchor, AnchorPolicy::EveryAccession);
        assert_eq!(
            config.schedule.trigger_time().unwrap(),
            NaiveTime::from_hms_opt(6, 30, 0).unwrap()
        );
        assert_eq!(config.schedule.retry_delay(), Duration::from_secs(900));
        assert_eq!(config.input.path, PathBuf::from("data/Q9Y261.xml"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_invalid_anchor_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[mapping]\nanchor = \"last\"").unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("NEO4J_URI", "neo4j+s://aura.example:7687"),
            ("NEO4J_PASSWORD", "secret"),
            ("UNIGRAPH_INPUT", "/data/P04637.xml"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.graph.uri, "neo4j+s://aura.example:7687");
        assert_eq!(config.graph.password, "secret");
        assert_eq!(config.graph.user, "neo4j");
        assert_eq!(config.input.path, PathBuf::from("/data/P04637.xml"));
    }

    #[test]
    fn test_bad_trigger_time() {
        let schedule = ScheduleConfig {
            daily_at: "25:00".to_string(),
            ..Default::default()
        };
        assert!(schedule.trigger_time().is_err());
    }
}
