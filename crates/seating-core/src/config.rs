//! Configuration loading and typed config structures for the seating planner.
//!
//! The configuration lives in `seating-config.yaml`. Every field has a
//! default, so an empty or partial file is valid. The storage directory can
//! be overridden with the `SEATING_DATA_DIR` environment variable.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::history::DEFAULT_HISTORY_LIMIT;

/// Environment variable that overrides `storage.data_dir`.
pub const DATA_DIR_ENV: &str = "SEATING_DATA_DIR";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlannerConfig {
    /// Undo/redo settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Defaults for new tables.
    #[serde(default)]
    pub tables: TableConfig,

    /// Canvas zoom and fit parameters.
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Where state is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PlannerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `SEATING_DATA_DIR` overrides `storage.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.storage.apply_env_overrides();
        Ok(config)
    }
}

/// Undo/redo configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of snapshots retained.
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_history_limit(),
        }
    }
}

/// Defaults and bounds for new tables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableConfig {
    /// Capacity used when none is given.
    #[serde(default = "default_table_capacity")]
    pub default_capacity: u32,

    /// Largest capacity the command shell accepts.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u32,

    /// Canvas coordinate of the first table on both axes.
    #[serde(default = "default_origin")]
    pub origin: f64,

    /// Diagonal offset between consecutively created tables.
    #[serde(default = "default_spacing")]
    pub spacing: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_capacity: default_table_capacity(),
            max_capacity: default_max_capacity(),
            origin: default_origin(),
            spacing: default_spacing(),
        }
    }
}

/// Zoom limits and fit parameters for the canvas.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewportConfig {
    /// Smallest zoom factor.
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,

    /// Largest zoom factor.
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,

    /// Zoom change per button press or wheel notch.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,

    /// Radius of a rendered table, in canvas units.
    #[serde(default = "default_table_radius")]
    pub table_radius: f64,

    /// Extra space around each table when fitting.
    #[serde(default = "default_fit_padding")]
    pub fit_padding: f64,

    /// Fraction of the viewport the fitted box may fill.
    #[serde(default = "default_fit_margin")]
    pub fit_margin: f64,

    /// Zoom used when focusing a single table.
    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            zoom_step: default_zoom_step(),
            table_radius: default_table_radius(),
            fit_padding: default_fit_padding(),
            fit_margin: default_fit_margin(),
            focus_zoom: default_focus_zoom(),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per key.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Key for the guest collection.
    #[serde(default = "default_guests_key")]
    pub guests_key: String,

    /// Key for the table collection.
    #[serde(default = "default_tables_key")]
    pub tables_key: String,
}

impl StorageConfig {
    /// Apply `SEATING_DATA_DIR` if set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV)
            && !dir.trim().is_empty()
        {
            self.data_dir = PathBuf::from(dir);
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            guests_key: default_guests_key(),
            tables_key: default_tables_key(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

const fn default_table_capacity() -> u32 {
    12
}

const fn default_max_capacity() -> u32 {
    20
}

const fn default_origin() -> f64 {
    200.0
}

const fn default_spacing() -> f64 {
    50.0
}

const fn default_min_zoom() -> f64 {
    0.25
}

const fn default_max_zoom() -> f64 {
    2.0
}

const fn default_zoom_step() -> f64 {
    0.1
}

const fn default_table_radius() -> f64 {
    50.0
}

const fn default_fit_padding() -> f64 {
    100.0
}

const fn default_fit_margin() -> f64 {
    0.9
}

const fn default_focus_zoom() -> f64 {
    1.5
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("seating-data")
}

fn default_guests_key() -> String {
    "wedding-seating-guests".to_owned()
}

fn default_tables_key() -> String {
    "wedding-seating-tables".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_front_end_behaviour() {
        let config = PlannerConfig::default();
        assert_eq!(config.history.limit, 50);
        assert_eq!(config.tables.default_capacity, 12);
        assert_eq!(config.tables.max_capacity, 20);
        assert!((config.viewport.min_zoom - 0.25).abs() < f64::EPSILON);
        assert!((config.viewport.max_zoom - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.storage.guests_key, "wedding-seating-guests");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
history:
  limit: 20

tables:
  default_capacity: 10
  max_capacity: 12
  origin: 0
  spacing: 80

viewport:
  min_zoom: 0.5
  max_zoom: 3.0
  zoom_step: 0.25
  table_radius: 40
  fit_padding: 60
  fit_margin: 0.8
  focus_zoom: 2.0

storage:
  guests_key: "guests"
  tables_key: "tables"

logging:
  level: "debug"
  format: json
"#;
        let config = PlannerConfig::parse(yaml).unwrap();
        assert_eq!(config.history.limit, 20);
        assert_eq!(config.tables.default_capacity, 10);
        assert!((config.tables.spacing - 80.0).abs() < f64::EPSILON);
        assert!((config.viewport.zoom_step - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.storage.tables_key, "tables");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = PlannerConfig::parse("history:\n  limit: 5\n").unwrap();
        assert_eq!(config.history.limit, 5);
        assert_eq!(config.tables.default_capacity, 12);
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(PlannerConfig::parse("").is_ok());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = PlannerConfig::parse("history: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("seating-config.yaml");
        if path.exists() {
            let config = PlannerConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
