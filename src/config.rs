//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.apprisk.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Locale settings for displayed amounts.
    #[serde(default)]
    pub locale: LocaleConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "apprisk_report.md".to_string()
}

/// Dataset settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the report dataset CSV. Empty means "not configured";
    /// the `--data` flag then becomes mandatory.
    #[serde(default)]
    pub path: String,
}

/// Locale settings for displayed amounts.
///
/// Defaults match Indonesian formatting: dots group thousands, a comma
/// marks decimals, amounts carry the rupiah prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Separator between thousands groups.
    #[serde(default = "default_grouping_separator")]
    pub grouping_separator: char,

    /// Separator between the integer and fraction parts.
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,

    /// Prefix for currency amounts.
    #[serde(default = "default_currency_prefix")]
    pub currency_prefix: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            grouping_separator: default_grouping_separator(),
            decimal_separator: default_decimal_separator(),
            currency_prefix: default_currency_prefix(),
        }
    }
}

fn default_grouping_separator() -> char {
    '.'
}

fn default_decimal_separator() -> char {
    ','
}

fn default_currency_prefix() -> String {
    "Rp".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the map section in Markdown reports.
    #[serde(default = "default_true")]
    pub include_map: bool,

    /// Maximum appraiser rows rendered in the Markdown table.
    /// Zero means unlimited.
    #[serde(default)]
    pub max_table_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_map: true,
            max_table_rows: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".apprisk.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; flags
    /// only override when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.dataset.path = data.display().to_string();
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// The configured dataset path, if any.
    pub fn dataset_path(&self) -> Option<PathBuf> {
        if self.dataset.path.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.dataset.path))
        }
    }

    /// The configured report output path.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.general.output)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
