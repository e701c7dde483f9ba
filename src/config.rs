//! Configuration management for the shape tools
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (shapes.toml)
//! - Environment variables (SHAPES__*)
//!
//! ## Example config file (shapes.toml):
//! ```toml
//! [derive]
//! excluded_fields = ["_id", "__v"]
//! trim_strings = true
//!
//! [output]
//! format = "compact"
//! include_checksum = true
//!
//! [filter]
//! prune_after_filter = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::descriptor::DeriveOptions;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapesConfig {
    /// Derivation settings
    #[serde(default)]
    pub derive: DeriveConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Filter settings
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Derivation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveConfig {
    /// Field names never carried into descriptors
    #[serde(default = "default_excluded_fields")]
    pub excluded_fields: Vec<String>,

    /// Default `trim` for string fields
    #[serde(default)]
    pub trim_strings: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub format: OutputFormat,

    /// Attach the descriptor checksum to derived output
    #[serde(default = "default_true")]
    pub include_checksum: bool,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Filter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Run empty-branch pruning after every filter
    #[serde(default)]
    pub prune_after_filter: bool,
}

fn default_excluded_fields() -> Vec<String> {
    vec!["_id".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            excluded_fields: default_excluded_fields(),
            trim_strings: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pretty,
            include_checksum: true,
        }
    }
}

impl ShapesConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["shapes.toml", ".shapes.toml", "config/shapes.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "shapes") {
            let xdg_config = config_dir.config_dir().join("shapes.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SHAPES__OUTPUT__FORMAT=compact etc.
        builder = builder.add_source(
            Environment::with_prefix("SHAPES")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Derive options described by this configuration
    pub fn derive_options(&self) -> DeriveOptions {
        DeriveOptions {
            excluded_fields: self.derive.excluded_fields.clone(),
            trim_strings: self.derive.trim_strings,
            ..DeriveOptions::default()
        }
    }

    /// Render JSON in the configured format
    pub fn render(&self, value: &serde_json::Value) -> serde_json::Result<String> {
        match self.output.format {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}
