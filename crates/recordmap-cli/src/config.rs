//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Command-line arguments, which take precedence

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema definition file holding the table correspondences
    pub schema_file: Option<PathBuf>,

    /// Reject non-injective correspondences when loading schemas
    pub strict: bool,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content).map_err(|e| Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: format!("TOML ({})", e),
            })?,
            _ => serde_json::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".recordmap.yaml"),
            PathBuf::from(".recordmap.json"),
            PathBuf::from(".recordmap.toml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let recordmap_dir = config_dir.join("recordmap");
            paths.push(recordmap_dir.join("config.yaml"));
            paths.push(recordmap_dir.join("config.json"));
            paths.push(recordmap_dir.join("config.toml"));
        }

        paths
    }

    /// Apply command-line overrides
    pub fn with_schema_override(mut self, schema_file: Option<PathBuf>) -> Self {
        if schema_file.is_some() {
            self.schema_file = schema_file;
        }
        self
    }

    /// Resolve the output format: command line, then configuration, then human
    pub fn output_format(&self, cli_format: Option<OutputFormat>) -> Result<OutputFormat> {
        match cli_format {
            Some(format) => Ok(format),
            None => OutputFormat::from_config_name(&self.output.format).ok_or_else(|| {
                Error::config(format!("unknown output format '{}'", self.output.format))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.schema_file.is_none());
        assert!(!config.strict);
        assert_eq!(config.output.format, "human");
        assert_eq!(config.output_format(None).unwrap(), OutputFormat::Human);
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "schema_file: schemas.yaml\nstrict: true\noutput:\n  format: json-pretty\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.schema_file, Some(PathBuf::from("schemas.yaml")));
        assert!(config.strict);
        assert_eq!(config.output_format(None).unwrap(), OutputFormat::JsonPretty);
        assert_eq!(
            config.output_format(Some(OutputFormat::Yaml)).unwrap(),
            OutputFormat::Yaml
        );
    }

    #[test]
    fn test_from_toml_and_json_files() {
        let dir = TempDir::new().unwrap();
        let toml_path = dir.path().join("config.toml");
        fs::write(&toml_path, "schema_file = \"s.toml\"\n\n[logging]\nlevel = \"debug\"\n").unwrap();
        let config = Config::from_file(&toml_path).unwrap();
        assert_eq!(config.schema_file, Some(PathBuf::from("s.toml")));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));

        let json_path = dir.path().join("config.json");
        fs::write(&json_path, r#"{"strict": true}"#).unwrap();
        assert!(Config::from_file(&json_path).unwrap().strict);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_schema_override() {
        let config = Config {
            schema_file: Some(PathBuf::from("configured.yaml")),
            ..Config::default()
        };
        let kept = config.clone().with_schema_override(None);
        assert_eq!(kept.schema_file, Some(PathBuf::from("configured.yaml")));

        let replaced = config.with_schema_override(Some(PathBuf::from("cli.yaml")));
        assert_eq!(replaced.schema_file, Some(PathBuf::from("cli.yaml")));
    }

    #[test]
    fn test_unknown_output_format() {
        let mut config = Config::default();
        config.output.format = "xml".to_string();
        assert!(matches!(config.output_format(None), Err(Error::Config(_))));
    }
}
