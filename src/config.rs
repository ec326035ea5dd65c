//! Configuration management for ecs-scout.
//!
//! This module handles loading and managing application configuration from a TOML file
//! located at `~/.ecs-scout/config.toml`. Configuration provides fallback values for
//! the AWS region/profile flags and controls colored output.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure for ecs-scout.
///
/// All configuration options are optional and will fall back to sensible defaults
/// if not specified in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// AWS-specific configuration options
    #[serde(default)]
    pub aws: AwsConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// AWS SDK configuration options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AwsConfig {
    /// Default AWS region (e.g., "us-east-1")
    /// If not specified, will use AWS SDK's default resolution (env vars, profile, etc.)
    pub region: Option<String>,

    /// AWS profile name to use from ~/.aws/credentials
    /// If not specified, will use the default profile
    pub profile: Option<String>,
}

/// Output configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// When to colorize report output
    /// Options: "auto", "always", "never"
    #[serde(default = "default_color")]
    pub color: String,
}

// Default value functions for serde
fn default_color() -> String {
    "auto".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

impl Config {
    /// Returns the path to the configuration directory (~/.ecs-scout/)
    pub fn config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home_dir.join(".ecs-scout"))
    }

    /// Returns the path to the configuration file (~/.ecs-scout/config.toml)
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file, creating a default if it doesn't exist.
    ///
    /// # Behavior
    /// 1. If the config file exists, parse and return it
    /// 2. If the config file doesn't exist, create default config file and return defaults
    /// 3. If parsing fails, return error with context
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {config_path:?}"))?;

            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {config_path:?}"))?;

            Ok(config)
        } else {
            // Create default config file
            let default_config = Config::default();
            default_config.create_default_config()?;
            Ok(default_config)
        }
    }

    /// Creates a default configuration file at ~/.ecs-scout/config.toml
    ///
    /// This function will create the config directory if it doesn't exist, then
    /// write a default configuration file with helpful comments.
    pub fn create_default_config(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        let config_path = Self::config_file_path()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {config_dir:?}"))?;
        }

        // Generate default config with comments
        let default_toml = r#"# ecs-scout Configuration File
# This file is automatically generated with default values.
# You can edit this file to customize ecs-scout's behavior.

[aws]
# Default AWS region to use (optional)
# Overridden by the --region flag and the AWS_DEFAULT_REGION environment variable.
# If not specified, uses AWS SDK's default resolution (env vars, ~/.aws/config, etc.)
# region = "us-east-1"

# AWS profile to use from ~/.aws/credentials (optional)
# Overridden by the --profile flag.
# profile = "default"

[output]
# When to colorize report output
# Options: "auto", "always", "never"
color = "auto"
"#;

        fs::write(&config_path, default_toml)
            .with_context(|| format!("Failed to write config file: {config_path:?}"))?;

        Ok(())
    }

    /// Applies the configured color mode to the global colored-output switch.
    ///
    /// "auto" leaves terminal detection in charge; anything else forces
    /// colors on or off for the whole invocation.
    pub fn apply_color_mode(&self) {
        match self.output.color.as_str() {
            "always" => colored::control::set_override(true),
            "never" => colored::control::set_override(false),
            _ => {}
        }
    }
}
