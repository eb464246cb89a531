//! Configuration management
//!
//! Manages tutor endpoint settings and the optional content-directory
//! override. Stored as TOML under the platform config directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Tutoring endpoint settings
    #[serde(default)]
    pub tutor: TutorConfig,
    /// Content catalog settings
    #[serde(default)]
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    /// URL of the local text-generation endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model name sent with each request
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional bearer token, for endpoints behind a proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_endpoint() -> String {
    crate::tutor::DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    crate::tutor::DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Directory with `lessons/` and `quizzes/` subdirectories; when unset,
    /// the built-in curriculum is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file, creating it with defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            let config: Config = toml::from_str(&contents)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = config_path()?;
        let parent = config_path.parent()
            .context("Config path has no parent")?;

        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "codetutor", "codetutor")
        .context("Failed to get project directories")?;
    Ok(base.config_dir().join("config.toml"))
}

/// Get the data directory path
pub fn data_dir() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "codetutor", "codetutor")
        .context("Failed to get project directories")?;
    Ok(base.data_dir().to_path_buf())
}

/// Path of the learner progress document
pub fn state_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("progress.json"))
}

/// Show current configuration
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Tutor endpoint:  {}", config.tutor.endpoint);
    println!("Tutor model:     {}", config.tutor.model);
    println!("Request timeout: {}s", config.tutor.timeout_secs);
    let api_key = if config.tutor.api_key.is_some() {
        "configured"
    } else {
        "not set"
    };
    println!("API key:         {}", api_key);
    match &config.content.dir {
        Some(dir) => println!("Content dir:     {}", dir.display()),
        None => println!("Content dir:     built-in curriculum"),
    }
    println!("\nConfig file:     {}", config_path()?.display());
    println!("Progress file:   {}", state_path()?.display());

    Ok(())
}

/// Set the tutoring endpoint URL
pub fn set_endpoint(endpoint: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.tutor.endpoint = endpoint.to_string();
    config.save()?;
    println!("Tutor endpoint set to {}", endpoint);
    Ok(())
}

/// Set the model name sent to the endpoint
pub fn set_model(model: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.tutor.model = model.to_string();
    config.save()?;
    println!("Tutor model set to {}", model);
    Ok(())
}

/// Set (or clear) the content directory override
pub fn set_content_dir(dir: Option<&str>) -> Result<()> {
    let mut config = Config::load()?;
    match dir {
        Some(dir) => {
            let path = PathBuf::from(dir);
            if !path.exists() {
                anyhow::bail!("Directory does not exist: {}", path.display());
            }
            config.content.dir = Some(path);
            println!("Content directory set to {}", dir);
        }
        None => {
            config.content.dir = None;
            println!("Content directory cleared; using built-in curriculum");
        }
    }
    config.save()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tutor.endpoint, "http://localhost:11434/api/generate");
        assert_eq!(config.tutor.model, "codellama");
        assert_eq!(config.tutor.timeout_secs, 30);
        assert!(config.tutor.api_key.is_none());
        assert!(config.content.dir.is_none());
    }

    #[test]
    fn test_toml_round_trip_with_missing_sections() {
        // An empty file should yield pure defaults
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.tutor.model, "codellama");

        // A partial section keeps defaults for missing keys
        let config: Config = toml::from_str("[tutor]\nmodel = \"llama3\"\n").unwrap();
        assert_eq!(config.tutor.model, "llama3");
        assert_eq!(config.tutor.timeout_secs, 30);
    }
}
