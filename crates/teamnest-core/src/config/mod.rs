//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// TeamNest configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub latency: LatencyConfig,
    pub auth: AuthConfig,
    pub views: ViewsConfig,
}

/// Artificial delays applied by the mock API, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub enabled: bool,
    pub list_ms: u64,
    pub list_roles_ms: u64,
    pub get_ms: u64,
    pub create_ms: u64,
    pub update_ms: u64,
    pub delete_ms: u64,
    pub stats_ms: u64,
    pub toggle_subtask_ms: u64,
    pub add_subtask_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewsConfig {
    pub project_page_size: usize,
    pub member_page_size: usize,
    /// Member whose tasks the dashboard shows as "my tasks"
    pub current_user_id: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            list_ms: 500,
            list_roles_ms: 400,
            get_ms: 300,
            create_ms: 600,
            update_ms: 500,
            delete_ms: 400,
            stats_ms: 200,
            toggle_subtask_ms: 200,
            add_subtask_ms: 300,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
        }
    }
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            project_page_size: 6,
            member_page_size: 10,
            current_user_id: 1,
        }
    }
}

/// Weight class of a mock API call, which picks its delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    ListRoles,
    Get,
    Create,
    Update,
    Delete,
    Stats,
    ToggleSubtask,
    AddSubtask,
}

impl LatencyConfig {
    /// Latency profile with every delay switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Delay for an operation; zero when latency is disabled
    pub fn delay_for(&self, op: Operation) -> Duration {
        if !self.enabled {
            return Duration::ZERO;
        }
        let ms = match op {
            Operation::List => self.list_ms,
            Operation::ListRoles => self.list_roles_ms,
            Operation::Get => self.get_ms,
            Operation::Create => self.create_ms,
            Operation::Update => self.update_ms,
            Operation::Delete => self.delete_ms,
            Operation::Stats => self.stats_ms,
            Operation::ToggleSubtask => self.toggle_subtask_ms,
            Operation::AddSubtask => self.add_subtask_ms,
        };
        Duration::from_millis(ms)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("TEAMNEST_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("teamnest")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or defaults if it doesn't exist.
    /// Environment overrides are applied on top.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load the file alone, without environment overrides
    pub fn load_file() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// `TEAMNEST_LATENCY=off` disables delays, `TEAMNEST_API_URL` replaces the auth base URL
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(value) = env::var("TEAMNEST_LATENCY") {
            self.latency.enabled = parse_switch(&value)
                .ok_or_else(|| anyhow!("Invalid TEAMNEST_LATENCY value: {}", value))?;
        }
        if let Ok(url) = env::var("TEAMNEST_API_URL") {
            self.set("auth.base_url", &url)?;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_base_url(&self.auth.base_url)?;
        if self.views.project_page_size == 0 || self.views.member_page_size == 0 {
            return Err(anyhow!("Page sizes must be greater than zero"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        let l = &self.latency;
        match key {
            // Latency settings
            "latency.enabled" => Ok(l.enabled.to_string()),
            "latency.list_ms" => Ok(l.list_ms.to_string()),
            "latency.list_roles_ms" => Ok(l.list_roles_ms.to_string()),
            "latency.get_ms" => Ok(l.get_ms.to_string()),
            "latency.create_ms" => Ok(l.create_ms.to_string()),
            "latency.update_ms" => Ok(l.update_ms.to_string()),
            "latency.delete_ms" => Ok(l.delete_ms.to_string()),
            "latency.stats_ms" => Ok(l.stats_ms.to_string()),
            "latency.toggle_subtask_ms" => Ok(l.toggle_subtask_ms.to_string()),
            "latency.add_subtask_ms" => Ok(l.add_subtask_ms.to_string()),

            // Auth settings
            "auth.base_url" => Ok(self.auth.base_url.clone()),

            // View settings
            "views.project_page_size" => Ok(self.views.project_page_size.to_string()),
            "views.member_page_size" => Ok(self.views.member_page_size.to_string()),
            "views.current_user_id" => Ok(self.views.current_user_id.to_string()),

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `teamnest config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "latency.enabled" => {
                self.latency.enabled = parse_switch(value)
                    .ok_or_else(|| anyhow!("Invalid boolean value: {}", value))?;
            }
            "latency.list_ms" => self.latency.list_ms = parse_ms(key, value)?,
            "latency.list_roles_ms" => self.latency.list_roles_ms = parse_ms(key, value)?,
            "latency.get_ms" => self.latency.get_ms = parse_ms(key, value)?,
            "latency.create_ms" => self.latency.create_ms = parse_ms(key, value)?,
            "latency.update_ms" => self.latency.update_ms = parse_ms(key, value)?,
            "latency.delete_ms" => self.latency.delete_ms = parse_ms(key, value)?,
            "latency.stats_ms" => self.latency.stats_ms = parse_ms(key, value)?,
            "latency.toggle_subtask_ms" => self.latency.toggle_subtask_ms = parse_ms(key, value)?,
            "latency.add_subtask_ms" => self.latency.add_subtask_ms = parse_ms(key, value)?,

            "auth.base_url" => {
                validate_base_url(value)?;
                self.auth.base_url = value.trim_end_matches('/').to_string();
            }

            "views.project_page_size" => {
                self.views.project_page_size = parse_page_size(value)?;
            }
            "views.member_page_size" => {
                self.views.member_page_size = parse_page_size(value)?;
            }
            "views.current_user_id" => {
                self.views.current_user_id = value
                    .parse()
                    .with_context(|| format!("Invalid current_user_id value: {}", value))?;
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `teamnest config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = vec![
            "latency.enabled",
            "latency.list_ms",
            "latency.list_roles_ms",
            "latency.get_ms",
            "latency.create_ms",
            "latency.update_ms",
            "latency.delete_ms",
            "latency.stats_ms",
            "latency.toggle_subtask_ms",
            "latency.add_subtask_ms",
            "auth.base_url",
            "views.project_page_size",
            "views.member_page_size",
            "views.current_user_id",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn parse_ms(key: &str, value: &str) -> anyhow::Result<u64> {
    let ms: u64 = value
        .parse()
        .with_context(|| format!("Invalid {} value: {}", key, value))?;
    if ms > 60_000 {
        return Err(anyhow!("Delays are capped at 60000 ms"));
    }
    Ok(ms)
}

fn parse_page_size(value: &str) -> anyhow::Result<usize> {
    let size: usize = value
        .parse()
        .with_context(|| format!("Invalid page size: {}", value))?;
    if size == 0 {
        return Err(anyhow!("Page size must be greater than zero"));
    }
    Ok(size)
}

fn validate_base_url(url: &str) -> anyhow::Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(anyhow!(
            "Invalid base URL: {}. It must start with http:// or https://",
            url
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_mock_delays() {
        let latency = LatencyConfig::default();
        assert_eq!(latency.delay_for(Operation::List), Duration::from_millis(500));
        assert_eq!(latency.delay_for(Operation::Create), Duration::from_millis(600));
        assert_eq!(latency.delay_for(Operation::Stats), Duration::from_millis(200));
        assert_eq!(latency.delay_for(Operation::ListRoles), Duration::from_millis(400));
    }

    #[test]
    fn test_disabled_latency_is_zero() {
        let latency = LatencyConfig::disabled();
        assert_eq!(latency.delay_for(Operation::Create), Duration::ZERO);
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut config = Config::default();
        config.set("latency.get_ms", "50").unwrap();
        assert_eq!(config.get("latency.get_ms").unwrap(), "50");

        config.set("latency.enabled", "off").unwrap();
        assert_eq!(config.get("latency.enabled").unwrap(), "false");

        config.set("auth.base_url", "https://api.example.com/").unwrap();
        assert_eq!(config.get("auth.base_url").unwrap(), "https://api.example.com");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("latency.get_ms", "soon").is_err());
        assert!(config.set("latency.get_ms", "120000").is_err());
        assert!(config.set("views.project_page_size", "0").is_err());
        assert!(config.set("auth.base_url", "localhost:8080").is_err());
        assert!(config.set("nope", "1").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_list_covers_every_key() {
        let config = Config::default();
        let items = config.list().unwrap();
        assert_eq!(items.len(), 14);
        assert!(items.iter().any(|(k, v)| k == "views.project_page_size" && v == "6"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml("[latency]\nenabled = false\n").unwrap();
        assert!(!config.latency.enabled);
        assert_eq!(config.latency.update_ms, 500);
        assert_eq!(config.auth.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(Config::from_toml("[auth]\nbase_url = \"ftp://x\"\n").is_err());
    }
}
