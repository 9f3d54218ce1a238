use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `ai.api_key`.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub ai: AIConfig,
    pub security: SecurityConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AIConfig {
    pub model: String,
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Sent as `HTTP-Referer` for provider attribution.
    pub referer: Option<String>,
    /// Sent as `X-Title` for provider attribution.
    pub title: Option<String>,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout_secs: 60,
            referer: None,
            title: Some("aicmd".to_string()),
        }
    }
}

impl AIConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SecurityConfig {
    /// Ask before running a command proposed by the model.
    pub confirm_ai_commands: bool,
    /// Extra substrings refused on top of the built-in list.
    pub blocked_commands: Vec<String>,
    pub command_timeout_secs: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            confirm_ai_commands: true,
            blocked_commands: Vec::new(),
            command_timeout_secs: 30,
        }
    }
}

impl SecurityConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub color_output: bool,
    pub theme: ThemeName,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: true,
            theme: ThemeName::Dark,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Dark,
    Light,
    Monochrome,
}

impl Config {
    pub fn create_default(path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())?;
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("Config path {:?} has no parent directory", path))?;
        fs::create_dir_all(parent)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    /// Loads the config at `path`, writing the defaults first if it does not exist,
    /// then applies the API key from the environment.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            Self::create_default(path)?;
            tracing::info!("Created default config file at {:?}", path);
        }

        let mut config = Self::load(path)?;
        config.apply_env(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// A non-blank key from the environment wins over the file.
    pub fn apply_env(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.ai.api_key = Some(key);
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.ai
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "aicmd", "aicmd")
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}
