//! Configuration management for the job scout

use crate::error::{Result, ScoutError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    pub telegram: TelegramConfig,
    pub storage: StorageConfig,
    pub resume: ResumeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Listing page URL, without the `page` query parameter
    pub url: String,
    /// A posting is kept when its lower-cased title contains any of these
    pub title_keywords: Vec<String>,
    pub max_pages: usize,
    pub request_timeout_secs: u64,
    pub max_retries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub enabled: bool,
    pub api_base: String,
    pub bot_token: String,
    pub chat_id: String,
    /// Pause between two consecutive messages
    pub message_delay_ms: u64,
    pub max_retries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeConfig {
    pub path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                url: "https://www.dice.com/jobs?filters.postedDate=ONE&filters.employmentType=CONTRACTS%7CTHIRD_PARTY&countryCode=US&location=United+States&locationPrecision=Country&q=Golang".to_string(),
                title_keywords: vec![
                    "golang".to_string(),
                    "go developer".to_string(),
                    "go engineer".to_string(),
                    "go".to_string(),
                    "application support engineer".to_string(),
                    "backend".to_string(),
                ],
                max_pages: 50,
                request_timeout_secs: 10,
                max_retries: 3,
            },
            telegram: TelegramConfig {
                enabled: true,
                api_base: "https://api.telegram.org".to_string(),
                bot_token: String::new(),
                chat_id: String::new(),
                message_delay_ms: 1000,
                max_retries: 3,
            },
            storage: StorageConfig {
                output_path: PathBuf::from("dice_jobs_list.csv"),
            },
            resume: ResumeConfig { path: None },
        }
    }
}

impl Config {
    /// Load the configuration from `path`, or from the default location when `None`.
    ///
    /// A missing file is created with defaults. Telegram credentials found in the
    /// environment take precedence over the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)
                .map_err(|e| ScoutError::Configuration(format!("Failed to parse config: {}", e)))?
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ScoutError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-scout")
            .join("config.toml")
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.telegram.bot_token = token.trim().to_string();
            }
        }
        if let Ok(chat_id) = std::env::var(CHAT_ID_ENV) {
            if !chat_id.trim().is_empty() {
                self.telegram.chat_id = chat_id.trim().to_string();
            }
        }
    }

    /// Check the pieces a full run depends on
    pub fn validate(&self) -> Result<()> {
        if self.search.url.trim().is_empty() {
            return Err(ScoutError::Configuration("search.url is empty".to_string()));
        }
        if self.telegram.enabled
            && (self.telegram.bot_token.is_empty() || self.telegram.chat_id.is_empty())
        {
            return Err(ScoutError::Configuration(format!(
                "telegram is enabled but bot_token/chat_id are missing (set them in the config or via {} and {})",
                TOKEN_ENV, CHAT_ID_ENV
            )));
        }
        Ok(())
    }
}
