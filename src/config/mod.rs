use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use directories::ProjectDirs;

use crate::core::services::endpoints::{CircleSearchOptions, Endpoints};
use crate::core::services::transport::DEFAULT_USER_AGENT;
use crate::error::{ConfigError, Result, TdbError};

pub mod env;
pub mod validation;

use env::{EnvParser, EnvVars};
use validation::ConfigValidator;

fn default_touhoudb_url() -> String {
    "https://touhoudb.com/".to_string()
}

fn default_wiki_api_url() -> String {
    "https://en.touhouwiki.net/api.php".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_include_lyrics() -> bool {
    true
}

fn validate_touhoudb_url(url: &str) -> Result<()> {
    ConfigValidator::validate_url(url, "TouhouDB")
}

fn validate_wiki_api_url(url: &str) -> Result<()> {
    ConfigValidator::validate_url(url, "wiki API")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// TouhouDB instance URL
    #[serde(default = "default_touhoudb_url")]
    pub touhoudb_url: String,

    /// Touhou Wiki MediaWiki API endpoint
    #[serde(default = "default_wiki_api_url")]
    pub wiki_api_url: String,

    /// User-Agent sent to both services
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Look up wiki lyrics for fetched songs
    #[serde(default = "default_include_lyrics")]
    pub include_lyrics: bool,

    /// Options sent with circle searches
    #[serde(default)]
    pub circle_search: CircleSearchOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            touhoudb_url: default_touhoudb_url(),
            wiki_api_url: default_wiki_api_url(),
            user_agent: default_user_agent(),
            request_timeout_seconds: default_request_timeout_seconds(),
            include_lyrics: default_include_lyrics(),
            circle_search: CircleSearchOptions::default(),
        }
    }
}

impl Config {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Pick up a .env file during development
        dotenvy::dotenv().ok();

        let config_file = match config_path {
            Some(path) => PathBuf::from(path),
            None => Self::default_config_path()?,
        };

        let mut config = Self::from_file_or_default(&config_file)?;

        // Environment variables take precedence over the file
        config.load_from_env()?;
        config.validate()?;

        // Save config file if it doesn't exist
        if !config_file.exists() {
            if let Some(parent) = config_file.parent() {
                fs::create_dir_all(parent)?;
            }
            config.save(&config_file)?;
        }

        Ok(config)
    }

    fn from_file_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply `TOUHOUDB_*` environment overrides
    fn load_from_env(&mut self) -> Result<()> {
        if let Some(url) = EnvParser::parse_string(EnvVars::TOUHOUDB_URL, Some(validate_touhoudb_url))? {
            self.touhoudb_url = url;
        }

        if let Some(url) = EnvParser::parse_string(EnvVars::WIKI_API_URL, Some(validate_wiki_api_url))? {
            self.wiki_api_url = url;
        }

        if let Some(user_agent) = EnvParser::parse_string(EnvVars::USER_AGENT, None)? {
            self.user_agent = user_agent;
        }

        if let Some(timeout) = EnvParser::parse_u64(EnvVars::REQUEST_TIMEOUT_SECONDS, 1, 300)? {
            self.request_timeout_seconds = timeout;
        }

        if let Some(include) = EnvParser::parse_bool(EnvVars::INCLUDE_LYRICS)? {
            self.include_lyrics = include;
        }

        if let Some(max_results) = EnvParser::parse_u64(EnvVars::CIRCLE_SEARCH_MAX_RESULTS, 1, 100)? {
            self.circle_search.max_results = max_results as u32;
        }

        if let Some(allow) = EnvParser::parse_bool(EnvVars::ALLOW_BASE_VOICEBANKS)? {
            self.circle_search.allow_base_voicebanks = allow;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_touhoudb_url(&self.touhoudb_url)?;
        validate_wiki_api_url(&self.wiki_api_url)?;
        ConfigValidator::validate_range(self.request_timeout_seconds, 1, 300, "request_timeout_seconds")?;
        ConfigValidator::validate_range(self.circle_search.max_results, 1, 100, "circle_search.max_results")?;

        if self.user_agent.trim().is_empty() {
            return Err(TdbError::Validation("user_agent must not be empty".to_string()));
        }

        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn default_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "touhoudb", "touhoudb-cli").ok_or(ConfigError::ProjectDirs)?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Self::default_config_path()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        let endpoints = Endpoints::parse(&self.touhoudb_url, &self.wiki_api_url)
            .map_err(|e| TdbError::Validation(format!("Invalid service URL: {}", e)))?;
        Ok(endpoints.with_circle_search(self.circle_search.clone()))
    }

    /// Value of a single key, for `config get`
    pub fn get_value(&self, key: &str) -> Option<String> {
        let value = match key {
            "touhoudb_url" => self.touhoudb_url.clone(),
            "wiki_api_url" => self.wiki_api_url.clone(),
            "user_agent" => self.user_agent.clone(),
            "request_timeout_seconds" => self.request_timeout_seconds.to_string(),
            "include_lyrics" => self.include_lyrics.to_string(),
            "circle_search.allow_base_voicebanks" => self.circle_search.allow_base_voicebanks.to_string(),
            "circle_search.child_tags" => self.circle_search.child_tags.to_string(),
            "circle_search.start" => self.circle_search.start.to_string(),
            "circle_search.max_results" => self.circle_search.max_results.to_string(),
            "circle_search.get_total_count" => self.circle_search.get_total_count.to_string(),
            _ => return None,
        };
        Some(value)
    }

    pub fn keys() -> &'static [&'static str] {
        &[
            "touhoudb_url",
            "wiki_api_url",
            "user_agent",
            "request_timeout_seconds",
            "include_lyrics",
            "circle_search.allow_base_voicebanks",
            "circle_search.child_tags",
            "circle_search.start",
            "circle_search.max_results",
            "circle_search.get_total_count",
        ]
    }
}
