use crate::domain::model::Strategy;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_TOKENS_LIMIT: u32 = 8192;

pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_MODEL: &str = "ANTHROPIC_MODEL";
pub const ENV_BASE_URL: &str = "ANTHROPIC_BASE_URL";
pub const ENV_MAX_TOKENS: &str = "LLM_CALC_MAX_TOKENS";
pub const ENV_TIMEOUT_SECONDS: &str = "LLM_CALC_TIMEOUT_SECONDS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalcConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl CalcConfig {
    /// 從環境變數載入配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 從任意 key/value 來源載入配置，未設定的項目使用預設值
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut api = ApiConfig {
            key: lookup(ENV_API_KEY),
            ..ApiConfig::default()
        };

        if let Some(model) = lookup(ENV_MODEL) {
            api.model = model;
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            api.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_MAX_TOKENS) {
            api.max_tokens = parse_number(ENV_MAX_TOKENS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECONDS) {
            api.timeout_seconds = parse_number(ENV_TIMEOUT_SECONDS, &raw)?;
        }

        Ok(Self { api })
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CalcError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CalcError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ANTHROPIC_API_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CalcError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 空白或未替換的 `${...}` 視為未設定
    pub fn api_key(&self) -> Option<&str> {
        self.api
            .key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !(key.starts_with("${") && key.ends_with('}')))
    }

    pub fn strategy(&self) -> Strategy {
        if self.api_key().is_some() {
            Strategy::Remote
        } else {
            Strategy::Local
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_non_empty_string("api.model", &self.api.model)?;
        validation::validate_range("api.max_tokens", self.api.max_tokens, 1, MAX_TOKENS_LIMIT)?;
        validation::validate_positive_number(
            "api.timeout_seconds",
            self.api.timeout_seconds,
            1,
        )?;
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| CalcError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

impl ConfigProvider for CalcConfig {
    fn api_key(&self) -> Option<&str> {
        CalcConfig::api_key(self)
    }

    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn model(&self) -> &str {
        &self.api.model
    }

    fn max_tokens(&self) -> u32 {
        self.api.max_tokens
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }
}

impl Validate for CalcConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
