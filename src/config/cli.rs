use crate::config::toml_config::CalcConfig;
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "llm-calc")]
#[command(about = "A calculator that asks a language model, with local evaluation as fallback")]
pub struct CliConfig {
    /// Expression to calculate; starts an interactive session when omitted
    #[arg(allow_hyphen_values = true)]
    pub expression: Vec<String>,

    #[arg(long, help = "TOML config file with an [api] section")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Never call the model API")]
    pub local_only: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 單次計算的運算式；沒有參數時回傳 `None`
    pub fn expression(&self) -> Option<String> {
        if self.expression.is_empty() {
            None
        } else {
            Some(self.expression.join(" "))
        }
    }

    /// 載入配置檔（或環境變數），再套用命令列覆寫
    pub fn load_calc_config(&self) -> Result<CalcConfig> {
        let mut config = match &self.config {
            Some(path) => CalcConfig::from_file(path)?,
            None => CalcConfig::from_env()?,
        };

        if let Some(model) = &self.model {
            config.api.model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.api.max_tokens = max_tokens;
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            config.api.timeout_seconds = timeout_seconds;
        }
        if self.local_only {
            config.api.key = None;
        }

        Ok(config)
    }
}
