pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::anthropic::AnthropicClient;
pub use crate::config::CalcConfig;
pub use crate::core::resolver::ResultResolver;
pub use crate::domain::model::{Resolution, Strategy, FAILURE_MARKER};
pub use crate::utils::error::{CalcError, Result};
