use crate::domain::ports::{ConfigProvider, TextGenerator};
use crate::utils::error::{CalcError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";
const MESSAGES_PATH: &str = "/v1/messages";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic Messages API 客戶端
pub struct AnthropicClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    /// 沒有設定 API key 時回傳 `None`，呼叫端應改走本地計算
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key() else {
            tracing::info!("No ANTHROPIC_API_KEY configured, using local evaluation only");
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CalcError::ConfigError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Some(Self {
            client,
            endpoint: format!(
                "{}{}",
                config.api_base_url().trim_end_matches('/'),
                MESSAGES_PATH
            ),
            api_key: api_key.to_string(),
            model: config.model().to_string(),
            max_tokens: config.max_tokens(),
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!("Making API request to: {} (model {})", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CalcError::RemoteCallFailed {
                reason: format!("HTTP {}: {}", status, detail.chars().take(200).collect::<String>()),
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| CalcError::RemoteCallFailed {
                reason: "response contained no text content".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalcConfig;

    #[test]
    fn test_no_key_means_no_client() {
        let config = CalcConfig::default();
        assert!(AnthropicClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let mut config = CalcConfig::default();
        config.api.key = Some("sk-test".to_string());
        config.api.base_url = "http://localhost:9999/".to_string();

        let client = AnthropicClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.endpoint, "http://localhost:9999/v1/messages");
        assert_eq!(client.model(), "claude-3-haiku-20240307");
    }

    #[test]
    fn test_request_body_shape() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 16,
            messages: [Message {
                role: "user",
                content: "What is 1+1?",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "m",
                "max_tokens": 16,
                "messages": [{"role": "user", "content": "What is 1+1?"}]
            })
        );
    }
}
