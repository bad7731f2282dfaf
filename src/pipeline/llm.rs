use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// The external reasoning oracle. One prompt in, one raw text response out;
/// no retries. Stubbed in tests.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn invoke(&self, prompt: &str) -> anyhow::Result<String>;
}

/// OpenRouter chat-completions client. Temperature stays at 0 so the
/// response format varies as little as possible for the decoder.
pub struct OpenRouterClient {
    http: Client,
    api_key: String,
    model: String,
    temperature: f64,
}

impl OpenRouterClient {
    /// Reads the API credential from the environment. Absence is a
    /// configuration error raised here, before any call is attempted.
    pub fn from_env(model: &str, temperature: f64) -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| anyhow!("OPENROUTER_API_KEY environment variable not set"))?;
        Ok(Self {
            http: Client::new(),
            api_key,
            model: model.to_string(),
            temperature,
        })
    }
}

#[async_trait]
impl ModelClient for OpenRouterClient {
    async fn invoke(&self, prompt: &str) -> anyhow::Result<String> {
        let payload = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        let response = self
            .http
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("LLM API request failed: {}", response.status()));
        }

        let response_json: Value = response.json().await?;
        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("Invalid response format from LLM"))?;

        info!("Model returned {} characters", content.len());
        Ok(content.to_string())
    }
}
