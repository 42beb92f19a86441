use super::LlmClient;
use crate::model::LlmResponse;
use async_trait::async_trait;
use serde_json::json;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "mistral";

/// Local Ollama server, `/api/chat` with streaming disabled.
pub struct OllamaClient {
    pub model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    pub client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(model: String, base_url: String) -> Self {
        Self {
            model,
            base_url,
            temperature: None,
            client: reqwest::Client::new(),
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL.to_string(), DEFAULT_BASE_URL.to_string())
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, system: &str, prompt: &str) -> anyhow::Result<LlmResponse> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));

        let mut body = json!({
            "model": self.model,
            "stream": false,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
        });
        if let Some(t) = self.temperature {
            body["options"] = json!({ "temperature": t });
        }

        let resp = self.client.post(&url).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Ollama chat API error ({}): {}", status, error_text);
        }

        let json: serde_json::Value = resp.json().await?;

        let text = json
            .pointer("/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Ollama response missing message.content"))?
            .to_string();

        Ok(LlmResponse {
            text,
            provider: "ollama".to_string(),
            model: self.model.clone(),
            meta: json!({
                "total_duration": json.get("total_duration"),
                "eval_count": json.get("eval_count"),
            }),
        })
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
