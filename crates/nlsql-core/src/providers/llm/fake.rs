use super::LlmClient;
use crate::model::LlmResponse;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted completions, handed out in order. Records every prompt it sees.
#[derive(Default)]
pub struct FakeClient {
    script: Mutex<VecDeque<String>>,
    seen: Mutex<Vec<(String, String)>>,
}

impl FakeClient {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(responses.into_iter().map(Into::into).collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Number of completions requested so far.
    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// `(system, prompt)` pairs in call order.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(&self, system: &str, prompt: &str) -> anyhow::Result<LlmResponse> {
        self.seen
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        let text = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("fake LLM script exhausted"))?;
        Ok(LlmResponse {
            text,
            provider: "fake".to_string(),
            model: "fake".to_string(),
            meta: serde_json::json!({}),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hands_out_script_in_order_then_errors() {
        let c = FakeClient::new(["SELECT 1", "SELECT 2"]);
        assert_eq!(c.complete("sys", "a").await.unwrap().text, "SELECT 1");
        assert_eq!(c.complete("sys", "b").await.unwrap().text, "SELECT 2");
        assert!(c.complete("sys", "c").await.is_err());
        assert_eq!(c.calls(), 3);
        assert_eq!(c.prompts()[1], ("sys".to_string(), "b".to_string()));
    }
}
