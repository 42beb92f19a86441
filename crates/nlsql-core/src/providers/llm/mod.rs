use crate::model::LlmResponse;
use async_trait::async_trait;

/// A text-completion service: one system instruction, one user prompt,
/// one completion back.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> anyhow::Result<LlmResponse>;
    fn provider_name(&self) -> &'static str;
    fn model(&self) -> &str;
}

pub mod fake;
pub mod ollama;
pub mod openai;

pub use fake::FakeClient;
pub use ollama::OllamaClient;
pub use openai::OpenAIClient;
