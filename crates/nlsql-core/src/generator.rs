use crate::errors::GenerationError;
use crate::prompt;
use crate::providers::llm::LlmClient;
use crate::sanitize::{extract_statement, FenceStrategy};
use crate::schema::SchemaDescriptor;
use std::sync::Arc;

/// Natural-language request in, one shape-checked SQL statement out.
#[derive(Clone)]
pub struct StatementGenerator {
    client: Arc<dyn LlmClient>,
    fences: FenceStrategy,
}

impl StatementGenerator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            fences: FenceStrategy::default(),
        }
    }

    pub fn with_fence_strategy(mut self, fences: FenceStrategy) -> Self {
        self.fences = fences;
        self
    }

    pub async fn generate(
        &self,
        request: &str,
        schema: &SchemaDescriptor,
    ) -> Result<String, GenerationError> {
        let request = request.trim();
        if request.is_empty() {
            return Err(GenerationError::EmptyRequest);
        }

        let prompt = prompt::generation_prompt(request, schema);
        let resp = self
            .client
            .complete(prompt::GENERATE_SYSTEM, &prompt)
            .await
            .map_err(GenerationError::provider)?;

        tracing::debug!(
            event = "generator.completion",
            provider = self.client.provider_name(),
            model = %resp.model,
            raw = %resp.text,
        );

        extract_statement(&resp.text, self.fences)
    }
}
