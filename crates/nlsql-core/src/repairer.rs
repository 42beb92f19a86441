use crate::errors::GenerationError;
use crate::prompt;
use crate::providers::llm::LlmClient;
use crate::sanitize::{extract_statement, FenceStrategy};
use crate::schema::SchemaDescriptor;
use std::sync::Arc;

/// Asks the model to correct a statement the database rejected.
///
/// Same cleaning and validation as [`crate::generator::StatementGenerator`];
/// only the prompt differs.
#[derive(Clone)]
pub struct StatementRepairer {
    client: Arc<dyn LlmClient>,
    fences: FenceStrategy,
}

impl StatementRepairer {
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

    pub async fn repair(
        &self,
        original_request: &str,
        failed_sql: &str,
        error_message: &str,
        schema: &SchemaDescriptor,
    ) -> Result<String, GenerationError> {
        let prompt =
            prompt::repair_prompt(original_request.trim(), failed_sql, error_message, schema);
        let resp = self
            .client
            .complete(prompt::REPAIR_SYSTEM, &prompt)
            .await
            .map_err(GenerationError::provider)?;

        tracing::debug!(
            event = "repairer.completion",
            provider = self.client.provider_name(),
            model = %resp.model,
            raw = %resp.text,
        );

        extract_statement(&resp.text, self.fences)
    }
}
