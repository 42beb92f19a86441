//! Generate, execute, and on failure repair once.
//!
//! The repair cycle is a fixed second stage, not a loop: `handle` calls the
//! generator once, the executor at most twice and the repairer at most once.

use crate::errors::{ExecutionFailure, GenerationError, RepairExhausted};
use crate::executor::StatementExecutor;
use crate::generator::StatementGenerator;
use crate::model::{Candidate, ExecutionOutcome, InteractionResult};
use crate::providers::llm::LlmClient;
use crate::repairer::StatementRepairer;
use crate::sanitize::FenceStrategy;
use crate::schema::SchemaDescriptor;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Generating,
    Executing,
    Repairing,
    ReExecuting,
    Done,
    Failed,
}

pub struct Orchestrator {
    schema: Arc<SchemaDescriptor>,
    generator: StatementGenerator,
    repairer: StatementRepairer,
    executor: StatementExecutor,
    completion_timeout: Option<Duration>,
}

impl Orchestrator {
    pub fn new(
        client: Arc<dyn LlmClient>,
        executor: StatementExecutor,
        schema: SchemaDescriptor,
    ) -> Self {
        Self {
            schema: Arc::new(schema),
            generator: StatementGenerator::new(client.clone()),
            repairer: StatementRepairer::new(client),
            executor,
            completion_timeout: None,
        }
    }

    pub fn with_fence_strategy(mut self, fences: FenceStrategy) -> Self {
        self.generator = self.generator.with_fence_strategy(fences);
        self.repairer = self.repairer.with_fence_strategy(fences);
        self
    }

    /// Upper bound for each completion call. Expiry counts as a generation error.
    pub fn with_completion_timeout(mut self, t: Option<Duration>) -> Self {
        self.completion_timeout = t;
        self
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    pub fn executor(&self) -> &StatementExecutor {
        &self.executor
    }

    pub async fn handle(&self, request: &str) -> InteractionResult {
        let mut stage = Stage::Idle;
        advance(&mut stage, Stage::Generating);
        let sql = match self
            .bounded(self.generator.generate(request, &self.schema))
            .await
        {
            Ok(sql) => sql,
            Err(error) => {
                advance(&mut stage, Stage::Failed);
                tracing::warn!(event = "pipeline.generation_failed", error = %error);
                return InteractionResult::GenerationFailed { error };
            }
        };

        advance(&mut stage, Stage::Executing);
        let original = match self.run(Candidate::original(sql), &mut stage) {
            Ok(result) => return result,
            Err(failure) => failure,
        };
        tracing::warn!(
            event = "pipeline.execution_failed",
            sql = %original.sql,
            error = %original.message,
        );

        advance(&mut stage, Stage::Repairing);
        let fixed = match self
            .bounded(self.repairer.repair(
                request,
                &original.sql,
                &original.message,
                &self.schema,
            ))
            .await
        {
            Ok(sql) => sql,
            Err(repair) => {
                advance(&mut stage, Stage::Failed);
                tracing::warn!(event = "pipeline.repair_failed", error = %repair);
                return InteractionResult::Exhausted {
                    failure: RepairExhausted::RepairRejected { original, repair },
                };
            }
        };

        advance(&mut stage, Stage::ReExecuting);
        match self.run(Candidate::repaired(fixed, original.clone()), &mut stage) {
            Ok(result) => result,
            Err(after) => {
                // Terminal either way: no third attempt.
                advance(&mut stage, Stage::Done);
                tracing::warn!(
                    event = "pipeline.failed_after_repair",
                    sql = %after.sql,
                    error = %after.message,
                );
                InteractionResult::Exhausted {
                    failure: RepairExhausted::FailedAfterRepair { original, after },
                }
            }
        }
    }

    fn run(
        &self,
        candidate: Candidate,
        stage: &mut Stage,
    ) -> Result<InteractionResult, ExecutionFailure> {
        match self.executor.execute(&candidate.sql) {
            ExecutionOutcome::Rows { columns, rows } => {
                advance(stage, Stage::Done);
                Ok(InteractionResult::Rows {
                    candidate,
                    columns,
                    rows,
                })
            }
            ExecutionOutcome::Effect { rows_affected } => {
                advance(stage, Stage::Done);
                Ok(InteractionResult::Effect {
                    candidate,
                    rows_affected,
                })
            }
            ExecutionOutcome::Failure { message } => Err(ExecutionFailure {
                sql: candidate.sql,
                message,
            }),
        }
    }

    async fn bounded<F>(&self, call: F) -> Result<String, GenerationError>
    where
        F: Future<Output = Result<String, GenerationError>>,
    {
        match self.completion_timeout {
            None => call.await,
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(GenerationError::TimedOut {
                    millis: limit.as_millis() as u64,
                })),
        }
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    tracing::debug!(event = "pipeline.stage", from = ?*stage, stage = ?next);
    *stage = next;
}
