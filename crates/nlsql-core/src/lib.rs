pub mod config;
pub mod errors;
pub mod executor;
pub mod generator;
pub mod history;
pub mod model;
pub mod orchestrator;
pub mod prompt;
pub mod providers;
pub mod repairer;
pub mod report;
pub mod sample;
pub mod sanitize;
pub mod schema;

pub use errors::{ConfigError, ExecutionFailure, GenerationError, RepairExhausted};
pub use executor::StatementExecutor;
pub use generator::StatementGenerator;
pub use model::{Candidate, ExecutionOutcome, InteractionResult, Provenance};
pub use orchestrator::Orchestrator;
pub use repairer::StatementRepairer;
pub use schema::SchemaDescriptor;
