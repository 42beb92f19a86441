use nlsql_core::providers::llm::FakeClient;
use nlsql_core::sample::seed_students;
use nlsql_core::{InteractionResult, Orchestrator, SchemaDescriptor, StatementExecutor};
use std::sync::{Arc, Mutex};

struct MockWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run one request with a JSON subscriber installed; return the result and the log text.
async fn handle_logged(script: &[&str], request: &str) -> (InteractionResult, String) {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("students.db");
    seed_students(&db).unwrap();

    let buffer = Arc::new(Mutex::new(Vec::new()));
    let buffer_clone = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || MockWriter(buffer_clone.clone()))
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let orch = Orchestrator::new(
        Arc::new(FakeClient::new(script.iter().copied())),
        StatementExecutor::new(db),
        SchemaDescriptor::students(),
    );
    let res = orch.handle(request).await;
    let output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    (res, output)
}

#[tokio::test]
async fn execution_failure_emits_structured_warning() {
    let (res, output) =
        handle_logged(&["SELECT nme FROM students", "SELECT name FROM students"], "names").await;
    assert!(res.is_success());

    assert!(output.contains("\"event\":\"pipeline.execution_failed\""));
    assert!(output.contains("no such column: nme"));
    assert!(output.contains("\"from\":\"Idle\",\"stage\":\"Generating\""));
    assert!(output.contains("\"stage\":\"Repairing\""));
    assert!(output.contains("\"from\":\"ReExecuting\",\"stage\":\"Done\""));
}

#[tokio::test]
async fn failure_after_repair_still_reaches_done() {
    let (res, output) =
        handle_logged(&["SELECT agee FROM students", "SELECT age FROM students"], "ages").await;
    assert!(!res.is_success());

    assert!(output.contains("\"event\":\"pipeline.failed_after_repair\""));
    assert!(output.contains("\"from\":\"ReExecuting\",\"stage\":\"Done\""));
    assert!(!output.contains("\"stage\":\"Failed\""));
}
