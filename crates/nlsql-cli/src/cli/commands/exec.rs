use super::{exit_codes, wants_json};
use crate::cli::args::{ExecArgs, GlobalArgs};
use nlsql_core::config::AppConfig;
use nlsql_core::model::ExecutionOutcome;
use nlsql_core::report::console;
use nlsql_core::StatementExecutor;

pub fn cmd_exec(g: &GlobalArgs, cfg: &AppConfig, args: ExecArgs) -> anyhow::Result<i32> {
    let executor = StatementExecutor::new(cfg.database_path());
    let outcome = executor.execute(&args.sql);

    if wants_json(g) {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", console::render_outcome(args.sql.trim(), &outcome));
    }

    Ok(match outcome {
        ExecutionOutcome::Failure { .. } => exit_codes::REQUEST_FAILED,
        _ => exit_codes::OK,
    })
}
