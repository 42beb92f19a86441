use super::{exit_codes, wants_json};
use crate::cli::args::{AskArgs, GlobalArgs};
use nlsql_core::config::AppConfig;
use nlsql_core::history::InteractionLog;
use nlsql_core::model::InteractionResult;
use nlsql_core::report::{self, console};
use std::path::Path;

pub async fn cmd_ask(g: &GlobalArgs, cfg: &AppConfig, args: AskArgs) -> anyhow::Result<i32> {
    let request = args.request.join(" ");
    let orchestrator = cfg.build_orchestrator()?;

    let result = orchestrator.handle(&request).await;
    print_result(g, &result)?;

    if let Some(path) = &cfg.history {
        let mut log = InteractionLog::with_file(Path::new(path))?;
        log.record(&request, &result)?;
    }

    Ok(exit_code(&result))
}

pub(crate) fn print_result(g: &GlobalArgs, result: &InteractionResult) -> anyhow::Result<()> {
    if wants_json(g) {
        println!("{}", report::render_json(result)?);
    } else {
        print!("{}", console::render_interaction(result));
    }
    Ok(())
}

pub(crate) fn exit_code(result: &InteractionResult) -> i32 {
    if result.is_success() {
        exit_codes::OK
    } else {
        exit_codes::REQUEST_FAILED
    }
}
