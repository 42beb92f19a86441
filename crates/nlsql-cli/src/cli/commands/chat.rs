use super::ask::print_result;
use super::exit_codes;
use crate::cli::args::{ChatArgs, GlobalArgs};
use nlsql_core::config::AppConfig;
use nlsql_core::history::{InteractionLog, Role};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const HELP: &str = "Type a request in plain English. :history shows this session, :quit exits.";

/// Line-oriented session. Each request runs to completion before the next
/// line is read.
pub async fn cmd_chat(g: &GlobalArgs, cfg: &AppConfig, args: ChatArgs) -> anyhow::Result<i32> {
    let orchestrator = cfg.build_orchestrator()?;
    let history_path = args
        .history
        .or_else(|| cfg.history.as_ref().map(Into::into));
    let mut log = match &history_path {
        Some(p) => InteractionLog::with_file(p)?,
        None => InteractionLog::new(),
    };

    eprintln!("nlsql chat ({})", cfg.database);
    eprintln!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stderr = tokio::io::stderr();
    loop {
        stderr.write_all(b"> ").await?;
        stderr.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            ":quit" | ":q" | ":exit" => break,
            ":help" => {
                eprintln!("{}", HELP);
                continue;
            }
            ":history" => {
                for e in log.entries() {
                    let who = match e.role {
                        Role::User => "you",
                        Role::Assistant => "nlsql",
                    };
                    println!("[{}] {}: {}", e.at.format("%H:%M:%S"), who, e.content);
                }
                continue;
            }
            _ => {}
        }

        let result = orchestrator.handle(line).await;
        print_result(g, &result)?;
        log.record(line, &result)?;
    }

    Ok(exit_codes::OK)
}
