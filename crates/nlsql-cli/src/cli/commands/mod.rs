use super::args::*;
use super::logging::init_logging;
use nlsql_core::config::{load_or_default, AppConfig};

pub mod ask;
pub mod chat;
pub mod exec;
pub mod init;
pub mod schema;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const REQUEST_FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let g = cli.global;
    let cfg = match &cli.cmd {
        Command::Init(args) => {
            init_logging("info", &g.log_format);
            return init::cmd_init(&g, args.clone());
        }
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return Ok(exit_codes::OK);
        }
        _ => match load_effective_config(&g) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("config error: {:#}", e);
                return Ok(exit_codes::CONFIG_ERROR);
            }
        },
    };
    init_logging(&cfg.log_level, &g.log_format);
    tracing::debug!(event = "cli.config", database = %cfg.database, provider = ?cfg.provider.kind);

    match cli.cmd {
        Command::Ask(args) => ask::cmd_ask(&g, &cfg, args).await,
        Command::Chat(args) => chat::cmd_chat(&g, &cfg, args).await,
        Command::Exec(args) => exec::cmd_exec(&g, &cfg, args),
        Command::Schema(args) => schema::cmd_schema(&g, &cfg, args),
        Command::InitDb => init::cmd_init_db(&g, &cfg),
        Command::Init(_) | Command::Version => Ok(exit_codes::OK),
    }
}

/// Config file (or defaults), then environment, then `--db`.
fn load_effective_config(g: &GlobalArgs) -> anyhow::Result<AppConfig> {
    let mut cfg = load_or_default(&g.config, g.strict)?;
    cfg.apply_env()?;
    if let Some(db) = &g.db {
        cfg.database = db.to_string_lossy().to_string();
    }
    Ok(cfg)
}

pub(crate) fn wants_json(g: &GlobalArgs) -> bool {
    g.format == "json"
}
