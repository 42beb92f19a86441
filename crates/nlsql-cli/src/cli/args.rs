use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "nlsql",
    version,
    about = "Ask a SQLite database questions in plain English"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    #[arg(long, global = true, env = "NLSQL_CONFIG", default_value = "nlsql.yaml")]
    pub config: PathBuf,

    /// Database file (overrides config and NLSQL_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Output format: text|json
    #[arg(long, global = true, default_value = "text")]
    pub format: String,

    /// Log format on stderr: text|json
    #[arg(long, global = true, default_value = "text")]
    pub log_format: String,

    /// Reject unknown config keys
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Translate one request to SQL and run it
    Ask(AskArgs),
    /// Interactive session, one request per line
    Chat(ChatArgs),
    /// Run a SQL statement directly, without the model
    Exec(ExecArgs),
    /// Show tables and columns
    Schema(SchemaArgs),
    /// Create the sample students database
    InitDb,
    /// Write a sample config file
    Init(InitArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AskArgs {
    /// The request, e.g. "show students from chennai with cgpa above 8"
    #[arg(required = true, num_args = 1..)]
    pub request: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ChatArgs {
    /// Append the conversation to this JSONL file (overrides config)
    #[arg(long)]
    pub history: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExecArgs {
    pub sql: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Only this table
    #[arg(long)]
    pub table: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}
