use super::{exit_codes, wants_json};
use crate::cli::args::{GlobalArgs, SchemaArgs};
use nlsql_core::config::AppConfig;
use nlsql_core::report::console;
use nlsql_core::schema::{list_tables, table_columns, TableInfo};

pub fn cmd_schema(g: &GlobalArgs, cfg: &AppConfig, args: SchemaArgs) -> anyhow::Result<i32> {
    let db = cfg.database_path();
    let names = match args.table {
        Some(t) => vec![t],
        None => list_tables(&db),
    };
    let tables: Vec<TableInfo> = names
        .into_iter()
        .filter(|n| !n.starts_with("sqlite_"))
        .map(|name| TableInfo {
            columns: table_columns(&db, &name),
            name,
        })
        .collect();

    if wants_json(g) {
        println!("{}", serde_json::to_string_pretty(&tables)?);
    } else {
        print!("{}", console::render_schema(&tables));
    }
    Ok(exit_codes::OK)
}
