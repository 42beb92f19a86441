use super::{exit_codes, wants_json};
use crate::cli::args::{GlobalArgs, InitArgs};
use nlsql_core::config::{write_sample_config, AppConfig};
use nlsql_core::sample::seed_students;

pub fn cmd_init(g: &GlobalArgs, args: InitArgs) -> anyhow::Result<i32> {
    if g.config.exists() && !args.force {
        eprintln!(
            "config already exists: {} (use --force to overwrite)",
            g.config.display()
        );
        return Ok(exit_codes::CONFIG_ERROR);
    }
    write_sample_config(&g.config)?;
    eprintln!("wrote file: {}", g.config.display());
    Ok(exit_codes::OK)
}

pub fn cmd_init_db(g: &GlobalArgs, cfg: &AppConfig) -> anyhow::Result<i32> {
    let db = cfg.database_path();
    let rows = seed_students(&db)?;
    if wants_json(g) {
        println!(
            "{}",
            serde_json::json!({ "database": db.display().to_string(), "rows": rows })
        );
    } else {
        println!(
            "✅ Database '{}' created with sample data ({} rows).",
            db.display(),
            rows
        );
    }
    Ok(exit_codes::OK)
}
