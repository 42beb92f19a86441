pub mod console;

use crate::model::InteractionResult;

pub fn render_json(result: &InteractionResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
