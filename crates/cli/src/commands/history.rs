use cloudpick_core::config::ConfigOverrides;
use cloudpick_core::errors::ApplicationError;
use cloudpick_db::{RecommendationRepository, SqlRecommendationRepository};
use serde_json::{json, Value};

use crate::commands::{
    application_failure, build_runtime, load_config, new_correlation_id, open_database,
    CommandResult,
};

const COMMAND: &str = "history";
pub const DEFAULT_LIMIT: u32 = 20;

pub fn run(limit: u32) -> CommandResult {
    execute(limit).unwrap_or_else(|failure| failure)
}

fn execute(limit: u32) -> Result<CommandResult, CommandResult> {
    let config = load_config(COMMAND, ConfigOverrides::default())?;
    let correlation_id = new_correlation_id();
    let runtime = build_runtime(COMMAND)?;

    let records = runtime.block_on(async {
        let pool = open_database(COMMAND, &config).await?;
        let listed = SqlRecommendationRepository::new(pool.clone())
            .list_recent(limit)
            .await
            .map_err(|error| {
                application_failure(
                    COMMAND,
                    ApplicationError::Persistence(error.to_string()),
                    &correlation_id,
                )
            });
        pool.close().await;
        listed
    })?;

    let entries: Vec<Value> = records
        .iter()
        .map(|record| {
            json!({
                "id": record.id.to_string(),
                "name": record.result.request.name,
                "segment": record.result.request.segment,
                "provider": record.recommended_provider(),
                "fell_back": record.result.fell_back,
                "owner": record.owner,
                "created_at": record.created_at,
            })
        })
        .collect();

    Ok(CommandResult::success_with_data(
        COMMAND,
        format!("{} stored recommendation(s)", entries.len()),
        Value::Array(entries),
    ))
}
