use cloudpick_core::config::ConfigOverrides;
use cloudpick_core::domain::recommendation::RecommendationId;
use cloudpick_core::errors::ApplicationError;
use cloudpick_db::{RecommendationRepository, SqlRecommendationRepository};
use tracing::info;

use crate::commands::{
    application_failure, build_runtime, load_config, new_correlation_id, open_database,
    CommandResult, EXIT_NOT_FOUND,
};

const COMMAND: &str = "delete";

pub fn run(id: &str) -> CommandResult {
    execute(id).unwrap_or_else(|failure| failure)
}

fn execute(id: &str) -> Result<CommandResult, CommandResult> {
    let config = load_config(COMMAND, ConfigOverrides::default())?;
    let correlation_id = new_correlation_id();
    let runtime = build_runtime(COMMAND)?;
    let id = RecommendationId(id.trim().to_string());

    let deleted = runtime.block_on(async {
        let pool = open_database(COMMAND, &config).await?;
        let deleted = SqlRecommendationRepository::new(pool.clone()).delete(&id).await.map_err(
            |error| {
                application_failure(
                    COMMAND,
                    ApplicationError::Persistence(error.to_string()),
                    &correlation_id,
                )
            },
        );
        pool.close().await;
        deleted
    })?;

    if !deleted {
        return Err(CommandResult::failure(
            COMMAND,
            "not_found",
            format!("no recommendation with id `{id}`"),
            EXIT_NOT_FOUND,
        ));
    }

    info!(
        event_name = "cli.delete.completed",
        correlation_id = %correlation_id,
        recommendation_id = %id,
        "recommendation deleted"
    );
    Ok(CommandResult::success(COMMAND, format!("deleted recommendation `{id}`")))
}
