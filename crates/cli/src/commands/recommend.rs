use std::path::PathBuf;

use clap::Args;
use cloudpick_core::config::ConfigOverrides;
use cloudpick_core::dataset::load_offerings_from_path;
use cloudpick_core::domain::offering::IndustrySegment;
use cloudpick_core::domain::recommendation::RecommendationRecord;
use cloudpick_core::domain::request::{
    RecommendationRequest, MAX_SERVICE_MODEL_SCORE, MIN_SERVICE_MODEL_SCORE,
};
use cloudpick_core::engine::{NearestNeighborEngine, RecommendationEngine};
use cloudpick_core::errors::{ApplicationError, RecommendationError};
use cloudpick_db::{RecommendationRepository, SqlRecommendationRepository};
use serde_json::json;
use tracing::info;

use crate::commands::{
    application_failure, build_runtime, load_config, new_correlation_id, open_database,
    CommandResult,
};

const COMMAND: &str = "recommend";

#[derive(Debug, Clone, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "Requester name recorded with the recommendation")]
    pub name: String,
    #[arg(long, help = "Industry segment, e.g. IT, Education, Bank, Medical, Telecom, Other")]
    pub segment: String,
    #[arg(long, allow_hyphen_values = true, help = "Storage needs in GB")]
    pub storage: f64,
    #[arg(long, help = "Require encryption support")]
    pub encryption: bool,
    #[arg(long, allow_hyphen_values = true, help = "Minimum CPU speed in GHz")]
    pub cpu: f64,
    #[arg(long, allow_hyphen_values = true, help = "Budget in dollars per hour")]
    pub price: f64,
    #[arg(long, allow_hyphen_values = true, help = "Service-model score from 1 to 5")]
    pub score: i64,
    #[arg(long, help = "Reference dataset CSV; overrides dataset.path")]
    pub dataset: Option<PathBuf>,
    #[arg(long, help = "Free-form owner reference stored with the record")]
    pub owner: Option<String>,
    #[arg(long, help = "Print the recommendation without storing it")]
    pub no_save: bool,
}

impl RecommendArgs {
    fn to_request(&self) -> Result<RecommendationRequest, RecommendationError> {
        let service_model_score = u8::try_from(self.score).map_err(|_| {
            RecommendationError::invalid(
                "service_model_score",
                format!(
                    "must be between {MIN_SERVICE_MODEL_SCORE} and {MAX_SERVICE_MODEL_SCORE}, \
                     got {}",
                    self.score
                ),
            )
        })?;

        Ok(RecommendationRequest {
            name: self.name.clone(),
            segment: IndustrySegment::new(self.segment.trim()),
            storage_gb: self.storage,
            requires_encryption: self.encryption,
            cpu_speed_ghz: self.cpu,
            price_per_hour: self.price,
            service_model_score,
        })
    }
}

pub fn run(args: RecommendArgs) -> CommandResult {
    execute(args).unwrap_or_else(|failure| failure)
}

fn execute(args: RecommendArgs) -> Result<CommandResult, CommandResult> {
    let overrides =
        ConfigOverrides { dataset_path: args.dataset.clone(), ..ConfigOverrides::default() };
    let config = load_config(COMMAND, overrides)?;
    let correlation_id = new_correlation_id();
    let request = args
        .to_request()
        .map_err(|error| application_failure(COMMAND, error.into(), &correlation_id))?;

    if config.engine.strict_segments && !request.segment.is_known() {
        let error = RecommendationError::invalid(
            "segment",
            format!(
                "`{}` is not one of {}",
                request.segment,
                IndustrySegment::KNOWN.join(", ")
            ),
        );
        return Err(application_failure(COMMAND, error.into(), &correlation_id));
    }

    let dataset_path = &config.dataset.path;
    let offerings = load_offerings_from_path(dataset_path).map_err(|error| {
        let error = ApplicationError::Dataset(format!("{}: {error}", dataset_path.display()));
        application_failure(COMMAND, error, &correlation_id)
    })?;

    let result = NearestNeighborEngine
        .recommend(&offerings, &request)
        .map_err(|error| application_failure(COMMAND, error.into(), &correlation_id))?;
    let record = RecommendationRecord::new(result, args.owner.clone());

    if !args.no_save {
        let runtime = build_runtime(COMMAND)?;
        runtime.block_on(async {
            let pool = open_database(COMMAND, &config).await?;
            let repository = SqlRecommendationRepository::new(pool.clone());
            let saved = repository.save(record.clone()).await.map_err(|error| {
                application_failure(
                    COMMAND,
                    ApplicationError::Persistence(error.to_string()),
                    &correlation_id,
                )
            });
            pool.close().await;
            saved
        })?;
    }

    info!(
        event_name = "cli.recommend.completed",
        correlation_id = %correlation_id,
        recommendation_id = %record.id,
        segment = %record.result.request.segment,
        provider = record.recommended_provider(),
        fell_back = record.result.fell_back,
        saved = !args.no_save,
        "recommendation produced"
    );

    let mut message =
        format!("recommended {} for {}", record.recommended_provider(), record.result.request.name);
    if record.result.fell_back {
        message.push_str(&format!(
            "; no offerings matched segment `{}`, so the full dataset was searched",
            record.result.request.segment
        ));
    }

    let stored_id = (!args.no_save).then(|| record.id.to_string());
    let data = json!({
        "id": stored_id,
        "provider": record.recommended_provider(),
        "fell_back": record.result.fell_back,
        "saved": !args.no_save,
        "provider_details": record.provider_details(),
    });

    Ok(CommandResult::success_with_data(COMMAND, message, data))
}
