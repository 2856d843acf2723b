use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use tracing::debug;

use cloudpick_core::domain::offering::{IndustrySegment, ProviderOffering};
use cloudpick_core::domain::recommendation::{
    RecommendationId, RecommendationRecord, RecommendationResult,
};
use cloudpick_core::domain::request::RecommendationRequest;

use super::{RecommendationRepository, RepositoryError};
use crate::DbPool;

const SELECT_COLUMNS: &str = "SELECT id, owner, requester_name, activity_field, storage_needs,
        requires_encryption, cpu_speed, price_per_hour, service_model_score,
        offering_json, fell_back, created_at
 FROM recommendation";

pub struct SqlRecommendationRepository {
    pool: DbPool,
}

impl SqlRecommendationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Fixed-width UTC timestamps so text ordering matches time ordering.
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode<T>(result: Result<T, sqlx::Error>) -> Result<T, RepositoryError> {
    result.map_err(|e| RepositoryError::Decode(e.to_string()))
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<RecommendationRecord, RepositoryError> {
    let id: String = decode(row.try_get("id"))?;
    let owner: Option<String> = decode(row.try_get("owner"))?;
    let requester_name: String = decode(row.try_get("requester_name"))?;
    let activity_field: String = decode(row.try_get("activity_field"))?;
    let storage_needs: f64 = decode(row.try_get("storage_needs"))?;
    let requires_encryption: bool = decode(row.try_get("requires_encryption"))?;
    let cpu_speed: f64 = decode(row.try_get("cpu_speed"))?;
    let price_per_hour: f64 = decode(row.try_get("price_per_hour"))?;
    let score: i64 = decode(row.try_get("service_model_score"))?;
    let offering_json: String = decode(row.try_get("offering_json"))?;
    let fell_back: bool = decode(row.try_get("fell_back"))?;
    let created_at_str: String = decode(row.try_get("created_at"))?;

    let service_model_score = u8::try_from(score).map_err(|_| {
        RepositoryError::Decode(format!("service_model_score out of range: {score}"))
    })?;
    let offering: ProviderOffering = serde_json::from_str(&offering_json)
        .map_err(|e| RepositoryError::Decode(format!("offering_json: {e}")))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("created_at `{created_at_str}`: {e}")))?;

    Ok(RecommendationRecord {
        id: RecommendationId(id),
        owner,
        result: RecommendationResult {
            request: RecommendationRequest {
                name: requester_name,
                segment: IndustrySegment::new(activity_field),
                storage_gb: storage_needs,
                requires_encryption,
                cpu_speed_ghz: cpu_speed,
                price_per_hour,
                service_model_score,
            },
            offering,
            fell_back,
        },
        created_at,
    })
}

#[async_trait::async_trait]
impl RecommendationRepository for SqlRecommendationRepository {
    async fn save(&self, record: RecommendationRecord) -> Result<(), RepositoryError> {
        let offering_json = serde_json::to_string(&record.result.offering)
            .map_err(|e| RepositoryError::Encode(e.to_string()))?;
        let provider_details = record.provider_details().to_string();
        let request = &record.result.request;

        sqlx::query(
            "INSERT INTO recommendation (id, owner, requester_name, activity_field, storage_needs,
                                         requires_encryption, cpu_speed, price_per_hour,
                                         service_model_score, recommended_provider,
                                         provider_details, offering_json, fell_back, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 owner = excluded.owner,
                 requester_name = excluded.requester_name,
                 activity_field = excluded.activity_field,
                 storage_needs = excluded.storage_needs,
                 requires_encryption = excluded.requires_encryption,
                 cpu_speed = excluded.cpu_speed,
                 price_per_hour = excluded.price_per_hour,
                 service_model_score = excluded.service_model_score,
                 recommended_provider = excluded.recommended_provider,
                 provider_details = excluded.provider_details,
                 offering_json = excluded.offering_json,
                 fell_back = excluded.fell_back,
                 created_at = excluded.created_at",
        )
        .bind(&record.id.0)
        .bind(&record.owner)
        .bind(&request.name)
        .bind(request.segment.as_str())
        .bind(request.storage_gb)
        .bind(request.requires_encryption)
        .bind(request.cpu_speed_ghz)
        .bind(request.price_per_hour)
        .bind(i64::from(request.service_model_score))
        .bind(record.recommended_provider())
        .bind(&provider_details)
        .bind(&offering_json)
        .bind(record.result.fell_back)
        .bind(format_timestamp(&record.created_at))
        .execute(&self.pool)
        .await?;

        debug!(
            event_name = "db.recommendation.saved",
            recommendation_id = %record.id,
            provider = record.recommended_provider(),
            "recommendation stored"
        );
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &RecommendationId,
    ) -> Result<Option<RecommendationRecord>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_record(r)?)),
            None => Ok(None),
        }
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<RecommendationRecord>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC LIMIT ?"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_record).collect()
    }

    async fn delete(&self, id: &RecommendationId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM recommendation WHERE id = ?")
            .bind(&id.0)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(
            event_name = "db.recommendation.deleted",
            recommendation_id = %id,
            deleted,
            "recommendation delete executed"
        );
        Ok(deleted)
    }
}
