use async_trait::async_trait;
use thiserror::Error;

use cloudpick_core::domain::recommendation::{RecommendationId, RecommendationRecord};

pub mod memory;
pub mod recommendation;

pub use memory::InMemoryRecommendationRepository;
pub use recommendation::SqlRecommendationRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait RecommendationRepository: Send + Sync {
    /// Inserts the record, replacing any stored record with the same id.
    async fn save(&self, record: RecommendationRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(
        &self,
        id: &RecommendationId,
    ) -> Result<Option<RecommendationRecord>, RepositoryError>;

    /// Newest first; records saved in the same instant come back in reverse
    /// insertion order.
    async fn list_recent(&self, limit: u32) -> Result<Vec<RecommendationRecord>, RepositoryError>;

    /// Returns `false` when no record had that id.
    async fn delete(&self, id: &RecommendationId) -> Result<bool, RepositoryError>;
}
