use tokio::sync::RwLock;

use cloudpick_core::domain::recommendation::{RecommendationId, RecommendationRecord};

use super::{RecommendationRepository, RepositoryError};

/// Keeps records in insertion order.
#[derive(Default)]
pub struct InMemoryRecommendationRepository {
    records: RwLock<Vec<RecommendationRecord>>,
}

#[async_trait::async_trait]
impl RecommendationRepository for InMemoryRecommendationRepository {
    async fn save(&self, record: RecommendationRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &RecommendationId,
    ) -> Result<Option<RecommendationRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| &record.id == id).cloned())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<RecommendationRecord>, RepositoryError> {
        let records = self.records.read().await;
        let mut recent: Vec<RecommendationRecord> = records.iter().rev().cloned().collect();
        recent.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        recent.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(recent)
    }

    async fn delete(&self, id: &RecommendationId) -> Result<bool, RepositoryError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| &record.id != id);
        Ok(records.len() != before)
    }
}
