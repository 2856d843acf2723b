use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::offering::ProviderOffering;
use crate::domain::request::RecommendationRequest;

/// Outcome of a single engine invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub request: RecommendationRequest,
    pub offering: ProviderOffering,
    /// True when no offering matched the requested segment and the full
    /// dataset was searched instead.
    pub fell_back: bool,
}

impl RecommendationResult {
    pub fn recommended_provider(&self) -> &str {
        &self.offering.provider
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecommendationId(pub String);

impl RecommendationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A result as handed to persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub id: RecommendationId,
    pub owner: Option<String>,
    pub result: RecommendationResult,
    pub created_at: DateTime<Utc>,
}

impl RecommendationRecord {
    pub fn new(result: RecommendationResult, owner: Option<String>) -> Self {
        Self { id: RecommendationId::generate(), owner, result, created_at: Utc::now() }
    }

    pub fn recommended_provider(&self) -> &str {
        self.result.recommended_provider()
    }

    pub fn provider_details(&self) -> Value {
        self.result.offering.to_details()
    }
}

impl fmt::Display for RecommendationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.result.request.name, self.recommended_provider())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{RecommendationRecord, RecommendationResult};
    use crate::domain::offering::{IndustrySegment, ProviderOffering};
    use crate::domain::request::RecommendationRequest;

    fn result() -> RecommendationResult {
        RecommendationResult {
            request: RecommendationRequest {
                name: "Northwind".to_owned(),
                segment: IndustrySegment::new("IT"),
                storage_gb: 100.0,
                requires_encryption: false,
                cpu_speed_ghz: 2.4,
                price_per_hour: 0.2,
                service_model_score: 2,
            },
            offering: ProviderOffering {
                segment: IndustrySegment::new("IT"),
                storage_gb: 128.0,
                supports_encryption: false,
                cpu_speed_ghz: 2.5,
                price_per_hour: 0.21,
                service_model_score: 2,
                provider: "DigitalOcean".to_owned(),
                attributes: BTreeMap::new(),
            },
            fell_back: false,
        }
    }

    #[test]
    fn new_records_get_distinct_ids() {
        let first = RecommendationRecord::new(result(), None);
        let second = RecommendationRecord::new(result(), None);

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn record_exposes_provider_and_details() {
        let record = RecommendationRecord::new(result(), Some("user-7".to_owned()));

        assert_eq!(record.recommended_provider(), "DigitalOcean");
        assert_eq!(record.provider_details()["Provider"], "DigitalOcean");
        assert_eq!(record.to_string(), "Northwind → DigitalOcean");
    }
}
