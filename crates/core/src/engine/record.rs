use crate::domain::offering::ProviderOffering;
use crate::domain::recommendation::RecommendationResult;
use crate::domain::request::RecommendationRequest;

pub fn build(
    request: RecommendationRequest,
    fell_back: bool,
    offering: ProviderOffering,
) -> RecommendationResult {
    RecommendationResult { request, offering, fell_back }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::build;
    use crate::domain::offering::{IndustrySegment, ProviderOffering};
    use crate::domain::request::RecommendationRequest;

    #[test]
    fn assembles_inputs_without_altering_them() {
        let request = RecommendationRequest {
            name: "Contoso".to_owned(),
            segment: IndustrySegment::new("Telecom"),
            storage_gb: 800.0,
            requires_encryption: true,
            cpu_speed_ghz: 3.4,
            price_per_hour: 1.2,
            service_model_score: 5,
        };
        let offering = ProviderOffering {
            segment: IndustrySegment::new("Education"),
            storage_gb: 750.0,
            supports_encryption: true,
            cpu_speed_ghz: 3.5,
            price_per_hour: 1.1,
            service_model_score: 5,
            provider: "Oracle Cloud".to_owned(),
            attributes: BTreeMap::new(),
        };

        let result = build(request.clone(), true, offering.clone());

        assert_eq!(result.request, request);
        assert_eq!(result.offering, offering);
        assert!(result.fell_back);
    }
}
