use serde::{Deserialize, Serialize};

use crate::domain::offering::{FeatureVector, IndustrySegment};
use crate::errors::RecommendationError;

pub const MIN_SERVICE_MODEL_SCORE: u8 = 1;
pub const MAX_SERVICE_MODEL_SCORE: u8 = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub name: String,
    pub segment: IndustrySegment,
    pub storage_gb: f64,
    pub requires_encryption: bool,
    pub cpu_speed_ghz: f64,
    pub price_per_hour: f64,
    pub service_model_score: u8,
}

impl RecommendationRequest {
    /// Query vector in the same feature order as [`ProviderOffering::features`].
    ///
    /// [`ProviderOffering::features`]: crate::domain::offering::ProviderOffering::features
    pub fn features(&self) -> FeatureVector {
        [
            self.storage_gb,
            if self.requires_encryption { 1.0 } else { 0.0 },
            self.cpu_speed_ghz,
            self.price_per_hour,
            f64::from(self.service_model_score),
        ]
    }

    pub fn validate(&self) -> Result<(), RecommendationError> {
        validate_amount("storage_needs", self.storage_gb)?;
        validate_amount("cpu_speed", self.cpu_speed_ghz)?;
        validate_amount("price_per_hour", self.price_per_hour)?;

        if !(MIN_SERVICE_MODEL_SCORE..=MAX_SERVICE_MODEL_SCORE).contains(&self.service_model_score)
        {
            return Err(RecommendationError::invalid(
                "service_model_score",
                format!(
                    "must be between {MIN_SERVICE_MODEL_SCORE} and {MAX_SERVICE_MODEL_SCORE}, \
                     got {}",
                    self.service_model_score
                ),
            ));
        }

        Ok(())
    }
}

fn validate_amount(field: &'static str, value: f64) -> Result<(), RecommendationError> {
    if !value.is_finite() {
        return Err(RecommendationError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(RecommendationError::invalid(field, format!("must be >= 0, got {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::RecommendationRequest;
    use crate::domain::offering::IndustrySegment;
    use crate::errors::RecommendationError;

    fn request() -> RecommendationRequest {
        RecommendationRequest {
            name: "Acme Clinic".to_owned(),
            segment: IndustrySegment::new("Medical"),
            storage_gb: 250.0,
            requires_encryption: true,
            cpu_speed_ghz: 2.8,
            price_per_hour: 0.3,
            service_model_score: 3,
        }
    }

    #[test]
    fn accepts_boundary_values() {
        let zeroed = RecommendationRequest {
            storage_gb: 0.0,
            cpu_speed_ghz: 0.0,
            price_per_hour: 0.0,
            service_model_score: 1,
            ..request()
        };
        assert_eq!(zeroed.validate(), Ok(()));

        let top = RecommendationRequest { service_model_score: 5, ..request() };
        assert_eq!(top.validate(), Ok(()));
    }

    #[test]
    fn rejects_score_outside_range() {
        for score in [0, 6, 255] {
            let invalid = RecommendationRequest { service_model_score: score, ..request() };
            assert!(matches!(
                invalid.validate(),
                Err(RecommendationError::InvalidRequest { field: "service_model_score", .. })
            ));
        }
    }

    #[test]
    fn rejects_negative_and_non_finite_amounts() {
        let negative = RecommendationRequest { price_per_hour: -0.01, ..request() };
        assert!(matches!(
            negative.validate(),
            Err(RecommendationError::InvalidRequest { field: "price_per_hour", .. })
        ));

        let nan = RecommendationRequest { storage_gb: f64::NAN, ..request() };
        assert!(matches!(
            nan.validate(),
            Err(RecommendationError::InvalidRequest { field: "storage_needs", .. })
        ));

        let infinite = RecommendationRequest { cpu_speed_ghz: f64::INFINITY, ..request() };
        assert!(matches!(
            infinite.validate(),
            Err(RecommendationError::InvalidRequest { field: "cpu_speed", .. })
        ));
    }

    #[test]
    fn features_encode_encryption_requirement() {
        assert_eq!(request().features(), [250.0, 1.0, 2.8, 0.3, 3.0]);
    }
}
