use crate::domain::offering::{IndustrySegment, ProviderOffering};
use crate::errors::RecommendationError;

#[derive(Clone, Debug, PartialEq)]
pub struct CandidatePool<'a> {
    pub candidates: Vec<&'a ProviderOffering>,
    pub fell_back: bool,
}

/// Narrows `pool` to offerings in `segment`, or returns the whole pool with
/// `fell_back` set when the segment has no rows.
pub fn select<'a>(
    pool: &'a [ProviderOffering],
    segment: &IndustrySegment,
) -> Result<CandidatePool<'a>, RecommendationError> {
    if pool.is_empty() {
        return Err(RecommendationError::EmptyDataset);
    }

    let matching: Vec<&ProviderOffering> =
        pool.iter().filter(|offering| &offering.segment == segment).collect();

    if matching.is_empty() {
        return Ok(CandidatePool { candidates: pool.iter().collect(), fell_back: true });
    }

    Ok(CandidatePool { candidates: matching, fell_back: false })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::select;
    use crate::domain::offering::{IndustrySegment, ProviderOffering};
    use crate::errors::RecommendationError;

    fn offering(segment: &str, provider: &str) -> ProviderOffering {
        ProviderOffering {
            segment: IndustrySegment::new(segment),
            storage_gb: 100.0,
            supports_encryption: true,
            cpu_speed_ghz: 3.0,
            price_per_hour: 0.5,
            service_model_score: 3,
            provider: provider.to_owned(),
            attributes: BTreeMap::new(),
        }
    }

    #[test]
    fn keeps_only_matching_segment_in_original_order() {
        let pool = vec![
            offering("IT", "AWS"),
            offering("Bank", "IBM Cloud"),
            offering("IT", "Azure"),
        ];

        let selected = select(&pool, &IndustrySegment::new("IT")).expect("select");

        assert!(!selected.fell_back);
        let providers: Vec<&str> =
            selected.candidates.iter().map(|offering| offering.provider.as_str()).collect();
        assert_eq!(providers, vec!["AWS", "Azure"]);
    }

    #[test]
    fn falls_back_to_full_pool_when_segment_is_empty() {
        let pool = vec![offering("IT", "AWS"), offering("Bank", "IBM Cloud")];

        let selected = select(&pool, &IndustrySegment::new("Medical")).expect("select");

        assert!(selected.fell_back);
        assert_eq!(selected.candidates.len(), pool.len());
    }

    #[test]
    fn segment_match_is_case_sensitive() {
        let pool = vec![offering("IT", "AWS")];

        let selected = select(&pool, &IndustrySegment::new("it")).expect("select");

        assert!(selected.fell_back);
    }

    #[test]
    fn empty_pool_is_an_error() {
        assert_eq!(
            select(&[], &IndustrySegment::new("IT")),
            Err(RecommendationError::EmptyDataset)
        );
    }
}
