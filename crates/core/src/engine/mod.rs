//! Cloud provider recommendation engine
//!
//! Picks the single reference offering closest to a request: the dataset is
//! narrowed to the request's industry segment (or kept whole when that segment
//! has no rows), standardized per feature on that pool, and searched for the
//! Euclidean nearest neighbor. Every call fits and searches from scratch; no
//! state is kept between calls.

pub mod matcher;
pub mod normalizer;
pub mod record;
pub mod selector;

use tracing::{debug, warn};

use crate::domain::offering::{FeatureVector, ProviderOffering};
use crate::domain::recommendation::RecommendationResult;
use crate::domain::request::RecommendationRequest;
use crate::errors::RecommendationError;

use self::normalizer::NormalizationParams;

pub type RecommendationOutcome = Result<RecommendationResult, RecommendationError>;

pub trait RecommendationEngine: Send + Sync {
    fn recommend(
        &self,
        pool: &[ProviderOffering],
        request: &RecommendationRequest,
    ) -> RecommendationOutcome;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NearestNeighborEngine;

impl RecommendationEngine for NearestNeighborEngine {
    fn recommend(
        &self,
        pool: &[ProviderOffering],
        request: &RecommendationRequest,
    ) -> RecommendationOutcome {
        recommend(pool, request)
    }
}

pub fn recommend(
    pool: &[ProviderOffering],
    request: &RecommendationRequest,
) -> RecommendationOutcome {
    request.validate()?;

    let selection = selector::select(pool, &request.segment)?;
    if selection.fell_back {
        warn!(
            event_name = "core.engine.segment_fallback",
            segment = %request.segment,
            pool_size = pool.len(),
            "no offerings for requested segment; searching the full dataset"
        );
    }

    let raw: Vec<FeatureVector> =
        selection.candidates.iter().map(|offering| offering.features()).collect();
    let params = NormalizationParams::fit(&raw)?;
    let scaled: Vec<FeatureVector> = raw.iter().map(|row| params.transform(row)).collect();
    let query = params.transform(&request.features());

    let nearest = matcher::find_nearest(&scaled, &query)?;
    let offering = selection.candidates[nearest.index];

    debug!(
        event_name = "core.engine.matched",
        segment = %request.segment,
        candidate_count = selection.candidates.len(),
        provider = %offering.provider,
        distance = nearest.distance,
        fell_back = selection.fell_back,
        "nearest offering selected"
    );

    Ok(record::build(request.clone(), selection.fell_back, offering.clone()))
}
