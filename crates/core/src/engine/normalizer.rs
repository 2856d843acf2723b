//! Per-feature standardization fitted on the current candidate pool.
//!
//! Uses the population standard deviation. A feature that is constant across
//! the pool has `std_dev == 0.0` and standardizes to `0.0` for every vector,
//! so it never contributes to a distance.

use serde::{Deserialize, Serialize};

use crate::domain::offering::{FeatureVector, FEATURE_DIM};
use crate::errors::RecommendationError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl FeatureStats {
    fn fit(values: impl Iterator<Item = f64> + Clone) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut first = None;
        let mut constant = true;

        for value in values.clone() {
            match first {
                None => first = Some(value),
                Some(seen) if seen != value => constant = false,
                Some(_) => {}
            }
            sum += value;
            count += 1;
        }

        // Summation error would otherwise leave a tiny non-zero deviation.
        if constant {
            return Self { mean: first.unwrap_or(0.0), std_dev: 0.0 };
        }

        let n = count as f64;
        let mean = sum / n;
        let variance = values.map(|value| (value - mean).powi(2)).sum::<f64>() / n;

        Self { mean, std_dev: variance.sqrt() }
    }

    pub fn standardize(&self, value: f64) -> f64 {
        if self.std_dev == 0.0 {
            0.0
        } else {
            (value - self.mean) / self.std_dev
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams {
    pub features: [FeatureStats; FEATURE_DIM],
}

impl NormalizationParams {
    pub fn fit(rows: &[FeatureVector]) -> Result<Self, RecommendationError> {
        if rows.is_empty() {
            return Err(RecommendationError::EmptyCandidates);
        }

        let features =
            std::array::from_fn(|column| FeatureStats::fit(rows.iter().map(|row| row[column])));

        Ok(Self { features })
    }

    pub fn transform(&self, vector: &FeatureVector) -> FeatureVector {
        std::array::from_fn(|column| self.features[column].standardize(vector[column]))
    }
}
