use crate::domain::offering::FeatureVector;
use crate::errors::RecommendationError;

/// Distances closer than this are treated as ties.
pub const TIE_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestMatch {
    pub index: usize,
    pub distance: f64,
}

pub fn euclidean_distance(left: &FeatureVector, right: &FeatureVector) -> f64 {
    left.iter().zip(right.iter()).map(|(a, b)| (a - b).powi(2)).sum::<f64>().sqrt()
}

/// Exact 1-nearest-neighbor search. Every candidate is measured; among ties the
/// earliest candidate wins.
pub fn find_nearest(
    candidates: &[FeatureVector],
    query: &FeatureVector,
) -> Result<NearestMatch, RecommendationError> {
    let mut distances =
        candidates.iter().enumerate().map(|(index, candidate)| NearestMatch {
            index,
            distance: euclidean_distance(candidate, query),
        });

    let first = distances.next().ok_or(RecommendationError::EmptyCandidates)?;

    Ok(distances.fold(first, |best, next| {
        if next.distance < best.distance - TIE_TOLERANCE {
            next
        } else {
            best
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::{euclidean_distance, find_nearest, TIE_TOLERANCE};
    use crate::errors::RecommendationError;

    #[test]
    fn distance_is_euclidean() {
        let distance = euclidean_distance(&[0.0, 0.0, 0.0, 0.0, 0.0], &[3.0, 4.0, 0.0, 0.0, 0.0]);
        assert!((distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn picks_closest_candidate() {
        let candidates = [
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0, 1.0, 1.0],
            [-2.0, 0.0, 0.0, 0.0, 0.0],
        ];

        let nearest = find_nearest(&candidates, &[0.9, 1.1, 1.0, 1.0, 0.8]).expect("nearest");

        assert_eq!(nearest.index, 1);
    }

    #[test]
    fn identical_candidates_resolve_to_earliest() {
        let candidates = [
            [5.0, 5.0, 5.0, 5.0, 5.0],
            [1.0, 0.0, 0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0, 0.0],
        ];

        let nearest = find_nearest(&candidates, &[1.0, 0.0, 0.0, 0.0, 0.0]).expect("nearest");

        assert_eq!(nearest.index, 1);
        assert_eq!(nearest.distance, 0.0);
    }

    #[test]
    fn near_ties_within_tolerance_keep_earliest() {
        let candidates =
            [[1.0, 0.0, 0.0, 0.0, 0.0], [1.0 - TIE_TOLERANCE / 10.0, 0.0, 0.0, 0.0, 0.0]];

        let nearest = find_nearest(&candidates, &[0.0; 5]).expect("nearest");

        assert_eq!(nearest.index, 0);
    }

    #[test]
    fn equidistant_candidates_on_opposite_sides_keep_earliest() {
        let candidates = [[1.0, 0.0, 0.0, 0.0, 0.0], [-1.0, 0.0, 0.0, 0.0, 0.0]];

        let nearest = find_nearest(&candidates, &[0.0; 5]).expect("nearest");

        assert_eq!(nearest.index, 0);
    }

    #[test]
    fn empty_candidates_are_rejected() {
        assert_eq!(find_nearest(&[], &[0.0; 5]), Err(RecommendationError::EmptyCandidates));
    }
}
