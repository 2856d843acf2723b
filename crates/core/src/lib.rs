pub mod config;
pub mod dataset;
pub mod domain;
pub mod engine;
pub mod errors;

pub use dataset::{load_offerings, load_offerings_from_path, DatasetError};
pub use domain::offering::{FeatureVector, IndustrySegment, ProviderOffering, FEATURE_NAMES};
pub use domain::recommendation::{RecommendationId, RecommendationRecord, RecommendationResult};
pub use domain::request::RecommendationRequest;
pub use engine::{recommend, NearestNeighborEngine, RecommendationEngine, RecommendationOutcome};
pub use errors::{ApplicationError, InterfaceError, RecommendationError};
