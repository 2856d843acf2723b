pub mod connection;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, open, DbPool, OpenError};
pub use repositories::{
    InMemoryRecommendationRepository, RecommendationRepository, RepositoryError,
    SqlRecommendationRepository,
};
