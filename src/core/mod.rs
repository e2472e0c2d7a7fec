// Core matching exports
pub mod filters;
pub mod recommend;
pub mod scoring;
pub mod session;
pub mod store;

pub use filters::{matches_filters, search};
pub use recommend::{RecommendationEngine, RecommendationResult, DEFAULT_RECOMMENDATION_LIMIT};
pub use scoring::{calculate_compatibility, score_breakdown};
pub use session::MatchingSession;
pub use store::ProfileStore;
