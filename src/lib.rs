//! Roommate Match - compatibility matching for a roommate marketplace
//!
//! This library scores pairs of roommate profiles, ranks the candidate pool
//! for a signed-in user, and filters profiles by explicit search criteria.
//! Profiles live behind a pluggable repository with change subscriptions.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_compatibility, MatchingSession, ProfileStore, RecommendationEngine};
pub use error::ProfileError;
pub use models::{
    Budget, Lifestyle, ProfileDraft, ProfileState, ProfileUpdate, RoommateProfile, ScoredProfile,
    SearchFilters, SeedIdentity,
};
