// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Budget, BudgetFilter, Cleanliness, FoodPreference, Lifestyle, LifestyleFilter, ProfileDraft,
    ProfileState, ProfileUpdate, RoommateProfile, ScoreBreakdown, ScoredProfile, SearchFilters,
    SeedIdentity, WorkSchedule,
};
pub use requests::{CreateProfileRequest, RecommendationsQuery};
pub use responses::{
    ErrorResponse, HealthResponse, RecommendationsResponse, SearchHit, SearchProfilesResponse,
};
