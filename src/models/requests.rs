use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{ProfileDraft, SeedIdentity};

/// Request to create (or recreate) the caller's roommate profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub seed: SeedIdentity,
    #[serde(flatten)]
    pub profile: ProfileDraft,
}

/// Query parameters for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationsQuery {
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<usize>,
}
