use serde::{Deserialize, Serialize};
use crate::models::domain::{RoommateProfile, ScoredProfile};

/// One search result; scored only when the caller has a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub profile: RoommateProfile,
    #[serde(rename = "compatibilityScore", default, skip_serializing_if = "Option::is_none")]
    pub compatibility_score: Option<u8>,
}

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchProfilesResponse {
    pub profiles: Vec<SearchHit>,
    pub total_results: usize,
}

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub matches: Vec<ScoredProfile>,
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
