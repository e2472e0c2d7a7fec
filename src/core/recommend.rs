use crate::core::scoring::calculate_compatibility;
use crate::models::{RoommateProfile, ScoredProfile};

/// Default number of recommendations returned
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Result of a recommendation run
#[derive(Debug)]
pub struct RecommendationResult {
    pub matches: Vec<ScoredProfile>,
    pub total_candidates: usize,
}

/// Ranks the candidate pool against a user's own profile
///
/// # Pipeline Stages
/// 1. Self exclusion
/// 2. Compatibility scoring
/// 3. Stable descending sort
/// 4. Top-K truncation
#[derive(Debug, Clone, Copy)]
pub struct RecommendationEngine {
    limit: usize,
}

impl RecommendationEngine {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn with_default_limit() -> Self {
        Self::new(DEFAULT_RECOMMENDATION_LIMIT)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Top profiles for `me`, best first, using the configured limit
    pub fn recommend(
        &self,
        me: &RoommateProfile,
        candidates: Vec<RoommateProfile>,
    ) -> Vec<RoommateProfile> {
        self.recommend_top(me, candidates, self.limit)
            .matches
            .into_iter()
            .map(|scored| scored.profile)
            .collect()
    }

    /// Score and rank candidates for `me`, keeping at most `k`
    ///
    /// Candidates sharing `me.id` are dropped. Equal scores keep their input
    /// order, so identical inputs always rank identically.
    pub fn recommend_top(
        &self,
        me: &RoommateProfile,
        candidates: Vec<RoommateProfile>,
        k: usize,
    ) -> RecommendationResult {
        let mut scored: Vec<ScoredProfile> = candidates
            .into_iter()
            .filter(|candidate| candidate.id != me.id)
            .map(|candidate| ScoredProfile {
                compatibility_score: calculate_compatibility(me, &candidate),
                profile: candidate,
            })
            .collect();

        let total_candidates = scored.len();

        // sort_by is stable
        scored.sort_by(|a, b| b.compatibility_score.cmp(&a.compatibility_score));
        scored.truncate(k);

        tracing::debug!(
            "Ranked {} candidates for {}, keeping {}",
            total_candidates,
            me.id,
            scored.len()
        );

        RecommendationResult {
            matches: scored,
            total_candidates,
        }
    }

    /// Attach scores to an arbitrary profile list and order it best first
    pub fn rank(&self, me: &RoommateProfile, profiles: Vec<RoommateProfile>) -> Vec<ScoredProfile> {
        let k = profiles.len();
        self.recommend_top(me, profiles, k).matches
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::with_default_limit()
    }
}
