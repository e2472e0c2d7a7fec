use crate::models::{BudgetFilter, LifestyleFilter, RoommateProfile, SearchFilters};

/// Check if a profile satisfies the budget bounds of a search
///
/// Bounds are compared by containment: the candidate's own minimum must be
/// at least the requested minimum, and its maximum at most the requested maximum.
/// A bound of zero or less counts as unset.
#[inline]
pub fn matches_budget(profile: &RoommateProfile, budget: &BudgetFilter) -> bool {
    if let Some(min) = budget.lower() {
        if profile.budget.min < min {
            return false;
        }
    }

    if let Some(max) = budget.upper() {
        if profile.budget.max > max {
            return false;
        }
    }

    true
}

/// Check if a profile prefers at least one of the requested locations
#[inline]
pub fn matches_locations(profile: &RoommateProfile, locations: &[String]) -> bool {
    locations.is_empty()
        || locations
            .iter()
            .any(|loc| profile.preferred_locations.contains(loc))
}

/// Check if a profile's lifestyle flags equal every requested flag
#[inline]
pub fn matches_lifestyle(profile: &RoommateProfile, lifestyle: &LifestyleFilter) -> bool {
    let flag_ok = |wanted: Option<bool>, actual: bool| wanted.map_or(true, |w| w == actual);

    flag_ok(lifestyle.smoking, profile.lifestyle.smoking)
        && flag_ok(lifestyle.pets, profile.lifestyle.pets)
        && flag_ok(lifestyle.drinking, profile.lifestyle.drinking)
}

/// Check if a profile satisfies every criterion of a search
#[inline]
pub fn matches_filters(profile: &RoommateProfile, filters: &SearchFilters) -> bool {
    matches_budget(profile, &filters.budget)
        && matches_locations(profile, &filters.locations)
        && matches_lifestyle(profile, &filters.lifestyle)
}

/// Narrow the candidate pool down to profiles matching `filters`
///
/// The caller's own profile is always dropped. Candidate order is preserved.
pub fn search(
    candidates: Vec<RoommateProfile>,
    filters: &SearchFilters,
    exclude_user_id: &str,
) -> Vec<RoommateProfile> {
    candidates
        .into_iter()
        .filter(|profile| profile.id != exclude_user_id)
        .filter(|profile| matches_filters(profile, filters))
        .collect()
}
