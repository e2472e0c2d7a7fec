use crate::models::{Budget, FoodPreference, RoommateProfile, ScoreBreakdown};
use std::collections::BTreeSet;

/// Maximum points for overlapping budgets
pub const BUDGET_WEIGHT: f64 = 30.0;
/// Maximum points for shared preferred locations
pub const LOCATION_WEIGHT: f64 = 30.0;
/// Maximum points for lifestyle agreement (sum of the sub-scores below)
pub const LIFESTYLE_WEIGHT: f64 = 40.0;

const SMOKING_POINTS: f64 = 10.0;
const PETS_POINTS: f64 = 10.0;
const DRINKING_POINTS: f64 = 10.0;
const FOOD_POINTS: f64 = 5.0;
const CLEANLINESS_POINTS: f64 = 5.0;

/// A budget gap larger than this fraction of the higher ceiling scores nothing
const MAX_GAP_RATIO: f64 = 0.5;

/// Calculate the compatibility score (0-100) between two profiles
///
/// Scoring formula:
/// score = round(
///     budget_score     # up to 30, full when ranges overlap
///   + location_score   # up to 30, share of common locations
///   + lifestyle_score  # up to 40, habits that agree
/// )
///
/// The score is symmetric and never fails; missing lifestyle fields fall
/// back to `moderate` cleanliness and `no-preference` food.
pub fn calculate_compatibility(a: &RoommateProfile, b: &RoommateProfile) -> u8 {
    score_breakdown(a, b).total
}

/// Component-wise compatibility between two profiles
pub fn score_breakdown(a: &RoommateProfile, b: &RoommateProfile) -> ScoreBreakdown {
    let budget = calculate_budget_score(&a.budget, &b.budget);
    let location = calculate_location_score(&a.preferred_locations, &b.preferred_locations);
    let lifestyle = calculate_lifestyle_score(a, b);

    ScoreBreakdown {
        budget,
        location,
        lifestyle,
        total: to_total(budget + location + lifestyle),
    }
}

#[inline]
fn to_total(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Calculate budget score (0-30)
/// Overlapping ranges score full points; disjoint ranges decay linearly with the gap
#[inline]
pub fn calculate_budget_score(a: &Budget, b: &Budget) -> f64 {
    let overlap = a.max.min(b.max) - a.min.max(b.min);
    if overlap >= 0.0 {
        return BUDGET_WEIGHT;
    }

    let gap = -overlap;
    let max_gap = MAX_GAP_RATIO * a.max.max(b.max);
    if max_gap > 0.0 && gap <= max_gap {
        BUDGET_WEIGHT * (1.0 - gap / max_gap)
    } else {
        0.0
    }
}

/// Calculate location score (0-30)
/// Proportion of common locations relative to the larger preference set
#[inline]
pub fn calculate_location_score(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let common = a.intersection(b).count();
    if common == 0 {
        return 0.0;
    }

    let larger = a.len().max(b.len());
    LOCATION_WEIGHT * common as f64 / larger as f64
}

/// Calculate lifestyle score (0-40)
pub fn calculate_lifestyle_score(a: &RoommateProfile, b: &RoommateProfile) -> f64 {
    let (la, lb) = (&a.lifestyle, &b.lifestyle);
    let mut score = 0.0;

    if la.smoking == lb.smoking {
        score += SMOKING_POINTS;
    }
    if la.pets == lb.pets {
        score += PETS_POINTS;
    }
    if la.drinking == lb.drinking {
        score += DRINKING_POINTS;
    }

    let (food_a, food_b) = (la.food(), lb.food());
    if food_a == food_b
        || food_a == FoodPreference::NoPreference
        || food_b == FoodPreference::NoPreference
    {
        score += FOOD_POINTS;
    }

    if la.cleanliness_level().distance(lb.cleanliness_level()) <= 1 {
        score += CLEANLINESS_POINTS;
    }

    score
}
