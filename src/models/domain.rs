use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Monthly rent range a user is willing to pay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub min: f64,
    pub max: f64,
}

impl Budget {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoodPreference {
    Vegetarian,
    NonVegetarian,
    Vegan,
    NoPreference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkSchedule {
    Day,
    Night,
    Flexible,
}

/// Cleanliness level, ordered `very-clean > clean > moderate > relaxed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cleanliness {
    Relaxed,
    Moderate,
    Clean,
    VeryClean,
}

impl Cleanliness {
    /// Position on the cleanliness scale, `relaxed` = 0
    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Number of steps between two levels on the scale
    #[inline]
    pub fn distance(self, other: Cleanliness) -> u8 {
        self.rank().abs_diff(other.rank())
    }
}

/// Lifestyle habits declared on a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lifestyle {
    pub smoking: bool,
    pub pets: bool,
    pub drinking: bool,
    #[serde(rename = "foodPreference", default, skip_serializing_if = "Option::is_none")]
    pub food_preference: Option<FoodPreference>,
    #[serde(rename = "workSchedule", default, skip_serializing_if = "Option::is_none")]
    pub work_schedule: Option<WorkSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanliness: Option<Cleanliness>,
}

impl Lifestyle {
    /// Helper to get the food preference, defaulting to no-preference
    pub fn food(&self) -> FoodPreference {
        self.food_preference.unwrap_or(FoodPreference::NoPreference)
    }

    /// Helper to get the work schedule, defaulting to flexible
    pub fn schedule(&self) -> WorkSchedule {
        self.work_schedule.unwrap_or(WorkSchedule::Flexible)
    }

    /// Helper to get the cleanliness level, defaulting to moderate
    pub fn cleanliness_level(&self) -> Cleanliness {
        self.cleanliness.unwrap_or(Cleanliness::Moderate)
    }
}

impl Default for Lifestyle {
    fn default() -> Self {
        Self {
            smoking: false,
            pets: false,
            drinking: false,
            food_preference: Some(FoodPreference::NoPreference),
            work_schedule: Some(WorkSchedule::Flexible),
            cleanliness: Some(Cleanliness::Moderate),
        }
    }
}

/// Identity record of the signed-in user, copied onto a profile at creation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedIdentity {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Roommate matching preferences, one per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_budget"))]
pub struct RoommateProfile {
    /// Owning user's id, also the primary key
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub budget: Budget,
    #[validate(custom(function = "validate_locations"))]
    pub preferred_locations: BTreeSet<String>,
    pub lifestyle: Lifestyle,
    #[validate(custom(function = "validate_not_blank"))]
    pub bio: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub looking_for: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoommateProfile {
    /// Build a new profile from the owner's identity and their submitted preferences
    pub fn from_seed(
        user_id: &str,
        seed: &SeedIdentity,
        draft: ProfileDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: user_id.to_string(),
            first_name: seed.first_name.clone(),
            last_name: seed.last_name.clone(),
            email: seed.email.clone(),
            phone: seed.phone.clone(),
            avatar_url: seed.avatar_url.clone(),
            budget: draft.budget,
            preferred_locations: draft.preferred_locations,
            lifestyle: draft.lifestyle,
            bio: draft.bio,
            looking_for: draft.looking_for,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

fn check_budget(budget: &Budget) -> Result<(), ValidationError> {
    let Budget { min, max } = *budget;

    if !min.is_finite() || !max.is_finite() || min <= 0.0 || max <= 0.0 {
        let mut err = ValidationError::new("budget_positive");
        err.message = Some("budget bounds must be positive numbers".into());
        return Err(err);
    }

    if min > max {
        let mut err = ValidationError::new("budget_range");
        err.message = Some("maximum budget must not be below minimum budget".into());
        return Err(err);
    }

    Ok(())
}

fn validate_budget(profile: &RoommateProfile) -> Result<(), ValidationError> {
    check_budget(&profile.budget)
}

fn validate_draft_budget(draft: &ProfileDraft) -> Result<(), ValidationError> {
    check_budget(&draft.budget)
}

fn validate_update_budget(update: &ProfileUpdate) -> Result<(), ValidationError> {
    update.budget.as_ref().map_or(Ok(()), check_budget)
}

fn validate_locations(locations: &BTreeSet<String>) -> Result<(), ValidationError> {
    if locations.iter().any(|loc| loc.trim().is_empty()) {
        let mut err = ValidationError::new("blank_location");
        err.message = Some("all location entries must be filled".into());
        return Err(err);
    }
    Ok(())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("field is required".into());
        return Err(err);
    }
    Ok(())
}

/// Caller-supplied fields for a new profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_draft_budget"))]
pub struct ProfileDraft {
    pub budget: Budget,
    #[serde(default)]
    #[validate(custom(function = "validate_locations"))]
    pub preferred_locations: BTreeSet<String>,
    #[serde(default)]
    pub lifestyle: Lifestyle,
    #[validate(custom(function = "validate_not_blank"))]
    pub bio: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub looking_for: String,
}

/// Partial profile update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_budget"))]
pub struct ProfileUpdate {
    #[serde(default)]
    pub budget: Option<Budget>,
    #[serde(default)]
    #[validate(custom(function = "validate_locations"))]
    pub preferred_locations: Option<BTreeSet<String>>,
    #[serde(default)]
    pub lifestyle: Option<Lifestyle>,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub bio: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub looking_for: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    /// Merge the present fields into `profile` and refresh `updated_at`
    pub fn apply_to(self, profile: &mut RoommateProfile, now: DateTime<Utc>) {
        if let Some(budget) = self.budget {
            profile.budget = budget;
        }
        if let Some(locations) = self.preferred_locations {
            profile.preferred_locations = locations;
        }
        if let Some(lifestyle) = self.lifestyle {
            profile.lifestyle = lifestyle;
        }
        if let Some(bio) = self.bio {
            profile.bio = bio;
        }
        if let Some(looking_for) = self.looking_for {
            profile.looking_for = looking_for;
        }
        if let Some(first_name) = self.first_name {
            profile.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            profile.last_name = last_name;
        }
        if let Some(email) = self.email {
            profile.email = email;
        }
        if let Some(phone) = self.phone {
            profile.phone = Some(phone);
        }
        if let Some(avatar_url) = self.avatar_url {
            profile.avatar_url = Some(avatar_url);
        }
        profile.updated_at = now;
    }
}

/// Budget bounds for search; each bound is optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetFilter {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl BudgetFilter {
    /// Lower bound, if one was actually requested; zero or less means unset
    pub fn lower(&self) -> Option<f64> {
        self.min.filter(|v| *v > 0.0)
    }

    /// Upper bound, if one was actually requested; zero or less means unset
    pub fn upper(&self) -> Option<f64> {
        self.max.filter(|v| *v > 0.0)
    }
}

/// Lifestyle flags for search; `None` means "don't care"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifestyleFilter {
    #[serde(default)]
    pub smoking: Option<bool>,
    #[serde(default)]
    pub pets: Option<bool>,
    #[serde(default)]
    pub drinking: Option<bool>,
}

/// Explicit search criteria, combined with logical AND
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub budget: BudgetFilter,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub lifestyle: LifestyleFilter,
}

/// Lifecycle state of a single user's profile
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProfileState {
    #[default]
    NonExistent,
    Active(RoommateProfile),
}

impl ProfileState {
    pub fn profile(&self) -> Option<&RoommateProfile> {
        match self {
            ProfileState::Active(profile) => Some(profile),
            ProfileState::NonExistent => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ProfileState::Active(_))
    }
}

impl From<Option<RoommateProfile>> for ProfileState {
    fn from(value: Option<RoommateProfile>) -> Self {
        match value {
            Some(profile) => ProfileState::Active(profile),
            None => ProfileState::NonExistent,
        }
    }
}

/// Per-component compatibility score between two profiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub budget: f64,
    pub location: f64,
    pub lifestyle: f64,
    pub total: u8,
}

/// Profile paired with its compatibility score against the viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProfile {
    #[serde(flatten)]
    pub profile: RoommateProfile,
    #[serde(rename = "compatibilityScore")]
    pub compatibility_score: u8,
}
