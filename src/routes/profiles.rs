use actix_web::{error::ResponseError, http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{score_breakdown, ProfileStore, RecommendationEngine};
use crate::error::ProfileError;
use crate::models::{
    CreateProfileRequest, ErrorResponse, HealthResponse, ProfileUpdate, RecommendationsQuery,
    RecommendationsResponse, RoommateProfile, SearchFilters, SearchHit, SearchProfilesResponse,
};
use crate::services::PostgresProfileRepository;

/// Header carrying the caller's user id, set by the authentication gateway
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: ProfileStore,
    pub engine: RecommendationEngine,
    pub max_limit: usize,
    pub postgres: Option<Arc<PostgresProfileRepository>>,
}

/// Configure all profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/profiles", web::post().to(create_profile))
        .route("/profiles/search", web::post().to(search_profiles))
        .service(
            web::resource("/profiles/me")
                .route(web::get().to(get_my_profile))
                .route(web::patch().to(update_my_profile))
                .route(web::delete().to(delete_my_profile)),
        )
        .route("/profiles/me/recommendations", web::get().to(get_recommendations))
        .route("/profiles/{id}/compatibility", web::get().to(get_compatibility))
        .route("/profiles/{id}", web::get().to(get_profile));
}

impl ResponseError for ProfileError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProfileError::NotAuthenticated(_) => StatusCode::UNAUTHORIZED,
            ProfileError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
            ProfileError::Validation(_) => StatusCode::BAD_REQUEST,
            ProfileError::RepositoryUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

fn caller_id(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

fn require_caller<'a>(req: &'a HttpRequest, action: &'static str) -> Result<&'a str, ProfileError> {
    caller_id(req).ok_or(ProfileError::NotAuthenticated(action))
}

async fn require_profile(store: &ProfileStore, user_id: &str) -> Result<RoommateProfile, ProfileError> {
    store
        .get_profile_by_id(user_id)
        .await?
        .ok_or_else(|| ProfileError::ProfileNotFound(user_id.to_string()))
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match &state.postgres {
        Some(postgres) => postgres.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Create or overwrite the caller's profile
///
/// POST /api/v1/profiles
async fn create_profile(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateProfileRequest>,
) -> Result<HttpResponse, ProfileError> {
    let user_id = require_caller(&req, "create a profile")?;
    let CreateProfileRequest { seed, profile } = body.into_inner();

    let created = state.store.create_profile(user_id, &seed, profile).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/v1/profiles/me
async fn get_my_profile(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, ProfileError> {
    let user_id = require_caller(&req, "view their profile")?;
    let profile = require_profile(&state.store, user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PATCH /api/v1/profiles/me
async fn update_my_profile(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, ProfileError> {
    let user_id = require_caller(&req, "update a profile")?;
    let updated = state.store.update_profile(user_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/v1/profiles/me
async fn delete_my_profile(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, ProfileError> {
    let user_id = require_caller(&req, "delete a profile")?;
    state.store.delete_profile(user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/profiles/{id}
async fn get_profile(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ProfileError> {
    require_caller(&req, "view profiles")?;
    let profile = require_profile(&state.store, &path).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Search profiles by explicit criteria
///
/// POST /api/v1/profiles/search
///
/// Request body:
/// ```json
/// {
///   "budget": { "min": 8000, "max": 20000 },
///   "locations": ["Andheri", "Bandra"],
///   "lifestyle": { "smoking": false }
/// }
/// ```
///
/// When the caller has a profile, results carry a compatibility score and are
/// ordered best first; otherwise they keep repository order.
async fn search_profiles(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SearchFilters>,
) -> Result<HttpResponse, ProfileError> {
    let user_id = require_caller(&req, "search profiles")?;
    let filters = body.into_inner();

    let results = state.store.search_profiles(user_id, &filters).await?;

    let profiles: Vec<SearchHit> = match state.store.get_profile_by_id(user_id).await? {
        Some(me) => state
            .engine
            .rank(&me, results)
            .into_iter()
            .map(|scored| SearchHit {
                profile: scored.profile,
                compatibility_score: Some(scored.compatibility_score),
            })
            .collect(),
        None => results
            .into_iter()
            .map(|profile| SearchHit {
                profile,
                compatibility_score: None,
            })
            .collect(),
    };

    tracing::info!("Search by {} returned {} profiles", user_id, profiles.len());

    Ok(HttpResponse::Ok().json(SearchProfilesResponse {
        total_results: profiles.len(),
        profiles,
    }))
}

/// Top compatible profiles for the caller
///
/// GET /api/v1/profiles/me/recommendations?limit=5
async fn get_recommendations(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<RecommendationsQuery>,
) -> Result<HttpResponse, ProfileError> {
    let user_id = require_caller(&req, "get recommendations")?;
    query.validate()?;

    // Cap limit to prevent oversized responses
    let limit = query
        .limit
        .unwrap_or_else(|| state.engine.limit())
        .min(state.max_limit);

    let me = require_profile(&state.store, user_id).await?;
    let candidates = state.store.load_candidates(user_id).await?;
    let result = state.engine.recommend_top(&me, candidates, limit);

    tracing::info!(
        "Returning {} recommendations for {} (from {} candidates)",
        result.matches.len(),
        user_id,
        result.total_candidates
    );

    Ok(HttpResponse::Ok().json(RecommendationsResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
    }))
}

/// Per-component compatibility between the caller and another profile
///
/// GET /api/v1/profiles/{id}/compatibility
async fn get_compatibility(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ProfileError> {
    let user_id = require_caller(&req, "compare profiles")?;
    let me = require_profile(&state.store, user_id).await?;
    let other = require_profile(&state.store, &path).await?;

    Ok(HttpResponse::Ok().json(score_breakdown(&me, &other)))
}
