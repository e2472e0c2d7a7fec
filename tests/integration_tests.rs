// Integration tests for Roommate Match

use std::sync::Arc;
use std::time::Duration;

use roommate_match::core::{MatchingSession, ProfileStore, RecommendationEngine};
use roommate_match::error::ProfileError;
use roommate_match::models::{
    Budget, Lifestyle, ProfileDraft, ProfileState, ProfileUpdate, ScoredProfile, SeedIdentity,
};
use roommate_match::services::{InMemoryProfileRepository, ProfileRepository};
use tokio::sync::watch;

fn seed(name: &str) -> SeedIdentity {
    SeedIdentity {
        first_name: name.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: None,
        avatar_url: None,
    }
}

fn draft(min: f64, max: f64, locations: &[&str], smoking: bool) -> ProfileDraft {
    ProfileDraft {
        budget: Budget::new(min, max),
        preferred_locations: locations.iter().map(|l| l.to_string()).collect(),
        lifestyle: Lifestyle {
            smoking,
            ..Lifestyle::default()
        },
        bio: "Software engineer, early riser".to_string(),
        looking_for: "A quiet flatmate".to_string(),
    }
}

async fn wait_for_matches<F>(rx: &mut watch::Receiver<Vec<ScoredProfile>>, predicate: F) -> Vec<ScoredProfile>
where
    F: FnMut(&Vec<ScoredProfile>) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for recommendations")
        .expect("session stopped")
        .clone()
}

async fn seeded_store() -> (ProfileStore, Arc<InMemoryProfileRepository>) {
    let repo = Arc::new(InMemoryProfileRepository::new());
    let store = ProfileStore::new(repo.clone());

    store.create_profile("close", &seed("Close"), draft(10000.0, 20000.0, &["Andheri", "Bandra"], false)).await.unwrap();
    store.create_profile("smoker", &seed("Smoker"), draft(10000.0, 20000.0, &["Andheri", "Bandra"], true)).await.unwrap();
    store.create_profile("far", &seed("Far"), draft(30000.0, 40000.0, &["Thane"], true)).await.unwrap();

    (store, repo)
}

#[tokio::test]
async fn test_create_is_idempotent() {
    let (store, repo) = seeded_store().await;

    let first = store.create_profile("me", &seed("Me"), draft(10000.0, 20000.0, &["Andheri"], false)).await.unwrap();

    let mut changed = draft(30000.0, 40000.0, &["Thane"], false);
    changed.bio = "Moved to a new job".to_string();
    store.create_profile("me", &seed("Me"), changed).await.unwrap();

    let stored: Vec<_> = repo.query_all().await.unwrap().into_iter().filter(|p| p.id == "me").collect();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].budget, Budget::new(30000.0, 40000.0));
    assert_eq!(stored[0].bio, "Moved to a new job");
    assert!(stored[0].preferred_locations.contains("Thane"));
    assert_eq!(stored[0].created_at, first.created_at);
}

#[tokio::test]
async fn test_session_follows_profile_lifecycle() {
    let (store, _) = seeded_store().await;
    let session = MatchingSession::start(store, RecommendationEngine::new(2), Some("me")).await.unwrap();
    let mut matches = session.watch_recommendations();
    let profile = session.watch_profile();

    assert_eq!(*profile.borrow(), ProfileState::NonExistent);

    session
        .create_profile(&seed("Me"), draft(10000.0, 20000.0, &["Andheri", "Bandra"], false))
        .await
        .unwrap();

    let ranked = wait_for_matches(&mut matches, |m| !m.is_empty()).await;
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].profile.id, "close");
    assert_eq!(ranked[0].compatibility_score, 100);
    assert_eq!(ranked[1].profile.id, "smoker");
    assert!(session.current_user_profile().is_some());

    // Moving to Thane as a smoker makes "far" the better fit
    session
        .update_profile(ProfileUpdate {
            budget: Some(Budget::new(30000.0, 40000.0)),
            preferred_locations: Some(["Thane".to_string()].into_iter().collect()),
            lifestyle: Some(Lifestyle {
                smoking: true,
                ..Lifestyle::default()
            }),
            ..Default::default()
        })
        .await
        .unwrap();

    let ranked = wait_for_matches(&mut matches, |m| m.first().map(|s| s.profile.id.as_str()) == Some("far")).await;
    assert_eq!(ranked[0].compatibility_score, 100);
    assert_eq!(session.scored_matches(), ranked);
    assert!(profile.borrow().profile().is_some_and(|p| p.preferred_locations.contains("Thane")));

    session.delete_profile().await.unwrap();

    wait_for_matches(&mut matches, |m| m.is_empty()).await;
    assert!(session.current_user_profile().is_none());
    assert!(session.recommended_matches().is_empty());
}

#[tokio::test]
async fn test_session_reloads_candidate_pool() {
    let (store, _) = seeded_store().await;
    store.create_profile("me", &seed("Me"), draft(10000.0, 20000.0, &["Andheri", "Bandra"], false)).await.unwrap();

    let session = MatchingSession::start(store.clone(), RecommendationEngine::new(10), Some("me")).await.unwrap();
    let mut matches = session.watch_recommendations();
    wait_for_matches(&mut matches, |m| m.len() == 3).await;

    store.create_profile("newcomer", &seed("New"), draft(10000.0, 20000.0, &["Bandra"], false)).await.unwrap();
    session.reload_candidates();

    let ranked = wait_for_matches(&mut matches, |m| m.len() == 4).await;
    assert!(ranked.iter().any(|s| s.profile.id == "newcomer"));
    assert!(ranked.iter().all(|s| s.profile.id != "me"));
}

#[tokio::test]
async fn test_session_search_excludes_self() {
    let (store, _) = seeded_store().await;
    let session = MatchingSession::start(store, RecommendationEngine::default(), Some("close")).await.unwrap();

    let results = session.search_profiles(&Default::default()).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|p| p.id != "close"));
}

#[tokio::test]
async fn test_repository_outage_reaches_caller() {
    let (store, repo) = seeded_store().await;
    repo.set_offline(true);

    let err = store
        .update_profile("close", ProfileUpdate { bio: Some("Updated".to_string()), ..Default::default() })
        .await
        .unwrap_err();

    assert!(matches!(err, ProfileError::RepositoryUnavailable(_)));

    repo.set_offline(false);
    let unchanged = store.get_profile_by_id("close").await.unwrap().unwrap();
    assert_eq!(unchanged.bio, "Software engineer, early riser");
}
