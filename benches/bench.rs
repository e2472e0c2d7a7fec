// Criterion benchmarks for Roommate Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use roommate_match::core::{calculate_compatibility, search, RecommendationEngine};
use roommate_match::models::{
    Budget, BudgetFilter, Cleanliness, FoodPreference, Lifestyle, LifestyleFilter, RoommateProfile,
    SearchFilters, WorkSchedule,
};
use chrono::Utc;

const AREAS: [&str; 6] = ["Andheri", "Bandra", "Powai", "Thane", "Juhu", "Dadar"];

fn create_candidate(id: usize) -> RoommateProfile {
    let min = 8000.0 + (id % 20) as f64 * 500.0;
    RoommateProfile {
        id: id.to_string(),
        first_name: format!("User {}", id),
        last_name: "Test".to_string(),
        email: format!("user{}@example.com", id),
        phone: None,
        avatar_url: None,
        budget: Budget::new(min, min + 6000.0),
        preferred_locations: AREAS
            .iter()
            .skip(id % AREAS.len())
            .take(1 + id % 3)
            .map(|a| a.to_string())
            .collect(),
        lifestyle: Lifestyle {
            smoking: id % 4 == 0,
            pets: id % 3 == 0,
            drinking: id % 2 == 0,
            food_preference: Some(if id % 2 == 0 { FoodPreference::Vegetarian } else { FoodPreference::NoPreference }),
            work_schedule: Some(WorkSchedule::Day),
            cleanliness: Some(if id % 3 == 0 { Cleanliness::VeryClean } else { Cleanliness::Moderate }),
        },
        bio: "Bench profile".to_string(),
        looking_for: "Bench roommate".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn bench_compatibility(c: &mut Criterion) {
    let me = create_candidate(0);
    let other = create_candidate(7);

    c.bench_function("calculate_compatibility", |b| {
        b.iter(|| calculate_compatibility(black_box(&me), black_box(&other)));
    });
}

fn bench_recommendations(c: &mut Criterion) {
    let engine = RecommendationEngine::default();
    let me = create_candidate(0);

    let mut group = c.benchmark_group("recommendations");

    for candidate_count in [10, 100, 1000, 5000].iter() {
        let candidates: Vec<RoommateProfile> = (1..=*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("recommend_top", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| engine.recommend_top(black_box(&me), black_box(candidates.clone()), black_box(5)));
            },
        );
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let candidates: Vec<RoommateProfile> = (0..1000).map(create_candidate).collect();
    let filters = SearchFilters {
        budget: BudgetFilter {
            min: Some(9000.0),
            max: Some(20000.0),
        },
        locations: vec!["Andheri".to_string(), "Powai".to_string()],
        lifestyle: LifestyleFilter {
            smoking: Some(false),
            ..Default::default()
        },
    };

    c.bench_function("search_1000_candidates", |b| {
        b.iter(|| search(black_box(candidates.clone()), black_box(&filters), black_box("0")));
    });
}

criterion_group!(benches, bench_compatibility, bench_recommendations, bench_search);

criterion_main!(benches);
