// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use cache::{CacheKey, CachedProfileRepository};
pub use memory::InMemoryProfileRepository;
pub use postgres::PostgresProfileRepository;
pub use repository::{ProfileRepository, ProfileSubscription, RepositoryError};
