use thiserror::Error;

use crate::services::RepositoryError;

/// Errors surfaced by profile operations
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("user must be signed in to {0}")]
    NotAuthenticated(&'static str),

    #[error("no roommate profile exists for user {0}")]
    ProfileNotFound(String),

    #[error("invalid profile: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("profile repository unavailable: {0}")]
    RepositoryUnavailable(#[from] RepositoryError),
}

impl ProfileError {
    /// Short machine-readable kind, used in API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            ProfileError::NotAuthenticated(_) => "not_authenticated",
            ProfileError::ProfileNotFound(_) => "profile_not_found",
            ProfileError::Validation(_) => "validation_error",
            ProfileError::RepositoryUnavailable(_) => "repository_unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_repository_cause_is_preserved() {
        let err = ProfileError::from(RepositoryError::Unavailable("connection refused".to_string()));

        assert_eq!(err.kind(), "repository_unavailable");
        let source = err.source().expect("cause should be kept");
        assert!(source.to_string().contains("connection refused"));
    }
}
