//! Authentication module
//!
//! GitLab access is authenticated with a personal (or project) access token
//! sent in the `PRIVATE-TOKEN` header.

pub mod provider;
pub mod token;

pub use provider::{AuthHeader, AuthProvider, BoxedAuthProvider};
pub use token::PatProvider;

use crate::config::GitLabConfig;
use crate::error::AuthError;

/// Create an auth provider from configuration, falling back to `GITLAB_TOKEN`
pub fn create_auth_provider(config: &GitLabConfig) -> Result<BoxedAuthProvider, AuthError> {
    match &config.token {
        Some(token) => Ok(Box::new(PatProvider::new(token.expose_secret())?)),
        None => Ok(Box::new(PatProvider::from_env()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::SecretString;

    #[test]
    fn test_create_from_config_token() {
        let config = GitLabConfig {
            token: Some(SecretString::new("glpat-config")),
            ..Default::default()
        };
        let provider = create_auth_provider(&config).unwrap();
        assert_eq!(provider.auth_type(), "Personal Access Token");
    }

    #[test]
    fn test_create_rejects_empty_config_token() {
        let config = GitLabConfig {
            token: Some(SecretString::new("")),
            ..Default::default()
        };
        assert!(matches!(
            create_auth_provider(&config),
            Err(AuthError::InvalidToken)
        ));
    }
}
