//! Personal Access Token authentication

use crate::auth::provider::{AuthHeader, AuthProvider};
use crate::error::AuthError;
use crate::util::SecretString;
use async_trait::async_trait;

/// Environment variable holding the GitLab access token
pub const TOKEN_ENV_VAR: &str = "GITLAB_TOKEN";

/// Personal Access Token authentication provider
#[derive(Debug, Clone)]
pub struct PatProvider {
    token: SecretString,
}

impl PatProvider {
    /// Create a new PAT provider, rejecting empty tokens
    pub fn new(token: impl Into<String>) -> Result<Self, AuthError> {
        let token = SecretString::new(token);

        if token.is_blank() {
            return Err(AuthError::InvalidToken);
        }

        Ok(Self { token })
    }

    /// Create from the `GITLAB_TOKEN` environment variable
    pub fn from_env() -> Result<Self, AuthError> {
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.trim().is_empty() => Self::new(token),
            _ => Err(AuthError::NotConfigured),
        }
    }
}

#[async_trait]
impl AuthProvider for PatProvider {
    async fn get_auth_header(&self) -> Result<AuthHeader, AuthError> {
        Ok(AuthHeader::private_token(self.token.clone()))
    }

    fn auth_type(&self) -> &'static str {
        "Personal Access Token"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_pat_provider_new() {
        let provider = PatProvider::new("glpat-xxxx").unwrap();
        assert_eq!(provider.token.expose_secret(), "glpat-xxxx");
    }

    #[test]
    fn test_pat_provider_empty_token() {
        assert!(matches!(
            PatProvider::new(""),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            PatProvider::new("   "),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_pat_provider_debug_is_redacted() {
        let provider = PatProvider::new("glpat-xxxx").unwrap();
        assert!(!format!("{:?}", provider).contains("glpat-xxxx"));
    }

    #[tokio::test]
    async fn test_pat_provider_auth_header() {
        let provider = PatProvider::new("test-token").unwrap();
        let header = provider.get_auth_header().await.unwrap();

        assert_eq!(header.header_name(), "PRIVATE-TOKEN");
        assert_eq!(header.header_value(), "test-token");
    }

    #[test]
    #[serial]
    fn test_from_env_missing() {
        // SAFETY: serialized with the other env-mutating tests
        unsafe { std::env::remove_var(TOKEN_ENV_VAR) };
        assert!(matches!(
            PatProvider::from_env(),
            Err(AuthError::NotConfigured)
        ));
    }

    #[test]
    #[serial]
    fn test_from_env_present() {
        // SAFETY: serialized with the other env-mutating tests
        unsafe { std::env::set_var(TOKEN_ENV_VAR, "glpat-env") };
        let provider = PatProvider::from_env().unwrap();
        assert_eq!(provider.token.expose_secret(), "glpat-env");
        unsafe { std::env::remove_var(TOKEN_ENV_VAR) };
    }
}
