//! Authentication provider trait

use crate::error::AuthError;
use crate::util::SecretString;
// async_trait required for dyn-compatibility with Box<dyn AuthProvider>
use async_trait::async_trait;

/// Supplies credentials for GitLab API requests.
///
/// The client holds one provider for its whole lifetime, so several clients
/// with different credentials can run side by side.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Get the header to attach to every request
    async fn get_auth_header(&self) -> Result<AuthHeader, AuthError>;

    /// Get a description of the auth method (for logging)
    fn auth_type(&self) -> &'static str;
}

/// Authentication header to use with requests
#[derive(Debug, Clone)]
pub struct AuthHeader {
    name: &'static str,
    value: SecretString,
}

impl AuthHeader {
    /// `PRIVATE-TOKEN: <token>` header used by GitLab access tokens
    pub fn private_token(token: SecretString) -> Self {
        Self {
            name: "PRIVATE-TOKEN",
            value: token,
        }
    }

    /// Get the header name
    pub fn header_name(&self) -> &'static str {
        self.name
    }

    /// Get the header value
    pub fn header_value(&self) -> &str {
        self.value.expose_secret()
    }
}

/// Box type alias for auth providers
pub type BoxedAuthProvider = Box<dyn AuthProvider>;
