//! Secret string type for access tokens.

use serde::Deserialize;
use std::fmt;

/// A wrapper for secrets that keeps them out of logs.
///
/// `Debug` and `Display` print `[REDACTED]`; the value is only reachable
/// through [`SecretString::expose_secret`].
///
/// # Example
/// ```ignore
/// let token = SecretString::new("glpat-xxxx");
/// assert_eq!(format!("{:?}", token), "[REDACTED]");
/// let header_value = token.expose_secret();
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret from any string-like value.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Explicitly expose the secret value.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// True if the secret is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // Best effort only: the compiler may elide this and copies may exist elsewhere.
        self.0.clear();
        self.0.shrink_to_fit();
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacted() {
        let secret = SecretString::new("glpat-secret");
        let debug_output = format!("{:?}", secret);
        assert_eq!(debug_output, "[REDACTED]");
        assert!(!debug_output.contains("glpat-secret"));
    }

    #[test]
    fn test_display_redacted() {
        let secret = SecretString::new("glpat-secret");
        assert_eq!(format!("{}", secret), "[REDACTED]");
    }

    #[test]
    fn test_expose_secret() {
        let secret = SecretString::from("glpat-secret");
        assert_eq!(secret.expose_secret(), "glpat-secret");
    }

    #[test]
    fn test_is_blank() {
        assert!(SecretString::new("").is_blank());
        assert!(SecretString::new("  ").is_blank());
        assert!(!SecretString::new("glpat-x").is_blank());
    }

    #[test]
    fn test_deserialize() {
        let secret: SecretString = serde_json::from_str(r#""test-token""#).unwrap();
        assert_eq!(secret.expose_secret(), "test-token");
    }
}
