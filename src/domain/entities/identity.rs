//! Identity entity - the authenticated session record

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Authenticated user identity as returned by `POST /login`.
///
/// This is the only record the client persists. It is replaced wholesale on
/// every login and the token is wiped from memory when the value is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Identity {
    username: String,
    access_token: String,
    token_type: String,
}

impl Identity {
    /// Create a new Identity, rejecting records with missing parts
    pub fn new(username: &str, access_token: &str, token_type: &str) -> Result<Self, String> {
        let identity = Self {
            username: username.to_string(),
            access_token: access_token.to_string(),
            token_type: token_type.to_string(),
        };
        identity.validate()?;
        Ok(identity)
    }

    /// Check that every field is populated
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username is missing".to_string());
        }
        if self.access_token.trim().is_empty() {
            return Err("access_token is missing".to_string());
        }
        if self.token_type.trim().is_empty() {
            return Err("token_type is missing".to_string());
        }
        Ok(())
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Value for the `Authorization` header.
    ///
    /// The backend only issues bearer tokens, so the scheme is fixed
    /// regardless of the casing of `token_type`.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Login form payload
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Result<Self, String> {
        if username.trim().is_empty() {
            return Err("Username is required".to_string());
        }
        if password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(Self {
            username: username.trim().to_string(),
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_new_valid() {
        let identity = Identity::new("alice", "tok-123", "bearer").unwrap();
        assert_eq!(identity.username(), "alice");
        assert_eq!(identity.access_token(), "tok-123");
        assert_eq!(identity.token_type(), "bearer");
    }

    #[test]
    fn test_identity_rejects_empty_token() {
        let result = Identity::new("alice", "", "bearer");
        assert_eq!(result.unwrap_err(), "access_token is missing");
    }

    #[test]
    fn test_identity_rejects_blank_username() {
        assert!(Identity::new("  ", "tok", "bearer").is_err());
    }

    #[test]
    fn test_authorization_header_uses_bearer_scheme() {
        let identity = Identity::new("alice", "tok-123", "bearer").unwrap();
        assert_eq!(identity.authorization_header(), "Bearer tok-123");
    }

    #[test]
    fn test_debug_redacts_token() {
        let identity = Identity::new("alice", "super-secret", "bearer").unwrap();
        let debug = format!("{:?}", identity);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_identity_wire_format_round_trip() {
        let json = r#"{"access_token":"abc","token_type":"bearer","username":"bob"}"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.username(), "bob");
        let back = serde_json::to_value(&identity).unwrap();
        assert_eq!(back["access_token"], "abc");
    }

    #[test]
    fn test_credentials_require_password() {
        assert!(Credentials::new("alice", "").is_err());
        assert!(Credentials::new("", "pw").is_err());
        assert_eq!(Credentials::new(" alice ", "pw").unwrap().username, "alice");
    }
}
