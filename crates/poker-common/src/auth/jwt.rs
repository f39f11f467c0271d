//! JWT validation for authenticated participants
//!
//! Tokens are HS256-signed by the account service; this side only verifies
//! them. `issue_token` exists for local tooling and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (participant ID)
    pub sub: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Participant ID carried by the token
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Name to show in the room, falling back to the subject
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(&self.sub)
    }

    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// JWT service for validating tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Create a new JWT service with the given HS256 secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for a participant
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_token(
        &self,
        user_id: &str,
        username: Option<&str>,
        ttl_seconds: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))
    }

    /// Decode and validate a token
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or has an empty subject
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                    _ => AppError::InvalidToken,
                }
            })?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(AppError::InvalidToken);
        }

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret-key-that-is-long-enough")
    }

    #[test]
    fn test_issue_and_validate() {
        let service = create_test_service();
        let token = service.issue_token("U1", Some("alice"), 900).unwrap();

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.user_id(), "U1");
        assert_eq!(claims.display_name(), "alice");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_display_name_falls_back_to_subject() {
        let service = create_test_service();
        let token = service.issue_token("U1", None, 900).unwrap();

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.display_name(), "U1");
    }

    #[test]
    fn test_expired_token() {
        let service = create_test_service();
        // Past the default 60s leeway
        let token = service.issue_token("U1", Some("alice"), -3600).unwrap();

        assert!(matches!(service.validate(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret() {
        let token = create_test_service()
            .issue_token("U1", Some("alice"), 900)
            .unwrap();
        let other = JwtService::new("another-secret-entirely");

        assert!(matches!(other.validate(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();

        let result = service.validate("invalid.token.here");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }
}
