//! JWT utilities for authentication
//!
//! Access tokens are minted by the identity provider. The backend validates
//! them and reads the user id from `sub`; roles always come from the profile
//! row, never from the token.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use squad_core::Id;

use crate::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Claims {
    /// Get the user ID from the subject
    ///
    /// # Errors
    /// Returns an error if the subject is not a UUID
    pub fn user_id(&self) -> Result<Id, AppError> {
        Id::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// JWT service for validating (and, for local development, issuing) tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
    access_token_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and expiry
    #[must_use]
    pub fn new(secret: &str, access_token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: None,
            access_token_expiry,
        }
    }

    /// Require (and stamp) the given `iss` claim
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Issue an access token for a user
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn generate_access_token(&self, user_id: Id) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iss: self.issuer.clone(),
            email: None,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))
    }

    /// Decode and validate a JWT token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validate an access token and return the caller's user id
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or has a non-UUID subject
    pub fn validate_access_token(&self, token: &str) -> Result<Id, AppError> {
        self.decode_token(token)?.user_id()
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.issuer)
            .field("access_token_expiry", &self.access_token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret-key-that-is-long-enough", 900)
    }

    #[test]
    fn test_generate_and_validate() {
        let service = create_test_service();
        let user_id = Id::new();

        let token = service.generate_access_token(user_id).unwrap();
        assert!(!token.is_empty());

        assert_eq!(service.validate_access_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_decode_claims() {
        let service = create_test_service();
        let user_id = Id::new();

        let token = service.generate_access_token(user_id).unwrap();
        let claims = service.decode_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert!(!claims.is_expired());
        assert!(claims.iss.is_none());
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();

        let result = service.decode_token("invalid.token.here");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret() {
        let token = create_test_service()
            .generate_access_token(Id::new())
            .unwrap();
        let other = JwtService::new("a-completely-different-secret-key", 900);
        assert!(matches!(
            other.validate_access_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        // Past the default 60s leeway
        let service = JwtService::new("test-secret-key-that-is-long-enough", -120);
        let token = service.generate_access_token(Id::new()).unwrap();
        assert!(matches!(
            service.decode_token(&token),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_issuer_enforced() {
        let issuing = create_test_service().with_issuer("https://auth.squadup.gg");
        let token = issuing.generate_access_token(Id::new()).unwrap();
        assert!(issuing.validate_access_token(&token).is_ok());

        let untagged = create_test_service().generate_access_token(Id::new()).unwrap();
        assert!(issuing.validate_access_token(&untagged).is_err());
    }

    #[test]
    fn test_claims_user_id() {
        let user_id = Id::new();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: 0,
            exp: i64::MAX,
            iss: None,
            email: None,
        };
        assert_eq!(claims.user_id().unwrap(), user_id);

        let claims = Claims {
            sub: "12345".to_string(),
            ..claims
        };
        assert!(matches!(claims.user_id(), Err(AppError::InvalidToken)));
    }
}
