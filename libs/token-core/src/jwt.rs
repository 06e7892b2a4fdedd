//! Shared JWT signing and validation for the blog platform services
//!
//! All services share one symmetric secret (`JWT_SECRET_KEY`) and one claim
//! layout, so a token issued by the identity service is verifiable by every
//! other service without a network round trip.
//!
//! ## Design
//!
//! - **HS256 only**: one shared secret, no algorithm negotiation
//! - **No ambient key state**: `TokenSigner` / `TokenVerifier` are built once
//!   from configuration at startup and handed to application state explicitly
//! - **`user_id` is optional on decode**: a structurally valid token without
//!   the identity claim still decodes, so callers can reject it with a claim
//!   error instead of a signature error

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

pub const DEFAULT_ACCESS_TOKEN_EXPIRY_SECS: i64 = 3600;
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_SECS: i64 = 30 * 24 * 3600;

/// JWT algorithm - every service signs and verifies with the same shared secret
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT Claims structure - standard claims plus the shared identity claim
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Numeric user id, the identity claim consumed by downstream services.
    /// Optional so tokens missing it decode and can be rejected explicitly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
    /// Unique token id
    pub jti: String,
}

/// Token pair response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Token handling failures, split so callers can map them to distinct
/// HTTP statuses
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token signing failed: {0}")]
    Signing(String),
}

// ============================================================================
// Token Generation
// ============================================================================

/// Issues access and refresh tokens with the shared secret.
///
/// Only the identity service holds a signer; every other service verifies.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        }
    }

    /// Generate a new access token
    ///
    /// Access tokens are short-lived and used for API authentication.
    pub fn issue_access_token(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        self.issue(user_id, username, "access", self.access_ttl)
    }

    /// Generate a new refresh token
    ///
    /// Refresh tokens live longer and are only exchanged for new access tokens.
    pub fn issue_refresh_token(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        self.issue(user_id, username, "refresh", self.refresh_ttl)
    }

    /// Generate both access and refresh tokens in one call
    pub fn issue_pair(&self, user_id: i64, username: &str) -> Result<TokenPair, TokenError> {
        let access_token = self.issue_access_token(user_id, username)?;
        let refresh_token = self.issue_refresh_token(user_id, username)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    fn issue(
        &self,
        user_id: i64,
        username: &str,
        token_type: &str,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let expiry = now + ttl;

        let claims = Claims {
            sub: username.to_string(),
            user_id: Some(user_id),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            token_type: token_type.to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

// ============================================================================
// Token Validation
// ============================================================================

/// Verifies tokens signed with the shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate and decode a JWT token
    ///
    /// Verifies the HS256 signature and the expiry. Returns the decoded
    /// claims; `user_id` may still be `None` and must be checked by the
    /// caller where the identity claim is required.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-at-least-32-bytes-long!!";

    fn signer() -> TokenSigner {
        TokenSigner::new(
            TEST_SECRET,
            DEFAULT_ACCESS_TOKEN_EXPIRY_SECS,
            DEFAULT_REFRESH_TOKEN_EXPIRY_SECS,
        )
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(TEST_SECRET)
    }

    #[test]
    fn test_issue_access_token() {
        let token = signer().issue_access_token(42, "alice");

        assert!(token.is_ok());
        let token_str = token.unwrap();
        assert_eq!(token_str.matches('.').count(), 2); // JWT has 3 parts
    }

    #[test]
    fn test_verify_valid_token() {
        let token = signer()
            .issue_access_token(42, "alice")
            .expect("Failed to generate token");

        let claims = verifier().verify(&token).expect("Failed to verify token");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.user_id, Some(42));
        assert_eq!(claims.token_type, "access");
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_verify_invalid_token() {
        let result = verifier().verify("invalid.token.here");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_tampered_token() {
        let token = signer()
            .issue_access_token(42, "alice")
            .expect("Failed to generate token");

        // Tamper with the signature segment
        let tampered = format!("{token}x");
        assert!(verifier().verify(&tampered).is_err());
    }

    #[test]
    fn test_verify_wrong_secret() {
        let token = signer()
            .issue_access_token(42, "alice")
            .expect("Failed to generate token");

        let other = TokenVerifier::new("a-completely-different-secret-value");
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_expired_token() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "alice".to_string(),
            user_id: Some(42),
            iat: now - 7200,
            exp: now - 3600,
            token_type: "access".to_string(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("Failed to encode expired token");

        assert!(matches!(
            verifier().verify(&token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_missing_user_id_claim_still_decodes() {
        let now = Utc::now().timestamp();
        let claims = serde_json::json!({
            "sub": "alice",
            "iat": now,
            "exp": now + 3600,
            "token_type": "access",
            "jti": Uuid::new_v4().to_string(),
        });
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("Failed to encode token");

        let decoded = verifier().verify(&token).expect("Failed to verify token");
        assert_eq!(decoded.user_id, None);
        assert_eq!(decoded.sub, "alice");
    }

    #[test]
    fn test_token_pair_generation() {
        let response = signer().issue_pair(42, "alice");

        assert!(response.is_ok());
        let tokens = response.unwrap();

        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, DEFAULT_ACCESS_TOKEN_EXPIRY_SECS);

        let v = verifier();
        assert_eq!(
            v.verify(&tokens.access_token).unwrap().token_type,
            "access"
        );
        assert_eq!(
            v.verify(&tokens.refresh_token).unwrap().token_type,
            "refresh"
        );
    }

    #[test]
    fn test_refresh_token_longer_expiry() {
        let pair = signer().issue_pair(42, "alice").expect("Failed to issue pair");

        let v = verifier();
        let access_claims = v.verify(&pair.access_token).unwrap();
        let refresh_claims = v.verify(&pair.refresh_token).unwrap();

        assert!(refresh_claims.exp > access_claims.exp);
    }
}
