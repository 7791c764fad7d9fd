//! Bearer token decoding and verification.
//!
//! Token *issuance* is an upstream concern; this module only verifies
//! signatures and delegates time-window checks to [`crate::validate_claims`].

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::claims::{validate_claims, JwtClaims, TokenValidationError};

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies a bearer token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError>;
}

/// HS256 (shared-secret) token validator.
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: Vec<u8>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Claims carry RFC3339 timestamps, not numeric `exp`; the time window
        // is checked by `validate_claims` instead.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            key: DecodingKey::from_secret(&secret),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.key, &self.validation)
            .map_err(|e| JwtError::Malformed(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gamevault_core::UserId;
    use jsonwebtoken::{EncodingKey, Header};

    use crate::Role;

    fn mint(secret: &str, claims: &JwtClaims) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_valid_token() {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: UserId::new(),
            role: Role::Admin,
            issued_at: now - Duration::minutes(1),
            expires_at: now + Duration::minutes(10),
        };
        let token = mint("secret", &claims);

        let validator = Hs256JwtValidator::new(b"secret".to_vec());
        let decoded = validator.validate(&token, now).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn rejects_wrong_secret() {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: UserId::new(),
            role: Role::User,
            issued_at: now,
            expires_at: now + Duration::minutes(10),
        };
        let token = mint("secret-a", &claims);

        let validator = Hs256JwtValidator::new(b"secret-b".to_vec());
        assert!(matches!(
            validator.validate(&token, now),
            Err(JwtError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: UserId::new(),
            role: Role::User,
            issued_at: now - Duration::minutes(20),
            expires_at: now - Duration::minutes(5),
        };
        let token = mint("secret", &claims);

        let validator = Hs256JwtValidator::new(b"secret".to_vec());
        assert!(matches!(
            validator.validate(&token, now),
            Err(JwtError::Claims(TokenValidationError::Expired))
        ));
    }
}
