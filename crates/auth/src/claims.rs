use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gamevault_core::UserId;

use crate::Role;

/// JWT claims model (transport-agnostic).
///
/// This is the minimal set of claims GameVault expects once a token has been
/// decoded/verified by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject / authenticated user identifier.
    pub sub: UserId,

    /// Role granted to the subject.
    pub role: Role,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// lives in [`crate::jwt`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued: DateTime<Utc>, expires: DateTime<Utc>) -> JwtClaims {
        JwtClaims {
            sub: UserId::new(),
            role: Role::User,
            issued_at: issued,
            expires_at: expires,
        }
    }

    #[test]
    fn accepts_token_inside_window() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(1), now + Duration::minutes(10));
        assert!(validate_claims(&c, now).is_ok());
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(20), now - Duration::minutes(1));
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::Expired));
    }

    #[test]
    fn rejects_token_from_the_future() {
        let now = Utc::now();
        let c = claims(now + Duration::minutes(1), now + Duration::minutes(10));
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        let c = claims(now, now - Duration::minutes(1));
        assert_eq!(
            validate_claims(&c, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
