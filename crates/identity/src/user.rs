//! User account records.
//!
//! Credentials are stored as an opaque, already-hashed string; hashing and
//! token issuance happen upstream of this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gamevault_auth::Role;
use gamevault_core::{DomainError, UserId};

/// A registered user account.
///
/// # Invariants
/// - Email is unique per store (enforced by the storage layer).
/// - Role gates catalog mutation and purchase eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
}

impl NewUser {
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
    ) -> Result<Self, DomainError> {
        let email = email.into().trim().to_lowercase();
        let password_hash = password_hash.into();
        let display_name = display_name.into().trim().to_string();

        validate_email(&email)?;
        if password_hash.is_empty() {
            return Err(DomainError::validation("credential must not be empty"));
        }
        if display_name.is_empty() {
            return Err(DomainError::validation("display name must not be empty"));
        }

        Ok(Self {
            email,
            password_hash,
            display_name,
            role,
        })
    }

    /// Materialize the account record with a fresh id and timestamp.
    pub fn into_account(self, now: DateTime<Utc>) -> UserAccount {
        UserAccount {
            id: UserId::new(),
            email: self.email,
            password_hash: self.password_hash,
            display_name: self.display_name,
            role: self.role,
            created_at: now,
        }
    }
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    // Intentionally shallow: uniqueness and deliverability are not a domain
    // concern, only obviously malformed input is rejected here.
    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::validation("email must contain '@'"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(DomainError::validation("email is malformed"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_normalizes_email() {
        let new = NewUser::new("  Buyer@Example.COM ", "hash", "Buyer", Role::User).unwrap();
        assert_eq!(new.email, "buyer@example.com");
    }

    #[test]
    fn rejects_malformed_email() {
        for bad in ["", "no-at-sign", "@example.com", "x@", "x@nodot"] {
            assert!(
                NewUser::new(bad, "hash", "name", Role::User).is_err(),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn rejects_empty_display_name_and_credential() {
        assert!(NewUser::new("a@b.com", "", "name", Role::User).is_err());
        assert!(NewUser::new("a@b.com", "hash", "   ", Role::User).is_err());
    }

    #[test]
    fn materializes_account_with_given_role() {
        let now = Utc::now();
        let account = NewUser::new("p@studio.io", "hash", "Studio", Role::Publisher)
            .unwrap()
            .into_account(now);
        assert_eq!(account.role, Role::Publisher);
        assert_eq!(account.created_at, now);
    }
}
