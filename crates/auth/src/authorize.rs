use std::collections::HashSet;

use thiserror::Error;

use gamevault_core::UserId;

use crate::{Grant, Permission};

/// A fully resolved principal for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub grant: Grant,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Authorize a principal against a required permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let perms: HashSet<&str> = principal
        .grant
        .permissions
        .iter()
        .map(|p| p.as_str())
        .collect();

    if perms.contains("*") || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    fn principal(permissions: Vec<Permission>) -> Principal {
        Principal {
            user_id: UserId::new(),
            grant: Grant::new(Role::User, permissions),
        }
    }

    #[test]
    fn wildcard_grants_everything() {
        let p = principal(vec![Permission::new("*")]);
        assert!(authorize(&p, &Permission::new("games.create")).is_ok());
    }

    #[test]
    fn exact_permission_is_granted() {
        let p = principal(vec![Permission::new("checkout.purchase")]);
        assert!(authorize(&p, &Permission::new("checkout.purchase")).is_ok());
    }

    #[test]
    fn missing_permission_is_forbidden() {
        let p = principal(vec![Permission::new("games.read")]);
        let err = authorize(&p, &Permission::new("games.create")).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden("games.create".to_string()));
    }
}
