//! API-side authorization guard.
//!
//! Enforces role-based permissions at the route boundary, keeping the domain
//! crates and the storage layer auth-agnostic.

use gamevault_auth::{authorize, AuthzError, Grant, Permission, Principal, Role};

use crate::context::PrincipalContext;

/// Check that the request's principal holds `permission`.
///
/// Intended to be called at the top of every mutating handler.
pub fn require(principal: &PrincipalContext, permission: &'static str) -> Result<(), AuthzError> {
    let grant = Grant::new(principal.role(), permissions_for_role(principal.role()));
    let resolved = Principal {
        user_id: principal.user_id(),
        grant,
    };
    authorize(&resolved, &Permission::new(permission))
}

/// Static role→permission policy.
///
/// - `admin` holds everything;
/// - `publisher` manages the catalog;
/// - `user` purchases.
///
/// Reads on catalog resources are open to any authenticated principal and are
/// not listed here.
fn permissions_for_role(role: Role) -> Vec<Permission> {
    match role {
        Role::Admin => vec![Permission::new("*")],
        Role::Publisher => vec![
            Permission::new("games.create"),
            Permission::new("games.update"),
            Permission::new("publishers.create"),
            Permission::new("categories.create"),
            Permission::new("categories.delete"),
        ],
        Role::User => vec![Permission::new("checkout.purchase")],
    }
}
