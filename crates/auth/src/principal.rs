use serde::{Deserialize, Serialize};

use crate::{Permission, Role};

/// A resolved set of permissions granted to a role.
///
/// This is an authorization boundary object: construction is intentionally
/// decoupled from storage and transport, so the API layer (or a future
/// policy source) decides how roles map to permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub role: Role,
    pub permissions: Vec<Permission>,
}

impl Grant {
    pub fn new(role: Role, permissions: Vec<Permission>) -> Self {
        Self { role, permissions }
    }
}
