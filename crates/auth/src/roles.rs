use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account role used for RBAC.
///
/// The role set is closed: buyers purchase, publishers manage their catalog
/// entries, admins manage everything. Mapping roles to permissions is done by
/// the caller/policy layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Publisher,
    Admin,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Publisher => "publisher",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "publisher" => Ok(Role::Publisher),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
