use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gamevault_core::{CategoryId, DomainError};

/// A catalog category (genre/tag).
///
/// Names are unique per store. Deleting a category detaches it from games;
/// it never cascades into game deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("category name must not be empty"));
        }
        Ok(Self {
            id: CategoryId::new(),
            name,
            created_at: now,
        })
    }
}
