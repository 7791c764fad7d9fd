use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gamevault_core::{DomainError, PublisherId};

/// A publishing studio owning catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: PublisherId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Publisher {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("publisher name must not be empty"));
        }
        Ok(Self {
            id: PublisherId::new(),
            name,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        assert!(Publisher::new("  ", Utc::now()).is_err());
        assert!(Publisher::new("Iron Owl Games", Utc::now()).is_ok());
    }
}
