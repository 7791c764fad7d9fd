use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gamevault_core::{CategoryId, DomainError, GameId, Money, PublisherId};

/// A game in the catalog.
///
/// # Invariants
/// - The identifier and owning publisher are immutable after creation.
/// - Price, description, image, and categories are mutable via [`GameUpdate`].
/// - Referenced publisher and categories must exist (enforced by the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub title: String,
    pub price: Money,
    pub description: String,
    pub image_url: String,
    pub publisher_id: PublisherId,
    pub categories: Vec<CategoryId>,
    pub created_at: DateTime<Utc>,
}

/// Validated catalog-insert input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub title: String,
    pub price: Money,
    pub description: String,
    pub image_url: String,
    pub publisher_id: PublisherId,
    pub categories: Vec<CategoryId>,
}

impl NewGame {
    pub fn new(
        title: impl Into<String>,
        price: Money,
        description: impl Into<String>,
        image_url: impl Into<String>,
        publisher_id: PublisherId,
        mut categories: Vec<CategoryId>,
    ) -> Result<Self, DomainError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("title must not be empty"));
        }

        categories.sort();
        categories.dedup();

        Ok(Self {
            title,
            price,
            description: description.into(),
            image_url: image_url.into(),
            publisher_id,
            categories,
        })
    }

    pub fn into_game(self, now: DateTime<Utc>) -> Game {
        Game {
            id: GameId::new(),
            title: self.title,
            price: self.price,
            description: self.description,
            image_url: self.image_url,
            publisher_id: self.publisher_id,
            categories: self.categories,
            created_at: now,
        }
    }
}

/// Partial update of a game's mutable fields; `None` leaves a field as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameUpdate {
    pub price: Option<Money>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub categories: Option<Vec<CategoryId>>,
}

impl GameUpdate {
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.categories.is_none()
    }

    /// Apply the update to an existing record.
    pub fn apply(self, game: &mut Game) {
        if let Some(price) = self.price {
            game.price = price;
        }
        if let Some(description) = self.description {
            game.description = description;
        }
        if let Some(image_url) = self.image_url {
            game.image_url = image_url;
        }
        if let Some(mut categories) = self.categories {
            categories.sort();
            categories.dedup();
            game.categories = categories;
        }
    }
}
