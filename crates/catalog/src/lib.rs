//! `gamevault-catalog` — games, categories, publishers.

pub mod category;
pub mod game;
pub mod publisher;

pub use category::Category;
pub use game::{Game, GameUpdate, NewGame};
pub use publisher::Publisher;
