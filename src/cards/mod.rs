//! Card system: definitions, catalog, and the run deck.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data with an ordered effect list
//! - `CardCatalog`: Definition lookup plus starter deck, pools, negatives
//! - `Deck`: Cards the player owns across battles
//!
//! Piles, decks and reward offers only ever hold `CardId`s; the catalog is
//! the single owner of card data.

pub mod catalog;
pub mod deck;
pub mod definition;

pub use catalog::{CardCatalog, StarterEntry};
pub use deck::{Deck, DeckEntry};
pub use definition::{BodyTag, CardDefinition, CardFamily, CardId, CardRarity};
