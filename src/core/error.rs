//! Error types.
//!
//! Only setup misuse is reported as an error. Game-rule outcomes such as a
//! rejected card play are ordinary values (see `effects::PlayRejected`).

use thiserror::Error;

use crate::cards::CardId;

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be at least 1")]
    ZeroCount { name: &'static str },
}

/// Inconsistent card catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{context} references undefined card {card}")]
    UnknownCard { card: CardId, context: &'static str },

    #[error("card {card} is defined twice")]
    DuplicateCard { card: CardId },

    #[error("starter deck is empty")]
    EmptyStarterDeck,

    #[error("corruption card {card} must have Curse rarity")]
    CorruptionCardNotCurse { card: CardId },
}

/// Anything that stops a run from being set up.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}
