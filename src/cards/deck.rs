//! The player's run deck.
//!
//! The deck persists across battles. Each entry remembers whether it came
//! from the starter list, because corruption only ever rewrites cards the
//! player picked up along the way. Cards earned after a battle wait in a
//! queue and join the deck when the next battle begins.

use serde::{Deserialize, Serialize};

use super::catalog::CardCatalog;
use super::definition::CardId;
use crate::core::GameRng;

/// One card in the deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card: CardId,
    pub starter: bool,
}

/// Run-level deck plus the next-battle queue.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    entries: Vec<DeckEntry>,
    queued: Vec<CardId>,
}

impl Deck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deck made of starter cards.
    #[must_use]
    pub fn from_starter(cards: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            entries: cards
                .into_iter()
                .map(|card| DeckEntry { card, starter: true })
                .collect(),
            queued: Vec::new(),
        }
    }

    /// Add a non-starter card immediately.
    pub fn add(&mut self, card: CardId) {
        self.entries.push(DeckEntry { card, starter: false });
    }

    #[must_use]
    pub fn entries(&self) -> &[DeckEntry] {
        &self.entries
    }

    /// Cards waiting for the next battle.
    #[must_use]
    pub fn queued(&self) -> &[CardId] {
        &self.queued
    }

    /// Number of cards in the deck, queue excluded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if `card` is in the deck or waiting in the queue.
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.entries.iter().any(|e| e.card == card) || self.queued.contains(&card)
    }

    pub fn queue_for_next_battle(&mut self, card: CardId) {
        log::debug!("queued {card} for next battle");
        self.queued.push(card);
    }

    /// Merge the queue into the deck and return the battle's card list.
    pub fn begin_battle(&mut self) -> Vec<CardId> {
        for card in self.queued.drain(..) {
            self.entries.push(DeckEntry { card, starter: false });
        }
        self.entries.iter().map(|e| e.card).collect()
    }

    /// Rewrite one random non-starter, non-curse card into `to`.
    ///
    /// Returns the card that was replaced, or `None` if nothing qualified.
    pub fn try_transform_random_non_starter_non_curse(
        &mut self,
        to: CardId,
        catalog: &CardCatalog,
        rng: &mut GameRng,
    ) -> Option<CardId> {
        let eligible: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.starter)
            .filter(|(_, e)| catalog.get(e.card).is_some_and(|c| !c.is_curse()))
            .map(|(i, _)| i)
            .collect();

        let &index = rng.choose(&eligible)?;
        let from = std::mem::replace(&mut self.entries[index].card, to);
        log::debug!("transformed {from} into {to}");
        Some(from)
    }
}
