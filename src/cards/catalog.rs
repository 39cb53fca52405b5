//! Card catalog: every card definition plus the lists that give cards a
//! role in a run (starter deck, reward pools, negatives).
//!
//! Lookup by `CardId` is an `FxHashMap`. The catalog is built once at
//! startup, checked with [`CardCatalog::validate`], and read-only after.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardFamily, CardId};
use crate::core::CatalogError;

/// Starter deck line: `count` copies of `card`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarterEntry {
    pub card: CardId,
    pub count: usize,
}

/// All card data a run needs.
///
/// ## Example
///
/// ```
/// use harvest_core::cards::{CardCatalog, CardDefinition, CardFamily, CardId};
///
/// let catalog = CardCatalog::new()
///     .with_card(
///         CardDefinition::new(CardId::new(1), "Strike", CardFamily::Neutral).with_damage(6),
///     )
///     .with_card(CardDefinition::new(CardId::new(2), "Flay", CardFamily::Skin).with_damage(9))
///     .with_starter(CardId::new(1), 5)
///     .with_reward(CardId::new(2));
///
/// assert!(catalog.validate().is_ok());
/// assert_eq!(catalog.reward_pool(CardFamily::Skin), &[CardId::new(2)]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogData", into = "CatalogData")]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
    starter_deck: Vec<StarterEntry>,
    reward_pools: FxHashMap<CardFamily, Vec<CardId>>,
    neutral_rewards: Vec<CardId>,
    negatives: Vec<CardId>,
    corruption_card: Option<CardId>,
    fallback_negative: Option<CardId>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Register a card (builder pattern).
    #[must_use]
    pub fn with_card(mut self, card: CardDefinition) -> Self {
        self.register(card);
        self
    }

    #[must_use]
    pub fn with_starter(mut self, card: CardId, count: usize) -> Self {
        self.starter_deck.push(StarterEntry { card, count });
        self
    }

    /// Add a card to the reward pool of its own family.
    ///
    /// Neutral cards go to the neutral pool.
    #[must_use]
    pub fn with_reward(mut self, card: CardId) -> Self {
        match self.cards.get(&card).map(|c| c.family) {
            Some(CardFamily::Neutral) => self.neutral_rewards.push(card),
            Some(family) => self.reward_pools.entry(family).or_default().push(card),
            None => {
                log::warn!("reward {card} is not registered, ignored");
                debug_assert!(false, "reward {card} is not registered");
            }
        }
        self
    }

    #[must_use]
    pub fn with_negative(mut self, card: CardId) -> Self {
        self.negatives.push(card);
        self
    }

    /// Set the card planted by a successful corruption roll.
    #[must_use]
    pub fn with_corruption_card(mut self, card: CardId) -> Self {
        self.corruption_card = Some(card);
        self
    }

    #[must_use]
    pub fn with_fallback_negative(mut self, card: CardId) -> Self {
        self.fallback_negative = Some(card);
        self
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    #[must_use]
    pub fn starter_entries(&self) -> &[StarterEntry] {
        &self.starter_deck
    }

    /// Expand the starter entries into a flat card list.
    #[must_use]
    pub fn build_starter_deck(&self) -> Vec<CardId> {
        self.starter_deck
            .iter()
            .flat_map(|entry| std::iter::repeat(entry.card).take(entry.count))
            .collect()
    }

    /// Reward pool of a family. The neutral family maps to the neutral pool.
    #[must_use]
    pub fn reward_pool(&self, family: CardFamily) -> &[CardId] {
        match family {
            CardFamily::Neutral => &self.neutral_rewards,
            _ => self.reward_pools.get(&family).map_or(&[], Vec::as_slice),
        }
    }

    #[must_use]
    pub fn neutral_pool(&self) -> &[CardId] {
        &self.neutral_rewards
    }

    #[must_use]
    pub fn negatives(&self) -> &[CardId] {
        &self.negatives
    }

    #[must_use]
    pub fn corruption_card(&self) -> Option<CardId> {
        self.corruption_card
    }

    /// Generic negative card: the explicit fallback, else a negative named
    /// like "wound", else the first negative.
    #[must_use]
    pub fn fallback_negative(&self) -> Option<CardId> {
        self.fallback_negative
            .or_else(|| self.find_negative_named("wound"))
            .or_else(|| self.negatives.first().copied())
    }

    /// First negative whose name contains `fragment`, ignoring case.
    #[must_use]
    pub fn find_negative_named(&self, fragment: &str) -> Option<CardId> {
        let needle = fragment.to_lowercase();
        self.negatives.iter().copied().find(|id| {
            self.get(*id)
                .is_some_and(|card| card.name.to_lowercase().contains(&needle))
        })
    }

    /// Check that every referenced id is defined and the roles make sense.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.build_starter_deck().is_empty() {
            return Err(CatalogError::EmptyStarterDeck);
        }

        let require = |card: CardId, context: &'static str| {
            if self.contains(card) {
                Ok(())
            } else {
                Err(CatalogError::UnknownCard { card, context })
            }
        };

        for entry in &self.starter_deck {
            require(entry.card, "starter deck")?;
        }
        for pool in self.reward_pools.values() {
            for &card in pool {
                require(card, "reward pool")?;
            }
        }
        for &card in &self.neutral_rewards {
            require(card, "neutral pool")?;
        }
        for &card in &self.negatives {
            require(card, "negatives")?;
        }
        if let Some(card) = self.fallback_negative {
            require(card, "fallback negative")?;
        }
        if let Some(card) = self.corruption_card {
            require(card, "corruption card")?;
            if self.get(card).is_some_and(|c| !c.is_curse()) {
                return Err(CatalogError::CorruptionCardNotCurse { card });
            }
        }
        Ok(())
    }
}

/// Serialized catalog shape: cards as a list, pools keyed by family.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CatalogData {
    cards: Vec<CardDefinition>,
    starter_deck: Vec<StarterEntry>,
    reward_pools: Vec<(CardFamily, Vec<CardId>)>,
    neutral_rewards: Vec<CardId>,
    negatives: Vec<CardId>,
    corruption_card: Option<CardId>,
    fallback_negative: Option<CardId>,
}

impl TryFrom<CatalogData> for CardCatalog {
    type Error = CatalogError;

    fn try_from(data: CatalogData) -> Result<Self, Self::Error> {
        let mut cards = FxHashMap::default();
        for card in data.cards {
            let id = card.id;
            if cards.insert(id, card).is_some() {
                return Err(CatalogError::DuplicateCard { card: id });
            }
        }
        Ok(Self {
            cards,
            starter_deck: data.starter_deck,
            reward_pools: data.reward_pools.into_iter().collect(),
            neutral_rewards: data.neutral_rewards,
            negatives: data.negatives,
            corruption_card: data.corruption_card,
            fallback_negative: data.fallback_negative,
        })
    }
}

impl From<CardCatalog> for CatalogData {
    fn from(catalog: CardCatalog) -> Self {
        let mut cards: Vec<_> = catalog.cards.into_values().collect();
        cards.sort_by_key(|card| card.id);
        let mut reward_pools: Vec<_> = catalog.reward_pools.into_iter().collect();
        reward_pools.sort_by_key(|(family, _)| *family);
        Self {
            cards,
            starter_deck: catalog.starter_deck,
            reward_pools,
            neutral_rewards: catalog.neutral_rewards,
            negatives: catalog.negatives,
            corruption_card: catalog.corruption_card,
            fallback_negative: catalog.fallback_negative,
        }
    }
}
