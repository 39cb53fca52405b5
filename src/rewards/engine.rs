//! Post-battle reward economy.
//!
//! ## Harvest
//!
//! After a win the host runs the harvest mini-game and reports which family
//! the player went for. A harvest is **honest** when that family matches
//! the harvest mark, otherwise it is **lying**:
//!
//! - honest: `honest_count` options from the chosen family's pool
//! - lying: `lying_count` options from the mixed pool, plus one corruption roll
//!
//! A corruption hit rewrites a random non-starter, non-curse deck card into
//! the catalog's corruption card, or queues that card if nothing qualifies.
//! While the corruption card is anywhere in the deck, each offer slot may be
//! downgraded to a negative or a neutral card.
//!
//! ## Defeat
//!
//! One negative card is queued for the next battle, chosen by the threat
//! mark the enemy placed on the player.
//!
//! All rolls use the engine's own `GameRng`, independent of the shuffle
//! stream.

use serde::{Deserialize, Serialize};

use crate::cards::{BodyTag, CardCatalog, CardFamily, CardId, Deck};
use crate::core::{GameRng, RewardConfig};

/// Result of the external harvest mini-game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestInput {
    pub success: bool,
    pub chosen_family: CardFamily,
}

impl HarvestInput {
    #[must_use]
    pub fn succeeded(chosen_family: CardFamily) -> Self {
        Self { success: true, chosen_family }
    }

    #[must_use]
    pub fn failed(chosen_family: CardFamily) -> Self {
        Self { success: false, chosen_family }
    }
}

/// What the corruption roll did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorruptionOutcome {
    Missed,
    /// A deck card was rewritten into the corruption card.
    Transformed { replaced: CardId },
    /// Nothing qualified, so the corruption card joins next battle.
    Queued,
}

/// Options presented after a successful harvest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardOffer {
    pub options: Vec<CardId>,
    pub lying: bool,

    /// Presentation hint: show the offer as corrupted.
    pub tint: bool,

    /// `None` when no corruption roll was made.
    pub corruption: Option<CorruptionOutcome>,

    /// Slots replaced by the downgrade roll.
    pub downgraded: Vec<usize>,
}

/// Builds reward offers and runs the corruption economy.
#[derive(Clone, Debug)]
pub struct RewardEngine {
    config: RewardConfig,
    rng: GameRng,
}

impl RewardEngine {
    #[must_use]
    pub fn new(config: RewardConfig, rng: GameRng) -> Self {
        Self { config, rng }
    }

    #[must_use]
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    /// Families the harvest leans toward. No mark means every family.
    #[must_use]
    pub fn preferred_families(harvest_mark: Option<BodyTag>) -> Vec<CardFamily> {
        match harvest_mark {
            Some(tag) => vec![tag.family()],
            None => CardFamily::HARVESTABLE.to_vec(),
        }
    }

    /// Honest iff the chosen family is the marked one.
    #[must_use]
    pub fn is_honest(harvest_mark: Option<BodyTag>, chosen: CardFamily) -> bool {
        harvest_mark.is_some_and(|tag| tag.family() == chosen)
    }

    /// Resolve a harvest. A failed mini-game yields no offer.
    ///
    /// The corruption step may rewrite or extend `deck` directly.
    pub fn harvest(
        &mut self,
        input: HarvestInput,
        harvest_mark: Option<BodyTag>,
        catalog: &CardCatalog,
        deck: &mut Deck,
    ) -> Option<RewardOffer> {
        if !input.success {
            log::info!("harvest failed, no reward");
            return None;
        }

        let honest = Self::is_honest(harvest_mark, input.chosen_family);
        let lying = !honest;
        let count = if honest { self.config.honest_count } else { self.config.lying_count }.max(1);
        let families = if honest { vec![input.chosen_family] } else { Vec::new() };

        let corruption_in_deck = catalog.corruption_card().is_some_and(|card| deck.contains(card));
        let (options, downgraded) =
            self.build_options(&families, count, corruption_in_deck, catalog);

        let corruption = if lying && self.config.enable_lying {
            catalog
                .corruption_card()
                .map(|card| self.roll_corruption(card, catalog, deck))
        } else {
            None
        };

        log::info!(
            "harvest {} ({:?}): {} options",
            if honest { "honest" } else { "lying" },
            input.chosen_family,
            options.len()
        );

        Some(RewardOffer {
            options,
            lying,
            tint: lying && self.config.enable_corruption_tint,
            corruption,
            downgraded,
        })
    }

    /// Pick `count` options, round-robin over the families' pools.
    ///
    /// Empty `families`, or families whose pools are all empty, use the
    /// mixed pool. Returns the options and the indices of downgraded slots.
    pub fn build_options(
        &mut self,
        families: &[CardFamily],
        count: usize,
        corruption_in_deck: bool,
        catalog: &CardCatalog,
    ) -> (Vec<CardId>, Vec<usize>) {
        let mut pools: Vec<&[CardId]> = families
            .iter()
            .map(|&family| catalog.reward_pool(family))
            .filter(|pool| !pool.is_empty())
            .collect();
        if pools.is_empty() {
            pools = CardFamily::HARVESTABLE
                .iter()
                .map(|&family| catalog.reward_pool(family))
                .filter(|pool| !pool.is_empty())
                .collect();
        }
        if pools.is_empty() {
            log::warn!("no reward pools available");
            return (Vec::new(), Vec::new());
        }

        let mut options: Vec<CardId> = Vec::with_capacity(count);
        for slot in 0..count {
            let pool = pools[slot % pools.len()];
            let pick = self.pick_from(pool, &options);
            options.push(pick);
        }

        let mut downgraded = Vec::new();
        if corruption_in_deck {
            for slot in 0..options.len() {
                if !self.rng.gen_bool(self.config.downgrade_chance) {
                    continue;
                }
                if let Some(replacement) = self.downgrade_replacement(&options, catalog) {
                    log::debug!("downgrade on slot {slot}: {} -> {replacement}", options[slot]);
                    options[slot] = replacement;
                    downgraded.push(slot);
                }
            }
        }

        (options, downgraded)
    }

    /// Curse to queue after a defeat.
    ///
    /// A threat on the configured tag prefers the negative named like
    /// `threat_curse_name`; anything else takes the fallback negative.
    #[must_use]
    pub fn defeat_curse(
        &self,
        threat_mark: Option<BodyTag>,
        catalog: &CardCatalog,
    ) -> Option<CardId> {
        let named = if threat_mark == Some(self.config.threat_curse_tag) {
            catalog.find_negative_named(&self.config.threat_curse_name)
        } else {
            None
        };
        named.or_else(|| catalog.fallback_negative())
    }

    /// Draw from `pool`, retrying to avoid cards already in `used`.
    fn pick_from(&mut self, pool: &[CardId], used: &[CardId]) -> CardId {
        for _ in 0..self.config.pick_retries {
            let card = pool[self.rng.gen_range_usize(0..pool.len())];
            if !used.contains(&card) {
                return card;
            }
        }
        pool[self.rng.gen_range_usize(0..pool.len())]
    }

    fn downgrade_replacement(
        &mut self,
        options: &[CardId],
        catalog: &CardCatalog,
    ) -> Option<CardId> {
        if self.rng.gen_bool(0.5) {
            return catalog.fallback_negative();
        }
        let neutral = catalog.neutral_pool();
        if !neutral.is_empty() {
            return Some(neutral[self.rng.gen_range_usize(0..neutral.len())]);
        }
        self.rng.choose(options).copied()
    }

    fn roll_corruption(
        &mut self,
        card: CardId,
        catalog: &CardCatalog,
        deck: &mut Deck,
    ) -> CorruptionOutcome {
        let roll = self.rng.gen_unit();
        let chance = self.config.corruption_chance.clamp(0.0, 1.0);
        log::debug!("corruption roll {roll:.3} vs {chance:.2}");
        if roll >= chance {
            return CorruptionOutcome::Missed;
        }
        match deck.try_transform_random_non_starter_non_curse(card, catalog, &mut self.rng) {
            Some(replaced) => {
                log::info!("corruption: {replaced} became {card}");
                CorruptionOutcome::Transformed { replaced }
            }
            None => {
                log::info!("corruption: nothing eligible, {card} queued");
                deck.queue_for_next_battle(card);
                CorruptionOutcome::Queued
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardRarity};

    fn catalog() -> CardCatalog {
        let card = |id: u32, name: &str, family| CardDefinition::new(CardId::new(id), name, family);
        let curse = |id: u32, name: &str| {
            card(id, name, CardFamily::Neutral).with_rarity(CardRarity::Curse)
        };
        CardCatalog::new()
            .with_card(card(1, "Strike", CardFamily::Neutral))
            .with_card(card(10, "Flay", CardFamily::Skin))
            .with_card(card(11, "Peel", CardFamily::Skin))
            .with_card(card(12, "Graft", CardFamily::Skin))
            .with_card(card(20, "Gouge", CardFamily::Eye))
            .with_card(card(21, "Stare", CardFamily::Eye))
            .with_card(card(30, "Bandage", CardFamily::Neutral))
            .with_card(curse(90, "Wound"))
            .with_card(curse(91, "Parasite"))
            .with_card(curse(99, "LIAR"))
            .with_starter(CardId::new(1), 5)
            .with_reward(CardId::new(10))
            .with_reward(CardId::new(11))
            .with_reward(CardId::new(12))
            .with_reward(CardId::new(20))
            .with_reward(CardId::new(21))
            .with_reward(CardId::new(30))
            .with_negative(CardId::new(90))
            .with_negative(CardId::new(91))
            .with_corruption_card(CardId::new(99))
    }

    fn engine(config: RewardConfig) -> RewardEngine {
        RewardEngine::new(config, GameRng::new(1234))
    }

    #[test]
    fn test_preferred_families() {
        assert_eq!(RewardEngine::preferred_families(Some(BodyTag::Eye)), vec![CardFamily::Eye]);
        assert_eq!(RewardEngine::preferred_families(None).len(), 4);
    }

    #[test]
    fn test_honesty() {
        assert!(RewardEngine::is_honest(Some(BodyTag::Skin), CardFamily::Skin));
        assert!(!RewardEngine::is_honest(Some(BodyTag::Skin), CardFamily::Eye));
        assert!(!RewardEngine::is_honest(None, CardFamily::Skin));
    }

    #[test]
    fn test_honest_offer_from_chosen_pool() {
        let mut rewards = engine(RewardConfig::default());
        let mut deck = Deck::from_starter(catalog().build_starter_deck());

        let offer = rewards
            .harvest(
                HarvestInput::succeeded(CardFamily::Skin),
                Some(BodyTag::Skin),
                &catalog(),
                &mut deck,
            )
            .unwrap();

        assert!(!offer.lying);
        assert!(!offer.tint);
        assert_eq!(offer.corruption, None);
        assert_eq!(offer.options.len(), 3);
        let skin = catalog().reward_pool(CardFamily::Skin).to_vec();
        assert!(offer.options.iter().all(|c| skin.contains(c)));
    }

    #[test]
    fn test_failed_harvest_yields_nothing() {
        let mut rewards = engine(RewardConfig::default());
        let mut deck = Deck::new();
        let offer = rewards.harvest(
            HarvestInput::failed(CardFamily::Eye),
            Some(BodyTag::Eye),
            &catalog(),
            &mut deck,
        );
        assert_eq!(offer, None);
    }

    #[test]
    fn test_lying_offer_rolls_once() {
        let config = RewardConfig { corruption_chance: 0.0, ..RewardConfig::default() };
        let mut rewards = engine(config);
        let mut deck = Deck::from_starter(catalog().build_starter_deck());

        let offer = rewards
            .harvest(
                HarvestInput::succeeded(CardFamily::Skin),
                Some(BodyTag::Eye),
                &catalog(),
                &mut deck,
            )
            .unwrap();

        assert!(offer.lying);
        assert!(offer.tint);
        assert_eq!(offer.options.len(), 2);
        assert_eq!(offer.corruption, Some(CorruptionOutcome::Missed));
    }

    #[test]
    fn test_lying_disabled_skips_roll() {
        let config = RewardConfig {
            enable_lying: false,
            enable_corruption_tint: false,
            ..RewardConfig::default()
        };
        let mut rewards = engine(config);
        let mut deck = Deck::new();

        let offer = rewards
            .harvest(HarvestInput::succeeded(CardFamily::Eye), None, &catalog(), &mut deck)
            .unwrap();

        assert!(offer.lying);
        assert!(!offer.tint);
        assert_eq!(offer.corruption, None);
    }

    #[test]
    fn test_corruption_hit_queues_when_nothing_eligible() {
        let config = RewardConfig { corruption_chance: 1.0, ..RewardConfig::default() };
        let mut rewards = engine(config);
        let mut deck = Deck::from_starter(catalog().build_starter_deck());

        let offer = rewards
            .harvest(
                HarvestInput::succeeded(CardFamily::Eye),
                Some(BodyTag::Skin),
                &catalog(),
                &mut deck,
            )
            .unwrap();

        assert_eq!(offer.corruption, Some(CorruptionOutcome::Queued));
        assert_eq!(deck.queued(), &[CardId::new(99)]);
        assert!(deck.entries().iter().all(|e| e.card == CardId::new(1)));
    }

    #[test]
    fn test_corruption_hit_transforms_picked_card() {
        let config = RewardConfig { corruption_chance: 1.0, ..RewardConfig::default() };
        let mut rewards = engine(config);
        let mut deck = Deck::from_starter(catalog().build_starter_deck());
        deck.add(CardId::new(20));

        let offer = rewards
            .harvest(
                HarvestInput::succeeded(CardFamily::Eye),
                Some(BodyTag::Skin),
                &catalog(),
                &mut deck,
            )
            .unwrap();

        assert_eq!(
            offer.corruption,
            Some(CorruptionOutcome::Transformed { replaced: CardId::new(20) })
        );
        assert!(deck.contains(CardId::new(99)));
        assert!(!deck.contains(CardId::new(20)));
        assert!(deck.queued().is_empty());
    }

    #[test]
    fn test_downgrade_only_with_corruption_in_deck() {
        let config = RewardConfig { downgrade_chance: 1.0, ..RewardConfig::default() };
        let cat = catalog();

        let mut rewards = engine(config.clone());
        let (clean, none) = rewards.build_options(&[CardFamily::Skin], 3, false, &cat);
        assert!(none.is_empty());
        assert!(clean.iter().all(|c| cat.reward_pool(CardFamily::Skin).contains(c)));

        let mut rewards = engine(config);
        let (options, downgraded) = rewards.build_options(&[CardFamily::Skin], 3, true, &cat);
        assert_eq!(downgraded, vec![0, 1, 2]);
        assert!(options.iter().all(|&c| c == CardId::new(90) || c == CardId::new(30)));
    }

    #[test]
    fn test_empty_pool_falls_back_to_mixed() {
        let mut rewards = engine(RewardConfig::default());
        let cat = catalog();
        let (options, _) = rewards.build_options(&[CardFamily::Blood], 2, false, &cat);

        assert_eq!(options.len(), 2);
        let not_neutral = |c: &CardId| cat.get(*c).is_some_and(|d| d.family != CardFamily::Neutral);
        assert!(options.iter().all(not_neutral));
    }

    #[test]
    fn test_repeats_allowed_when_pool_is_small() {
        let mut rewards = engine(RewardConfig::default());
        let (options, _) = rewards.build_options(&[CardFamily::Eye], 4, false, &catalog());
        assert_eq!(options.len(), 4);
    }

    #[test]
    fn test_defeat_curse() {
        let rewards = engine(RewardConfig::default());
        let cat = catalog();
        assert_eq!(rewards.defeat_curse(Some(BodyTag::Eye), &cat), Some(CardId::new(91)));
        assert_eq!(rewards.defeat_curse(Some(BodyTag::Skin), &cat), Some(CardId::new(90)));
        assert_eq!(rewards.defeat_curse(None, &cat), Some(CardId::new(90)));
    }

    #[test]
    fn test_same_seed_same_offer() {
        let cat = catalog();
        let run = || {
            let mut rewards = engine(RewardConfig::default());
            rewards.build_options(&[], 5, true, &cat)
        };
        assert_eq!(run(), run());
    }
}
