//! A run: the deck carried from battle to battle and the reward flow
//! between them.
//!
//! ```text
//! start_battle -> play / end_turn ... -> Won  -> begin_harvest -> resolve_harvest
//!                                     |                          -> accept / decline
//!                                     -> Lost -> curse queued
//! ```
//!
//! Marks are cleared once the post-battle flow is finished, whatever the
//! outcome.

use crate::battle::{BattleEvent, BattleOutcome, EnemyDefinition};
use crate::cards::{CardCatalog, CardFamily, CardId, Deck};
use crate::core::{EngineConfig, GameRng, SetupError};
use crate::effects::{CardPlay, PlayRejected};
use crate::rewards::{HarvestInput, RewardEngine, RewardOffer};

use super::battle::Battle;

/// Catalog, deck, reward economy and the current battle.
#[derive(Debug)]
pub struct Run {
    catalog: CardCatalog,
    config: EngineConfig,
    deck: Deck,
    rewards: RewardEngine,
    battle: Battle,
    settled: bool,
    harvest_pending: bool,
    offer: Option<RewardOffer>,
    battles_started: u32,
}

impl Run {
    /// Validate config and catalog and build the starter deck.
    ///
    /// The shuffle and reward streams are seeded independently; a seed of
    /// `0` picks one from entropy.
    pub fn new(catalog: CardCatalog, config: EngineConfig) -> Result<Self, SetupError> {
        config.validate()?;
        catalog.validate()?;

        let shuffle_rng = GameRng::from_seed_or_entropy(config.seeds.shuffle_seed);
        let reward_rng = GameRng::from_seed_or_entropy(config.seeds.reward_seed);
        log::debug!("run seeds: shuffle={} reward={}", shuffle_rng.seed(), reward_rng.seed());

        Ok(Self {
            deck: Deck::from_starter(catalog.build_starter_deck()),
            rewards: RewardEngine::new(config.rewards.clone(), reward_rng),
            battle: Battle::new(config.battle.clone(), shuffle_rng),
            catalog,
            config,
            settled: true,
            harvest_pending: false,
            offer: None,
            battles_started: 0,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    /// Mutable battle access, for scry policies and mark listeners.
    pub fn battle_mut(&mut self) -> &mut Battle {
        &mut self.battle
    }

    #[must_use]
    pub fn battles_started(&self) -> u32 {
        self.battles_started
    }

    /// Offer waiting for `accept_reward` or `decline_reward`.
    #[must_use]
    pub fn pending_offer(&self) -> Option<&RewardOffer> {
        self.offer.as_ref()
    }

    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.battle.drain_events()
    }

    /// Start the next battle. Queued cards join the deck first.
    ///
    /// An unfinished harvest from the previous battle is dropped.
    pub fn start_battle(&mut self, enemy: &EnemyDefinition) {
        if self.harvest_pending || self.offer.is_some() {
            log::warn!("previous harvest abandoned");
            self.harvest_pending = false;
            self.offer = None;
            self.battle.marks_mut().clear_all();
        }
        let cards = self.deck.begin_battle();
        self.battles_started += 1;
        self.settled = false;
        self.battle.start(cards, enemy);
    }

    /// Play the card at `hand_index` of the current battle.
    pub fn play(&mut self, hand_index: usize) -> Result<CardPlay, PlayRejected> {
        let result = self.battle.play(hand_index, &self.catalog);
        self.settle();
        result
    }

    pub fn end_turn(&mut self) {
        self.battle.end_turn(&self.catalog);
        self.settle();
    }

    /// After a win, the families the harvest leans toward.
    #[must_use]
    pub fn begin_harvest(&self) -> Option<Vec<CardFamily>> {
        self.harvest_pending
            .then(|| RewardEngine::preferred_families(self.battle.marks().harvest()))
    }

    /// Feed in the harvest mini-game result.
    ///
    /// A failed mini-game clears the marks and yields nothing.
    pub fn resolve_harvest(&mut self, input: HarvestInput) -> Option<&RewardOffer> {
        if !self.harvest_pending {
            log::warn!("resolve_harvest called with no harvest pending");
            return None;
        }
        self.harvest_pending = false;

        let mark = self.battle.marks().harvest();
        match self.rewards.harvest(input, mark, &self.catalog, &mut self.deck) {
            Some(offer) => {
                self.offer = Some(offer);
                self.offer.as_ref()
            }
            None => {
                self.battle.marks_mut().clear_all();
                None
            }
        }
    }

    /// Take option `index` of the pending offer into the next battle.
    ///
    /// An out-of-range index leaves the offer pending.
    pub fn accept_reward(&mut self, index: usize) -> Option<CardId> {
        let card = self.offer.as_ref()?.options.get(index).copied()?;
        self.offer = None;
        self.deck.queue_for_next_battle(card);
        self.battle.marks_mut().clear_all();
        Some(card)
    }

    /// Walk away from the pending offer.
    pub fn decline_reward(&mut self) {
        if self.offer.take().is_some() {
            self.battle.marks_mut().clear_all();
        }
    }

    fn settle(&mut self) {
        if self.settled {
            return;
        }
        let Some(outcome) = self.battle.outcome() else {
            return;
        };
        self.settled = true;

        match outcome {
            BattleOutcome::Won => self.harvest_pending = true,
            BattleOutcome::Lost => {
                let threat = self.battle.marks().threat();
                match self.rewards.defeat_curse(threat, &self.catalog) {
                    Some(curse) => {
                        log::info!("defeat: {curse} joins the deck");
                        self.deck.queue_for_next_battle(curse);
                    }
                    None => log::warn!("defeat: catalog has no negative card"),
                }
                self.battle.marks_mut().clear_all();
            }
        }
    }
}
