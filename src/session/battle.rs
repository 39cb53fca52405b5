//! One battle: piles, turn engine, resolver and marks wired together.
//!
//! `Battle` is the pile-owning collaborator. For each card play it lends
//! the resolver a short-lived desk that answers draw, scry and exhaust
//! requests against the piles, and turns notices into `BattleEvent`s.
//! Nothing outlives the call, so there is nothing to unsubscribe.
//!
//! A card whose own effect retains it goes back to the hand but is held
//! for the rest of the turn: it cannot be played again, and it survives
//! the end-of-turn discard.

use crate::battle::{
    BattleEvent, BattleOutcome, BattlePhase, EnemyDefinition, IntentStep, MarkTracker, TurnEngine,
};
use crate::cards::{BodyTag, CardCatalog, CardDefinition, CardId};
use crate::core::{BattleConfig, GameRng, Side};
use crate::effects::{
    CardCollaborator, CardPlay, EffectResolver, PlayRejected, Routing, ScryOutcome, StatusKind,
};
use crate::piles::{PileKind, PileSet};

/// Decides which scried cards to discard. `true` discards.
pub type ScryPolicy = Box<dyn FnMut(CardId, &CardDefinition) -> bool>;

/// Default scry policy: throw away curses, keep everything else.
#[must_use]
pub fn discard_curses() -> ScryPolicy {
    Box::new(|_, card| card.is_curse())
}

/// Battle state owned by the current run.
pub struct Battle {
    config: BattleConfig,
    piles: PileSet,
    engine: TurnEngine,
    resolver: EffectResolver,
    marks: MarkTracker,
    rng: GameRng,
    scry_policy: ScryPolicy,
    /// Copies retained by their own effect this turn.
    held: Vec<CardId>,
}

impl Battle {
    /// `rng` shuffles the piles; the enemy stream is derived from it.
    #[must_use]
    pub fn new(config: BattleConfig, rng: GameRng) -> Self {
        let enemy_rng = rng.for_context("enemy");
        Self {
            engine: TurnEngine::new(config.clone(), enemy_rng),
            config,
            piles: PileSet::new(),
            resolver: EffectResolver::new(),
            marks: MarkTracker::new(),
            rng,
            scry_policy: discard_curses(),
            held: Vec::new(),
        }
    }

    /// Replace the scry policy.
    pub fn set_scry_policy(
        &mut self,
        policy: impl FnMut(CardId, &CardDefinition) -> bool + 'static,
    ) {
        self.scry_policy = Box::new(policy);
    }

    /// Load `deck` into Draw, shuffle, start the engine and draw the opening hand.
    pub fn start(&mut self, deck: Vec<CardId>, enemy: &EnemyDefinition) {
        self.piles.load(deck);
        self.piles.shuffle(PileKind::Draw, &mut self.rng);
        self.resolver.reset();
        self.held.clear();
        self.engine.start_battle(enemy);
        self.refill_hand();
    }

    #[must_use]
    pub fn piles(&self) -> &PileSet {
        &self.piles
    }

    /// Cards in hand, in order.
    #[must_use]
    pub fn hand(&self) -> &[CardId] {
        self.piles.hand().cards()
    }

    #[must_use]
    pub fn engine(&self) -> &TurnEngine {
        &self.engine
    }

    #[must_use]
    pub fn resolver(&self) -> &EffectResolver {
        &self.resolver
    }

    #[must_use]
    pub fn marks(&self) -> &MarkTracker {
        &self.marks
    }

    /// Mutable marks, for subscribing listeners and clearing at battle end.
    pub fn marks_mut(&mut self) -> &mut MarkTracker {
        &mut self.marks
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.engine.outcome()
    }

    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.engine.drain_events()
    }

    /// Play the card at `hand_index`.
    ///
    /// The card leaves the hand while it resolves. A rejected play puts it
    /// back where it was; a successful one routes it to Exhaust, back to
    /// Hand (retain, held until end of turn) or to Discard.
    pub fn play(
        &mut self,
        hand_index: usize,
        catalog: &CardCatalog,
    ) -> Result<CardPlay, PlayRejected> {
        if !self.engine.is_running() {
            return Err(PlayRejected::BattleNotRunning);
        }
        let card_id = *self.hand().get(hand_index).ok_or(PlayRejected::NotInHand)?;
        if self.playable_copies(card_id) == 0 {
            return Err(PlayRejected::RetainedThisTurn);
        }
        self.piles.pile_mut(PileKind::Hand).remove_at(hand_index);
        let Some(card) = catalog.get(card_id) else {
            log::warn!("{card_id} in hand is not in the catalog");
            debug_assert!(false, "{card_id} missing from catalog");
            self.piles.pile_mut(PileKind::Hand).insert(hand_index, card_id);
            return Err(PlayRejected::NotInHand);
        };

        let mut desk = Desk {
            piles: &mut self.piles,
            marks: &mut self.marks,
            rng: &mut self.rng,
            catalog,
            scry_policy: &mut self.scry_policy,
            hand_limit: self.config.hand_limit,
            card: card_id,
            upcoming: self.engine.upcoming_intent(),
            events: Vec::new(),
        };
        let result = self.resolver.try_play(card, &mut self.engine, &mut desk);
        let notices = desk.events;

        match result {
            Ok(play) => {
                self.engine.record(BattleEvent::CardPlayed { card: card_id });
                for event in notices {
                    self.engine.record(event);
                }
                let destination = if play.exhausts(card) {
                    PileKind::Exhaust
                } else if play.retain {
                    self.held.push(card_id);
                    PileKind::Hand
                } else {
                    PileKind::Discard
                };
                self.piles.add(destination, card_id);
                Ok(play)
            }
            Err(rejected) => {
                self.piles.pile_mut(PileKind::Hand).insert(hand_index, card_id);
                Err(rejected)
            }
        }
    }

    /// End the player's turn.
    ///
    /// Cards left in hand add their end-of-turn HP loss to any loss armed
    /// by plays this turn. Retained cards stay in hand, the rest go to
    /// Discard. If the battle continues, the hand is refilled.
    ///
    /// A held card already armed its loss when it was played, so it is not
    /// counted a second time from the hand.
    pub fn end_turn(&mut self, catalog: &CardCatalog) {
        if self.engine.phase() != BattlePhase::PlayerTurn {
            return;
        }

        let mut hp_loss = self.resolver.take_end_of_turn_hp_loss();
        let mut held = std::mem::take(&mut self.held);
        let hand = std::mem::take(self.piles.pile_mut(PileKind::Hand));
        for &card_id in hand.cards() {
            let card = catalog.get(card_id);
            if card.is_none() {
                log::warn!("{card_id} in hand is not in the catalog");
            }
            let was_held = match held.iter().position(|&c| c == card_id) {
                Some(i) => {
                    held.swap_remove(i);
                    true
                }
                None => false,
            };
            if !was_held {
                hp_loss += card.map_or(0, CardDefinition::end_of_turn_hp_loss);
            }
            let keep = was_held || card.is_some_and(|c| c.retain_in_hand);
            self.piles.add(if keep { PileKind::Hand } else { PileKind::Discard }, card_id);
        }

        self.engine.end_player_turn(hp_loss, &mut self.marks);
        if self.engine.phase() == BattlePhase::PlayerTurn {
            self.refill_hand();
        }
    }

    /// Copies of `card` in hand that are not held this turn.
    fn playable_copies(&self, card: CardId) -> usize {
        let in_hand = self.hand().iter().filter(|&&c| c == card).count();
        let held = self.held.iter().filter(|&&c| c == card).count();
        in_hand.saturating_sub(held)
    }

    fn refill_hand(&mut self) {
        let missing = self.config.starting_hand.saturating_sub(self.piles.hand().len());
        let drawn = self.piles.draw_to_hand(missing, self.config.hand_limit, &mut self.rng);
        log::debug!("drew {drawn} to start the turn");
    }
}

impl std::fmt::Debug for Battle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle")
            .field("piles", &self.piles)
            .field("engine", &self.engine)
            .field("resolver", &self.resolver)
            .field("marks", &self.marks)
            .field("held", &self.held)
            .finish_non_exhaustive()
    }
}

/// Collaborator lent to the resolver for one play.
struct Desk<'a> {
    piles: &'a mut PileSet,
    marks: &'a mut MarkTracker,
    rng: &'a mut GameRng,
    catalog: &'a CardCatalog,
    scry_policy: &'a mut ScryPolicy,
    hand_limit: usize,
    card: CardId,
    upcoming: Option<IntentStep>,
    events: Vec<BattleEvent>,
}

impl CardCollaborator for Desk<'_> {
    fn draw(&mut self, count: usize) -> usize {
        self.piles.draw_to_hand(count, self.hand_limit, self.rng)
    }

    fn scry(&mut self, count: usize) -> ScryOutcome {
        let catalog = self.catalog;
        let policy = &mut *self.scry_policy;
        let discarded = self
            .piles
            .scry(count, |id| catalog.get(id).is_some_and(|card| policy(id, card)));
        ScryOutcome {
            discarded_total: discarded.len(),
            discarded_any_curse: discarded
                .iter()
                .any(|&id| catalog.get(id).is_some_and(CardDefinition::is_curse)),
        }
    }

    fn exhaust_curse_from_hand(&mut self) -> bool {
        let catalog = self.catalog;
        let found = self
            .piles
            .hand()
            .position(|&id| catalog.get(id).is_some_and(CardDefinition::is_curse));
        match found {
            Some(index) => self.piles.move_card(PileKind::Hand, index, PileKind::Exhaust).is_some(),
            None => false,
        }
    }

    fn reveal_intent(&mut self) {
        self.events.push(BattleEvent::IntentRevealed { step: self.upcoming });
    }

    fn mark_enemy(&mut self, tag: BodyTag) {
        self.marks.apply_harvest(tag);
        self.events.push(BattleEvent::EnemyMarked { tag });
    }

    fn routing(&mut self, routing: Routing) {
        self.events.push(BattleEvent::CardRouted { card: self.card, routing });
    }

    fn apply_status(&mut self, target: Side, status: StatusKind, stacks: i32) {
        self.events.push(BattleEvent::StatusApplied { target, status, stacks });
    }

    fn remove_status(&mut self, target: Side, status: StatusKind, stacks: i32) {
        self.events.push(BattleEvent::StatusRemoved { target, status, stacks });
    }
}
