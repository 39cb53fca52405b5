//! Effect resolution - playing a card against the battle.
//!
//! `EffectResolver::try_play` gates the play, spends pulse, applies the
//! card's base numbers and then walks its effect list in order. Anything
//! that touches piles is raised as a synchronous request to a
//! [`CardCollaborator`]; the resolver never moves cards itself.
//!
//! ## Gates
//!
//! 1. The battle must be running.
//! 2. Cards carrying the unplayable opcode are rejected before any spend.
//! 3. The cost is spent atomically; a short meter rejects the whole play.
//!
//! Once the spend succeeds the rest of the card resolves to completion.

use thiserror::Error;

use crate::battle::TurnEngine;
use crate::cards::{BodyTag, CardDefinition, CardId};
use crate::core::Side;

use super::{CustomOp, EffectDefinition, EffectTarget, EffectType, StatusKind};

/// Why a card play was turned down. The battle is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlayRejected {
    #[error("no battle is running")]
    BattleNotRunning,

    #[error("card is unplayable")]
    Unplayable,

    #[error("card costs {cost} pulse, {available} available")]
    InsufficientPulse { cost: i32, available: i32 },

    #[error("no card at that hand position")]
    NotInHand,

    #[error("card was retained this turn and cannot be played again")]
    RetainedThisTurn,
}

/// What a scry request did to the draw pile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScryOutcome {
    pub discarded_total: usize,
    pub discarded_any_curse: bool,
}

impl ScryOutcome {
    /// Fold another outcome into this one.
    pub fn merge(&mut self, other: ScryOutcome) {
        self.discarded_total += other.discarded_total;
        self.discarded_any_curse |= other.discarded_any_curse;
    }
}

/// Routing notice raised by `ExhaustSelf` / `RetainSelf`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Routing {
    Exhaust,
    Retain,
}

/// Pile-owning side of a card play.
///
/// Every method has a safe default so a host only implements what it
/// owns. Requests that go unanswered are logged.
pub trait CardCollaborator {
    /// Move up to `count` cards toward the hand. Returns how many arrived.
    fn draw(&mut self, count: usize) -> usize {
        log::warn!("missing collaborator: draw {count} ignored");
        0
    }

    /// Inspect the top `count` draw-pile cards, discarding some.
    fn scry(&mut self, count: usize) -> ScryOutcome {
        log::warn!("missing collaborator: scry {count} ignored");
        ScryOutcome::default()
    }

    /// Exhaust one curse from hand. Returns whether one was removed.
    fn exhaust_curse_from_hand(&mut self) -> bool {
        log::warn!("missing collaborator: exhaust-curse ignored");
        false
    }

    fn reveal_intent(&mut self) {}

    /// The player marked the enemy. Receivers are expected to update the
    /// battle's `MarkTracker`.
    fn mark_enemy(&mut self, _tag: BodyTag) {}

    fn routing(&mut self, _routing: Routing) {}

    fn apply_status(&mut self, _target: Side, _status: StatusKind, _stacks: i32) {}

    fn remove_status(&mut self, _target: Side, _status: StatusKind, _stacks: i32) {}
}

/// Collaborator that answers every request with its safe default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCollaborator;

impl CardCollaborator for NullCollaborator {}

/// Result of a successful play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardPlay {
    pub card: CardId,

    /// Pulse spent, always the card's cost.
    pub spent: i32,

    /// Set by an `ExhaustSelf` effect.
    pub force_exhaust: bool,

    /// Set by a `RetainSelf` effect.
    pub retain: bool,

    pub cards_drawn: usize,
    pub curses_exhausted: usize,
    pub scry: ScryOutcome,
}

impl CardPlay {
    fn new(card: CardId, spent: i32) -> Self {
        Self {
            card,
            spent,
            force_exhaust: false,
            retain: false,
            cards_drawn: 0,
            curses_exhausted: 0,
            scry: ScryOutcome::default(),
        }
    }

    /// True if the played card belongs in the exhaust pile.
    #[must_use]
    pub fn exhausts(&self, card: &CardDefinition) -> bool {
        self.force_exhaust || card.exhaust_after_play
    }
}

/// Interprets card effects. Holds the per-battle accumulators.
#[derive(Clone, Debug, Default)]
pub struct EffectResolver {
    bleed_bonus: i32,
    armed_hp_loss: i32,
}

impl EffectResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget accumulators from a previous battle.
    pub fn reset(&mut self) {
        self.bleed_bonus = 0;
        self.armed_hp_loss = 0;
    }

    /// Stacks added to the next Bleed application.
    #[must_use]
    pub fn bleed_bonus(&self) -> i32 {
        self.bleed_bonus
    }

    /// HP loss armed for the coming end of turn.
    #[must_use]
    pub fn armed_hp_loss(&self) -> i32 {
        self.armed_hp_loss
    }

    /// Take the armed end-of-turn HP loss, disarming it.
    pub fn take_end_of_turn_hp_loss(&mut self) -> i32 {
        std::mem::take(&mut self.armed_hp_loss)
    }

    /// Try to play `card`.
    ///
    /// On rejection neither the meter nor anything else has changed.
    pub fn try_play(
        &mut self,
        card: &CardDefinition,
        engine: &mut TurnEngine,
        desk: &mut dyn CardCollaborator,
    ) -> Result<CardPlay, PlayRejected> {
        if !engine.is_running() {
            return Err(PlayRejected::BattleNotRunning);
        }
        if card.is_unplayable() {
            log::debug!("{} rejected: unplayable", card.name);
            return Err(PlayRejected::Unplayable);
        }
        if card.cost > 0 && !engine.meter_mut().try_spend(card.cost) {
            let available = engine.meter().current();
            log::debug!("{} rejected: cost {} > {}", card.name, card.cost, available);
            return Err(PlayRejected::InsufficientPulse { cost: card.cost, available });
        }

        log::debug!("play {} ({})", card.name, card.id);
        let mut play = CardPlay::new(card.id, card.cost.max(0));

        if card.base_damage > 0 {
            engine.deal_damage(Side::Enemy, card.base_damage);
        }
        if card.base_block > 0 {
            engine.gain_block(Side::Player, card.base_block);
        }
        if card.base_draw > 0 {
            play.cards_drawn += desk.draw(card.base_draw as usize);
        }
        if card.base_scry > 0 {
            play.scry.merge(desk.scry(card.base_scry as usize));
        }

        for effect in &card.effects {
            self.apply(effect, engine, desk, &mut play);
        }

        Ok(play)
    }

    fn apply(
        &mut self,
        effect: &EffectDefinition,
        engine: &mut TurnEngine,
        desk: &mut dyn CardCollaborator,
        play: &mut CardPlay,
    ) {
        let side = side_of(effect.target);
        match effect.effect_type {
            EffectType::Damage => {
                for _ in 0..effect.hits() {
                    engine.deal_damage(side, effect.value);
                }
            }
            EffectType::GainBlock => engine.gain_block(side, effect.value),
            EffectType::Draw => {
                if effect.value > 0 {
                    play.cards_drawn += desk.draw(effect.value as usize);
                }
            }
            EffectType::Scry => {
                if effect.value > 0 {
                    play.scry.merge(desk.scry(effect.value as usize));
                }
            }
            EffectType::GainPulse => engine.meter_mut().gain(effect.value),
            EffectType::ApplyStatus => {
                let mut stacks = effect.value;
                if effect.status == StatusKind::Bleed && side == Side::Enemy {
                    stacks += std::mem::take(&mut self.bleed_bonus);
                }
                log::debug!("apply {:?} x{} to {}", effect.status, stacks, side);
                desk.apply_status(side, effect.status, stacks);
            }
            EffectType::RemoveStatus => {
                log::debug!("remove {:?} x{} from {}", effect.status, effect.value, side);
                desk.remove_status(side, effect.status, effect.value);
            }
            EffectType::ExhaustSelf => {
                play.force_exhaust = true;
                desk.routing(Routing::Exhaust);
            }
            EffectType::RetainSelf => {
                play.retain = true;
                desk.routing(Routing::Retain);
            }
            EffectType::Custom => self.apply_custom(effect, desk, play),
        }
    }

    fn apply_custom(
        &mut self,
        effect: &EffectDefinition,
        desk: &mut dyn CardCollaborator,
        play: &mut CardPlay,
    ) {
        let Some(op) = CustomOp::from_code(effect.value) else {
            log::warn!("unknown custom opcode {} skipped", effect.value);
            return;
        };
        match op {
            CustomOp::RevealIntent => desk.reveal_intent(),
            CustomOp::MarkEnemy => desk.mark_enemy(effect.mark_tag()),
            CustomOp::ExhaustOneCurseFromHand => {
                if desk.exhaust_curse_from_hand() {
                    play.curses_exhausted += 1;
                }
            }
            CustomOp::EndTurnLoseHp => self.armed_hp_loss += effect.magnitude(),
            CustomOp::BleedBonusNext => self.bleed_bonus += effect.magnitude(),
            CustomOp::Unplayable => {}
        }
    }
}

fn side_of(target: EffectTarget) -> Side {
    if target.is_enemy() {
        Side::Enemy
    } else {
        Side::Player
    }
}
