//! The battle state machine.
//!
//! ```text
//! AwaitingStart -> PlayerTurn <-> EnemyTurn -> Ended(Won | Lost)
//! ```
//!
//! `TurnEngine` owns both combatants, the pulse meter and the enemy's
//! intent script. Every hit goes through the shared damage primitive on
//! `CombatantState`, and the battle ends the moment either HP reaches
//! zero. Once ended, turn-advancing calls are silent no-ops until the next
//! [`TurnEngine::start_battle`].

use serde::{Deserialize, Serialize};

use super::enemy::{EnemyDefinition, IntentKind, IntentStep};
use super::event::{BattleEvent, BattleOutcome};
use super::marks::MarkTracker;
use super::meter::ResourceMeter;
use crate::cards::BodyTag;
use crate::core::{BattleConfig, CombatantState, GameRng, Side};

/// Where the battle is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePhase {
    AwaitingStart,
    PlayerTurn,
    EnemyTurn,
    Ended(BattleOutcome),
}

/// Turn alternation, HP/Block and enemy intents for one battle at a time.
#[derive(Clone, Debug)]
pub struct TurnEngine {
    config: BattleConfig,
    phase: BattlePhase,
    player: CombatantState,
    enemy: CombatantState,
    meter: ResourceMeter,
    round: u32,
    enemy_def: Option<EnemyDefinition>,
    intent_cursor: usize,
    planned: Option<IntentStep>,
    threat_applied: bool,
    rng: GameRng,
    events: Vec<BattleEvent>,
}

impl TurnEngine {
    /// Create an idle engine. `rng` drives random intents and threat marks.
    #[must_use]
    pub fn new(config: BattleConfig, rng: GameRng) -> Self {
        Self {
            player: CombatantState::new(Side::Player, config.player_max_hp),
            enemy: CombatantState::new(Side::Enemy, config.enemy_fallback_hp),
            meter: ResourceMeter::new(config.max_pulse),
            config,
            phase: BattlePhase::AwaitingStart,
            round: 0,
            enemy_def: None,
            intent_cursor: 0,
            planned: None,
            threat_applied: false,
            rng,
            events: Vec::new(),
        }
    }

    /// Reset both sides to full HP and zero Block, then begin the first
    /// player turn.
    pub fn start_battle(&mut self, enemy: &EnemyDefinition) {
        let enemy_hp = if enemy.max_hp > 0 { enemy.max_hp } else { self.config.enemy_fallback_hp };
        self.player.reset(self.config.player_max_hp);
        self.enemy.reset(enemy_hp);
        self.meter = ResourceMeter::new(self.config.max_pulse);
        self.round = 1;
        self.intent_cursor = 0;
        self.planned = None;
        self.threat_applied = false;
        self.enemy_def = Some(enemy.clone());
        self.events.clear();

        log::info!("battle started against {enemy}");
        self.events.push(BattleEvent::BattleStarted { enemy: enemy.name.clone() });
        self.begin_player_turn();
    }

    #[must_use]
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// True between `start_battle` and the end of the battle.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.phase, BattlePhase::PlayerTurn | BattlePhase::EnemyTurn)
    }

    #[must_use]
    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.phase {
            BattlePhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Current round, starting at 1.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn player(&self) -> &CombatantState {
        &self.player
    }

    #[must_use]
    pub fn enemy(&self) -> &CombatantState {
        &self.enemy
    }

    #[must_use]
    pub fn combatant(&self, side: Side) -> &CombatantState {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    #[must_use]
    pub fn meter(&self) -> &ResourceMeter {
        &self.meter
    }

    pub fn meter_mut(&mut self) -> &mut ResourceMeter {
        &mut self.meter
    }

    #[must_use]
    pub fn enemy_definition(&self) -> Option<&EnemyDefinition> {
        self.enemy_def.as_ref()
    }

    /// The step the enemy will execute on its next turn.
    #[must_use]
    pub fn upcoming_intent(&self) -> Option<IntentStep> {
        self.planned
    }

    /// Record an event in the battle queue.
    pub fn record(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Damage one side through its Block, then check for battle end.
    ///
    /// Returns the HP lost. Does nothing unless the battle is running.
    pub fn deal_damage(&mut self, side: Side, amount: i32) -> i32 {
        if !self.is_running() {
            return 0;
        }
        let lost = self.combatant_mut(side).apply_damage(amount);
        self.check_battle_end();
        lost
    }

    /// Add Block to one side while the battle is running.
    pub fn gain_block(&mut self, side: Side, amount: i32) {
        if self.is_running() {
            self.combatant_mut(side).gain_block(amount);
        }
    }

    /// HP loss that ignores Block, then check for battle end.
    pub fn lose_hp(&mut self, side: Side, amount: i32) -> i32 {
        if !self.is_running() {
            return 0;
        }
        let lost = self.combatant_mut(side).lose_hp(amount);
        self.check_battle_end();
        lost
    }

    /// End the player's turn and run the enemy turn.
    ///
    /// `hp_loss` is the end-of-turn HP loss gathered by the caller. The
    /// first call in each battle also lets the enemy place its threat mark.
    pub fn end_player_turn(&mut self, hp_loss: i32, marks: &mut MarkTracker) {
        if self.phase != BattlePhase::PlayerTurn {
            return;
        }
        self.player.clear_block();

        if !self.threat_applied {
            self.threat_applied = true;
            let tag = self.pick_threat();
            marks.apply_threat(tag);
            self.events.push(BattleEvent::ThreatMarked { tag });
        }

        if hp_loss > 0 {
            log::debug!("end of turn: player loses {hp_loss} HP");
            self.events.push(BattleEvent::EndOfTurnHpLoss { amount: hp_loss });
            self.lose_hp(Side::Player, hp_loss);
            if !self.is_running() {
                return;
            }
        }

        self.events.push(BattleEvent::PlayerTurnEnded { round: self.round });
        self.run_enemy_turn();
    }

    fn combatant_mut(&mut self, side: Side) -> &mut CombatantState {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    fn begin_player_turn(&mut self) {
        self.phase = BattlePhase::PlayerTurn;
        self.meter.reset_for_new_turn();
        self.planned = self.plan_intent();
        log::debug!("round {} player turn", self.round);
        self.events.push(BattleEvent::PlayerTurnStarted { round: self.round });
    }

    fn run_enemy_turn(&mut self) {
        self.phase = BattlePhase::EnemyTurn;
        self.events.push(BattleEvent::EnemyTurnStarted { round: self.round });
        self.enemy.clear_block();

        let step = self.planned.take();
        self.execute_intent(step);
        if self.check_battle_end() {
            return;
        }

        self.events.push(BattleEvent::EnemyTurnEnded { round: self.round });
        self.round += 1;
        self.begin_player_turn();
    }

    fn plan_intent(&mut self) -> Option<IntentStep> {
        let enemy = self.enemy_def.as_ref()?;
        if enemy.intents.is_empty() {
            return None;
        }
        if enemy.randomize_intents {
            return self.rng.choose(&enemy.intents).copied();
        }
        let step = enemy.intents[self.intent_cursor % enemy.intents.len()];
        self.intent_cursor += 1;
        Some(step)
    }

    fn execute_intent(&mut self, step: Option<IntentStep>) {
        self.events.push(BattleEvent::IntentExecuted { step });
        let Some(step) = step else {
            log::debug!("enemy has no intent, fallback attack");
            self.deal_damage(Side::Player, self.config.fallback_enemy_damage);
            return;
        };

        log::debug!("enemy intent: {step}");
        match step.kind {
            IntentKind::Attack | IntentKind::MultiAttack => {
                for _ in 0..step.hits() {
                    self.deal_damage(Side::Player, step.value);
                }
            }
            IntentKind::Block => self.enemy.gain_block(step.value),
            IntentKind::ApplyStatus => self.events.push(BattleEvent::StatusApplied {
                target: Side::Player,
                status: step.status,
                stacks: step.value,
            }),
            IntentKind::DoNothing => {}
            IntentKind::Special => {
                self.deal_damage(Side::Player, step.value.max(1));
            }
        }
    }

    fn pick_threat(&mut self) -> BodyTag {
        let preferred = self
            .enemy_def
            .as_ref()
            .and_then(|enemy| enemy.threat_priority.first().copied());
        match preferred {
            Some(tag) => tag,
            None if self.rng.gen_bool(0.5) => BodyTag::Skin,
            None => BodyTag::Eye,
        }
    }

    fn check_battle_end(&mut self) -> bool {
        if !self.is_running() {
            return matches!(self.phase, BattlePhase::Ended(_));
        }
        let outcome = if self.enemy.is_dead() {
            BattleOutcome::Won
        } else if self.player.is_dead() {
            BattleOutcome::Lost
        } else {
            return false;
        };
        self.phase = BattlePhase::Ended(outcome);
        self.planned = None;
        log::info!("battle ended: {outcome:?} in round {}", self.round);
        self.events.push(BattleEvent::BattleEnded { outcome });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TurnEngine {
        TurnEngine::new(BattleConfig::default(), GameRng::new(11))
    }

    #[test]
    fn test_start_battle() {
        let mut engine = engine();
        assert_eq!(engine.phase(), BattlePhase::AwaitingStart);
        assert!(!engine.is_running());

        engine.start_battle(&EnemyDefinition::new("Husk", 25));

        assert_eq!(engine.phase(), BattlePhase::PlayerTurn);
        assert_eq!(engine.round(), 1);
        assert_eq!(engine.player().hp(), 60);
        assert_eq!(engine.enemy().hp(), 25);
        assert_eq!(engine.player().block(), 0);
        assert_eq!(engine.enemy().block(), 0);
        assert_eq!(engine.meter().current(), 3);
    }

    #[test]
    fn test_enemy_hp_fallback() {
        let mut engine = engine();
        engine.start_battle(&EnemyDefinition::new("Nameless", 0));
        assert_eq!(engine.enemy().max_hp(), 40);
    }

    #[test]
    fn test_intents_cycle_in_order() {
        let mut engine = engine();
        let mut marks = MarkTracker::new();
        engine.start_battle(
            &EnemyDefinition::new("Cycler", 50)
                .with_intent(IntentStep::attack(4))
                .with_intent(IntentStep::block(6))
                .with_threat(BodyTag::Skin),
        );

        assert_eq!(engine.upcoming_intent(), Some(IntentStep::attack(4)));
        engine.end_player_turn(0, &mut marks);
        assert_eq!(engine.player().hp(), 56);
        assert_eq!(engine.round(), 2);

        assert_eq!(engine.upcoming_intent(), Some(IntentStep::block(6)));
        engine.end_player_turn(0, &mut marks);
        assert_eq!(engine.enemy().block(), 6);

        assert_eq!(engine.upcoming_intent(), Some(IntentStep::attack(4)));
    }

    #[test]
    fn test_block_clears_each_turn() {
        let mut engine = engine();
        let mut marks = MarkTracker::new();
        engine.start_battle(&EnemyDefinition::new("Wall", 50).with_intent(IntentStep::block(5)));

        engine.gain_block(Side::Player, 7);
        engine.end_player_turn(0, &mut marks);
        assert_eq!(engine.player().block(), 0);
        assert_eq!(engine.enemy().block(), 5);

        engine.end_player_turn(0, &mut marks);
        assert_eq!(engine.enemy().block(), 5);
    }

    #[test]
    fn test_multi_attack_through_block() {
        let mut engine = engine();
        let mut marks = MarkTracker::new();
        let biter = EnemyDefinition::new("Biter", 50).with_intent(IntentStep::multi_attack(3, 3));
        engine.start_battle(&biter);

        engine.end_player_turn(0, &mut marks);
        assert_eq!(engine.player().hp(), 51);
    }

    #[test]
    fn test_empty_script_uses_fallback_damage() {
        let mut engine = engine();
        let mut marks = MarkTracker::new();
        engine.start_battle(&EnemyDefinition::new("Blob", 30));

        assert_eq!(engine.upcoming_intent(), None);
        engine.end_player_turn(0, &mut marks);
        assert_eq!(engine.player().hp(), 55);
    }

    #[test]
    fn test_threat_mark_once_per_battle() {
        let mut engine = engine();
        let mut marks = MarkTracker::new();
        engine.start_battle(
            &EnemyDefinition::new("Gazer", 30)
                .with_intent(IntentStep::do_nothing())
                .with_threat(BodyTag::Eye),
        );

        engine.end_player_turn(0, &mut marks);
        assert_eq!(marks.threat(), Some(BodyTag::Eye));

        marks.clear_all();
        engine.end_player_turn(0, &mut marks);
        assert_eq!(marks.threat(), None);
    }

    #[test]
    fn test_random_threat_when_no_priority() {
        let mut engine = engine();
        let mut marks = MarkTracker::new();
        let drifter = EnemyDefinition::new("Drifter", 30).with_intent(IntentStep::do_nothing());
        engine.start_battle(&drifter);
        engine.end_player_turn(0, &mut marks);
        assert!(marks.threat().is_some());
    }

    #[test]
    fn test_win_freezes_engine() {
        let mut engine = engine();
        let mut marks = MarkTracker::new();
        engine.start_battle(&EnemyDefinition::new("Weak", 5).with_intent(IntentStep::attack(9)));

        engine.deal_damage(Side::Enemy, 8);

        assert_eq!(engine.outcome(), Some(BattleOutcome::Won));
        assert!(!engine.is_running());
        assert_eq!(engine.enemy().hp(), 0);

        engine.end_player_turn(0, &mut marks);
        engine.deal_damage(Side::Player, 10);
        assert_eq!(engine.player().hp(), 60);
        assert_eq!(engine.round(), 1);
    }

    #[test]
    fn test_enemy_kills_player() {
        let config = BattleConfig { player_max_hp: 10, ..BattleConfig::default() };
        let mut engine = TurnEngine::new(config, GameRng::new(1));
        let mut marks = MarkTracker::new();
        engine.start_battle(&EnemyDefinition::new("Brute", 30).with_intent(IntentStep::attack(15)));

        engine.end_player_turn(0, &mut marks);

        assert_eq!(engine.outcome(), Some(BattleOutcome::Lost));
        assert_eq!(engine.player().hp(), 0);
        let events = engine.drain_events();
        assert_eq!(events.last(), Some(&BattleEvent::BattleEnded { outcome: BattleOutcome::Lost }));
    }

    #[test]
    fn test_end_of_turn_loss_ignores_block() {
        let mut engine = engine();
        let mut marks = MarkTracker::new();
        let idle = EnemyDefinition::new("Idle", 30).with_intent(IntentStep::do_nothing());
        engine.start_battle(&idle);

        engine.gain_block(Side::Player, 10);
        engine.end_player_turn(3, &mut marks);

        assert_eq!(engine.player().hp(), 57);
    }

    #[test]
    fn test_event_order() {
        let mut engine = engine();
        let mut marks = MarkTracker::new();
        engine.start_battle(
            &EnemyDefinition::new("Idle", 30)
                .with_intent(IntentStep::do_nothing())
                .with_threat(BodyTag::Skin),
        );
        engine.end_player_turn(0, &mut marks);

        let events = engine.drain_events();
        assert_eq!(
            events,
            vec![
                BattleEvent::BattleStarted { enemy: "Idle".to_string() },
                BattleEvent::PlayerTurnStarted { round: 1 },
                BattleEvent::ThreatMarked { tag: BodyTag::Skin },
                BattleEvent::PlayerTurnEnded { round: 1 },
                BattleEvent::EnemyTurnStarted { round: 1 },
                BattleEvent::IntentExecuted { step: Some(IntentStep::do_nothing()) },
                BattleEvent::EnemyTurnEnded { round: 1 },
                BattleEvent::PlayerTurnStarted { round: 2 },
            ]
        );
        assert!(engine.drain_events().is_empty());
    }
}
