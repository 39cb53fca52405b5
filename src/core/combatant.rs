//! Hit points and Block for one side of a battle.
//!
//! All damage in the engine goes through [`CombatantState::apply_damage`]:
//! Block absorbs first, the remainder comes off HP, and neither value is
//! ever observable below zero.

use serde::{Deserialize, Serialize};

/// Which side of a battle a combatant is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "Player"),
            Side::Enemy => write!(f, "Enemy"),
        }
    }
}

/// HP and Block of a combatant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantState {
    side: Side,
    max_hp: i32,
    hp: i32,
    block: i32,
}

impl CombatantState {
    /// Create a combatant at full HP with no Block.
    ///
    /// `max_hp` is raised to 1 if lower.
    #[must_use]
    pub fn new(side: Side, max_hp: i32) -> Self {
        let max_hp = max_hp.max(1);
        Self { side, max_hp, hp: max_hp, block: 0 }
    }

    /// Reset to full HP with no Block, adopting a new maximum.
    pub fn reset(&mut self, max_hp: i32) {
        self.max_hp = max_hp.max(1);
        self.hp = self.max_hp;
        self.block = 0;
        log::trace!("{} reset to {}/{}", self.side, self.hp, self.max_hp);
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn is_player(&self) -> bool {
        self.side == Side::Player
    }

    #[must_use]
    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    #[must_use]
    pub fn hp(&self) -> i32 {
        self.hp
    }

    #[must_use]
    pub fn block(&self) -> i32 {
        self.block
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Add Block. Non-positive amounts are ignored.
    pub fn gain_block(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.block = self.block.saturating_add(amount);
        log::trace!("{} block +{} -> {}", self.side, amount, self.block);
    }

    /// Remove all Block.
    pub fn clear_block(&mut self) {
        self.block = 0;
    }

    /// Apply damage: Block absorbs first, the rest spills onto HP.
    ///
    /// Returns the HP actually lost.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let absorbed = self.block.min(amount);
        self.block -= absorbed;
        let spill = amount - absorbed;
        if spill <= 0 {
            log::trace!("{} absorbed {}, block {}", self.side, absorbed, self.block);
            return 0;
        }
        let before = self.hp;
        self.hp = (self.hp - spill).max(0);
        log::trace!("{} took {} -> {}/{}", self.side, spill, self.hp, self.max_hp);
        before - self.hp
    }

    /// Lose HP directly, ignoring Block.
    ///
    /// Returns the HP actually lost.
    pub fn lose_hp(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let before = self.hp;
        self.hp = (self.hp - amount).max(0);
        before - self.hp
    }
}
