//! Battle events.
//!
//! The turn engine and the battle session record what happened in a
//! per-battle queue. Hosts drain it after each call to drive presentation.

use serde::{Deserialize, Serialize};

use super::enemy::IntentStep;
use crate::cards::{BodyTag, CardId};
use crate::core::Side;
use crate::effects::{Routing, StatusKind};

/// How a battle ended, from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    Won,
    Lost,
}

/// Something that happened during a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BattleEvent {
    BattleStarted { enemy: String },
    PlayerTurnStarted { round: u32 },
    PlayerTurnEnded { round: u32 },
    EnemyTurnStarted { round: u32 },
    /// `None` when the enemy had no script and used the fallback attack.
    IntentExecuted { step: Option<IntentStep> },
    EnemyTurnEnded { round: u32 },
    BattleEnded { outcome: BattleOutcome },
    ThreatMarked { tag: BodyTag },
    EndOfTurnHpLoss { amount: i32 },
    CardPlayed { card: CardId },
    IntentRevealed { step: Option<IntentStep> },
    EnemyMarked { tag: BodyTag },
    CardRouted { card: CardId, routing: Routing },
    StatusApplied { target: Side, status: StatusKind, stacks: i32 },
    StatusRemoved { target: Side, status: StatusKind, stacks: i32 },
}
