//! Battle rules: turns, combatants, pulse, marks and enemy intents.
//!
//! ## Key Types
//!
//! - `TurnEngine`: the turn state machine and damage entry point
//! - `ResourceMeter`: per-turn pulse
//! - `MarkTracker`: harvest and threat marks for the current battle
//! - `EnemyDefinition` / `IntentStep`: enemy data and scripts
//! - `BattleEvent`: what happened, drained by the host

pub mod enemy;
pub mod event;
pub mod marks;
pub mod meter;
pub mod turn;

pub use enemy::{EnemyDefinition, IntentKind, IntentStep};
pub use event::{BattleEvent, BattleOutcome};
pub use marks::{ListenerId, MarkSlot, MarkTracker};
pub use meter::ResourceMeter;
pub use turn::{BattlePhase, TurnEngine};
