//! Core engine types: combatants, RNG, configuration, errors.
//!
//! These are the leaf building blocks shared by every other module.

pub mod combatant;
pub mod config;
pub mod error;
pub mod rng;

pub use combatant::{CombatantState, Side};
pub use config::{BattleConfig, EngineConfig, RewardConfig, SeedConfig};
pub use error::{CatalogError, ConfigError, SetupError};
pub use rng::{GameRng, GameRngState};
