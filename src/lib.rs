//! # harvest-core
//!
//! Combat, card effects and the harvest reward economy for a turn-based,
//! card-driven battler.
//!
//! ## Design Principles
//!
//! 1. **Single-threaded and synchronous**: one battle advances at a time and
//!    every request to a collaborator is a plain call/return.
//!
//! 2. **Data-driven cards**: a card is base numbers plus an ordered list of
//!    effects; custom behaviour is an opcode, not code.
//!
//! 3. **Owned context, not globals**: marks, piles and the pulse meter live
//!    in the battle and are lent to whoever needs them.
//!
//! 4. **Two random streams**: deck shuffling and the reward economy are
//!    seeded separately and replay independently.
//!
//! ## Modules
//!
//! - `core`: Combatants, RNG, configuration, errors
//! - `cards`: Card definitions, catalog, run deck
//! - `effects`: Effect definitions and the card resolver
//! - `piles`: Draw / Discard / Exhaust / Hand
//! - `battle`: Turn engine, pulse, marks, enemy intents, events
//! - `rewards`: Harvest offers, corruption, defeat curses
//! - `session`: `Battle` and `Run`, the host-facing entry points
//!
//! ## Example
//!
//! ```
//! use harvest_core::battle::{EnemyDefinition, IntentStep};
//! use harvest_core::cards::{CardCatalog, CardDefinition, CardFamily, CardId};
//! use harvest_core::core::EngineConfig;
//! use harvest_core::session::Run;
//!
//! let strike = CardDefinition::new(CardId::new(1), "Strike", CardFamily::Neutral)
//!     .with_cost(1)
//!     .with_damage(6);
//! let catalog = CardCatalog::new().with_card(strike).with_starter(CardId::new(1), 8);
//!
//! let mut run = Run::new(catalog, EngineConfig::default().with_seeds(1, 2)).unwrap();
//! run.start_battle(&EnemyDefinition::new("Husk", 12).with_intent(IntentStep::attack(3)));
//!
//! run.play(0).unwrap();
//! run.play(0).unwrap();
//! assert!(run.battle().outcome().is_some());
//! ```

pub mod battle;
pub mod cards;
pub mod core;
pub mod effects;
pub mod piles;
pub mod rewards;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    BattleConfig, CatalogError, CombatantState, ConfigError, EngineConfig, GameRng, GameRngState,
    RewardConfig, SeedConfig, SetupError, Side,
};

pub use crate::cards::{BodyTag, CardCatalog, CardDefinition, CardFamily, CardId, CardRarity, Deck};

pub use crate::effects::{
    CardCollaborator, CardPlay, CustomOp, EffectDefinition, EffectResolver, EffectTarget,
    EffectType, NullCollaborator, PlayRejected, ScryOutcome, StatusKind,
};

pub use crate::piles::{Pile, PileKind, PileSet};

pub use crate::battle::{
    BattleEvent, BattleOutcome, BattlePhase, EnemyDefinition, IntentKind, IntentStep, MarkSlot,
    MarkTracker, ResourceMeter, TurnEngine,
};

pub use crate::rewards::{CorruptionOutcome, HarvestInput, RewardEngine, RewardOffer};

pub use crate::session::{Battle, Run};
