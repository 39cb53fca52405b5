//! Post-battle rewards: harvest offers, corruption and defeat curses.

pub mod engine;

pub use engine::{CorruptionOutcome, HarvestInput, RewardEngine, RewardOffer};
