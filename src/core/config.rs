//! Engine configuration.
//!
//! Hosts provide an `EngineConfig` once at startup. There is no runtime
//! reconfiguration: a running battle or harvest reads the values it was
//! built with.
//!
//! - `BattleConfig`: hit points, pulse, hand sizes
//! - `RewardConfig`: harvest picker sizes, lying/corruption economy
//! - `SeedConfig`: the two independent random seeds

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::cards::BodyTag;

/// Battle tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Player maximum HP at the start of every battle.
    pub player_max_hp: i32,

    /// Enemy HP used when an enemy definition has none.
    pub enemy_fallback_hp: i32,

    /// Pulse available each player turn.
    pub max_pulse: i32,

    /// Hand size the player draws up to at the start of each turn.
    pub starting_hand: usize,

    /// Hard cap on cards in hand. Draws stop when it is reached.
    pub hand_limit: usize,

    /// Damage dealt by an enemy with an empty intent script.
    pub fallback_enemy_damage: i32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            player_max_hp: 60,
            enemy_fallback_hp: 40,
            max_pulse: 3,
            starting_hand: 5,
            hand_limit: 10,
            fallback_enemy_damage: 5,
        }
    }
}

/// Post-battle reward economy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Allow the corruption roll after a lying harvest.
    pub enable_lying: bool,

    /// Ask the presentation layer to tint lying offers.
    pub enable_corruption_tint: bool,

    /// Options offered after an honest harvest.
    pub honest_count: usize,

    /// Options offered after a lying harvest.
    pub lying_count: usize,

    /// Chance that a lying harvest plants the corruption card in the deck.
    pub corruption_chance: f64,

    /// Per-slot chance of downgrading an offer while the corruption card is in the deck.
    pub downgrade_chance: f64,

    /// Threat mark that makes a defeat cost the named curse.
    pub threat_curse_tag: BodyTag,

    /// Case-insensitive fragment of the curse name picked on a matching threat.
    pub threat_curse_name: String,

    /// Attempts to find an unused card per offer slot before allowing repeats.
    pub pick_retries: usize,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            enable_lying: true,
            enable_corruption_tint: true,
            honest_count: 3,
            lying_count: 2,
            corruption_chance: 0.15,
            downgrade_chance: 0.25,
            threat_curse_tag: BodyTag::Eye,
            threat_curse_name: "parasite".to_string(),
            pick_retries: 8,
        }
    }
}

/// Random seeds. `0` selects a non-deterministic source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Seeds pile shuffling and the enemy stream derived from it.
    pub shuffle_seed: u64,

    /// Seeds reward sampling, corruption and downgrade rolls.
    pub reward_seed: u64,
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub battle: BattleConfig,
    pub rewards: RewardConfig,
    pub seeds: SeedConfig,
}

impl EngineConfig {
    /// Set both seeds.
    #[must_use]
    pub fn with_seeds(mut self, shuffle_seed: u64, reward_seed: u64) -> Self {
        self.seeds = SeedConfig { shuffle_seed, reward_seed };
        self
    }

    /// Set the corruption chance.
    #[must_use]
    pub fn with_corruption_chance(mut self, chance: f64) -> Self {
        self.rewards.corruption_chance = chance;
        self
    }

    /// Set the per-slot downgrade chance.
    #[must_use]
    pub fn with_downgrade_chance(mut self, chance: f64) -> Self {
        self.rewards.downgrade_chance = chance;
        self
    }

    /// Set honest and lying picker sizes.
    #[must_use]
    pub fn with_picker_sizes(mut self, honest: usize, lying: usize) -> Self {
        self.rewards.honest_count = honest;
        self.rewards.lying_count = lying;
        self
    }

    /// Set the player's maximum HP.
    #[must_use]
    pub fn with_player_max_hp(mut self, hp: i32) -> Self {
        self.battle.player_max_hp = hp;
        self
    }

    /// Set the pulse available each turn.
    #[must_use]
    pub fn with_max_pulse(mut self, pulse: i32) -> Self {
        self.battle.max_pulse = pulse;
        self
    }

    /// Check ranges and counts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.rewards;
        for (name, value) in [
            ("corruption_chance", r.corruption_chance),
            ("downgrade_chance", r.downgrade_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }

        let b = &self.battle;
        for (name, value) in [
            ("honest_count", r.honest_count),
            ("lying_count", r.lying_count),
            ("hand_limit", b.hand_limit),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroCount { name });
            }
        }
        if b.player_max_hp <= 0 {
            return Err(ConfigError::ZeroCount { name: "player_max_hp" });
        }
        if b.enemy_fallback_hp <= 0 {
            return Err(ConfigError::ZeroCount { name: "enemy_fallback_hp" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.battle.player_max_hp, 60);
        assert_eq!(config.battle.max_pulse, 3);
        assert_eq!(config.rewards.honest_count, 3);
        assert_eq!(config.rewards.lying_count, 2);
        assert_eq!(config.rewards.threat_curse_tag, BodyTag::Eye);
        assert_eq!(config.seeds, SeedConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_seeds(11, 22)
            .with_corruption_chance(1.0)
            .with_picker_sizes(4, 1)
            .with_max_pulse(5);

        assert_eq!(config.seeds.shuffle_seed, 11);
        assert_eq!(config.seeds.reward_seed, 22);
        assert_eq!(config.rewards.corruption_chance, 1.0);
        assert_eq!(config.rewards.honest_count, 4);
        assert_eq!(config.rewards.lying_count, 1);
        assert_eq!(config.battle.max_pulse, 5);
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let config = EngineConfig::default().with_downgrade_chance(1.2);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange { name: "downgrade_chance", value: 1.2 })
        );
    }

    #[test]
    fn test_validate_rejects_zero_counts() {
        let config = EngineConfig::default().with_picker_sizes(3, 0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroCount { name: "lying_count" }));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "rewards": { "lying_count": 1 }, "seeds": { "reward_seed": 9 } }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.rewards.lying_count, 1);
        assert_eq!(config.rewards.honest_count, 3);
        assert_eq!(config.seeds.reward_seed, 9);
        assert_eq!(config.seeds.shuffle_seed, 0);
        assert_eq!(config.battle, BattleConfig::default());
    }
}
