//! Enemy definitions and intent scripts.

use serde::{Deserialize, Serialize};

use crate::cards::BodyTag;
use crate::effects::StatusKind;

/// What an enemy does on its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    Attack,
    MultiAttack,
    Block,
    ApplyStatus,
    DoNothing,
    Special,
}

/// One step of an intent script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentStep {
    pub kind: IntentKind,

    /// Damage per hit, Block gained, or status stacks.
    #[serde(default)]
    pub value: i32,

    /// Hit count for attacks.
    #[serde(default)]
    pub times: i32,

    #[serde(default)]
    pub status: StatusKind,
}

impl IntentStep {
    #[must_use]
    pub fn new(kind: IntentKind, value: i32) -> Self {
        Self { kind, value, times: 1, status: StatusKind::default() }
    }

    #[must_use]
    pub fn attack(damage: i32) -> Self {
        Self::new(IntentKind::Attack, damage)
    }

    #[must_use]
    pub fn multi_attack(damage: i32, times: i32) -> Self {
        Self { times, ..Self::new(IntentKind::MultiAttack, damage) }
    }

    #[must_use]
    pub fn block(amount: i32) -> Self {
        Self::new(IntentKind::Block, amount)
    }

    #[must_use]
    pub fn status(status: StatusKind, stacks: i32) -> Self {
        Self { status, ..Self::new(IntentKind::ApplyStatus, stacks) }
    }

    #[must_use]
    pub fn do_nothing() -> Self {
        Self::new(IntentKind::DoNothing, 0)
    }

    #[must_use]
    pub fn special(value: i32) -> Self {
        Self::new(IntentKind::Special, value)
    }

    /// Hit count, at least 1.
    #[must_use]
    pub fn hits(&self) -> i32 {
        self.times.max(1)
    }

    /// Short preview text, e.g. "Attack 6×2" or "Bleed ×3".
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind {
            IntentKind::Attack | IntentKind::MultiAttack if self.hits() > 1 => {
                format!("Attack {}×{}", self.value, self.hits())
            }
            IntentKind::Attack | IntentKind::MultiAttack => format!("Attack {}", self.value),
            IntentKind::Block => format!("Block {}", self.value),
            IntentKind::ApplyStatus => format!("{:?} ×{}", self.status, self.value),
            IntentKind::DoNothing => "Waiting".to_string(),
            IntentKind::Special => format!("Special {}", self.value.max(1)),
        }
    }
}

impl std::fmt::Display for IntentStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Static enemy data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub name: String,

    /// Zero or less means "use the configured fallback".
    #[serde(default)]
    pub max_hp: i32,

    /// Pick a random step each turn instead of cycling in order.
    #[serde(default)]
    pub randomize_intents: bool,

    #[serde(default)]
    pub intents: Vec<IntentStep>,

    /// Body parts this enemy threatens, most wanted first.
    #[serde(default)]
    pub threat_priority: Vec<BodyTag>,
}

impl EnemyDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            max_hp,
            randomize_intents: false,
            intents: Vec::new(),
            threat_priority: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_intent(mut self, step: IntentStep) -> Self {
        self.intents.push(step);
        self
    }

    #[must_use]
    pub fn with_random_intents(mut self) -> Self {
        self.randomize_intents = true;
        self
    }

    #[must_use]
    pub fn with_threat(mut self, tag: BodyTag) -> Self {
        self.threat_priority.push(tag);
        self
    }
}

impl std::fmt::Display for EnemyDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (HP:{})", self.name, self.max_hp)
    }
}
