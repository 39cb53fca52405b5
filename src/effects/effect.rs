//! Effect definitions.
//!
//! An effect is one data-driven instruction on a card. The resolver walks
//! a card's effects in literal order; `Custom` effects carry an opcode in
//! `value` and their magnitude in `value2`.

use serde::{Deserialize, Serialize};

use crate::cards::BodyTag;

/// Kind of instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    Damage,
    GainBlock,
    Draw,
    Scry,
    GainPulse,
    ApplyStatus,
    RemoveStatus,
    ExhaustSelf,
    RetainSelf,
    Custom,
}

/// Who an effect lands on.
///
/// Battles are one-on-one, so every enemy-side target means "the enemy".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTarget {
    #[serde(rename = "Self")]
    SelfTarget,
    #[default]
    Enemy,
    AllEnemies,
    RandomEnemy,
}

impl EffectTarget {
    /// True for any enemy-side target.
    #[must_use]
    pub fn is_enemy(self) -> bool {
        !matches!(self, EffectTarget::SelfTarget)
    }
}

/// Status kinds. Application is a notice only; there is no status simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    #[default]
    Bleed,
    Weak,
    Blind,
    Stagger,
}

/// Opcodes carried by `Custom` effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CustomOp {
    RevealIntent,
    MarkEnemy,
    ExhaustOneCurseFromHand,
    EndTurnLoseHp,
    BleedBonusNext,
    Unplayable,
}

impl CustomOp {
    /// Opcode value stored in `EffectDefinition::value`.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            CustomOp::RevealIntent => 1,
            CustomOp::MarkEnemy => 2,
            CustomOp::ExhaustOneCurseFromHand => 3,
            CustomOp::EndTurnLoseHp => 4,
            CustomOp::BleedBonusNext => 5,
            CustomOp::Unplayable => 9,
        }
    }

    /// Decode an opcode. Unknown values return `None`.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(CustomOp::RevealIntent),
            2 => Some(CustomOp::MarkEnemy),
            3 => Some(CustomOp::ExhaustOneCurseFromHand),
            4 => Some(CustomOp::EndTurnLoseHp),
            5 => Some(CustomOp::BleedBonusNext),
            9 => Some(CustomOp::Unplayable),
            _ => None,
        }
    }
}

/// One effect on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectDefinition {
    #[serde(rename = "type")]
    pub effect_type: EffectType,

    #[serde(default)]
    pub target: EffectTarget,

    /// Primary magnitude, or the opcode for `Custom`.
    #[serde(default)]
    pub value: i32,

    /// Secondary magnitude: hit count for `Damage`, operand for `Custom`.
    #[serde(default)]
    pub value2: i32,

    #[serde(default)]
    pub status: StatusKind,
}

impl EffectDefinition {
    /// Create an effect with zeroed operands.
    #[must_use]
    pub fn new(effect_type: EffectType, target: EffectTarget) -> Self {
        Self {
            effect_type,
            target,
            value: 0,
            value2: 0,
            status: StatusKind::default(),
        }
    }

    /// `amount` damage, `hits` times.
    #[must_use]
    pub fn damage(target: EffectTarget, amount: i32, hits: i32) -> Self {
        Self { value: amount, value2: hits, ..Self::new(EffectType::Damage, target) }
    }

    #[must_use]
    pub fn block(amount: i32) -> Self {
        Self { value: amount, ..Self::new(EffectType::GainBlock, EffectTarget::SelfTarget) }
    }

    #[must_use]
    pub fn draw(count: i32) -> Self {
        Self { value: count, ..Self::new(EffectType::Draw, EffectTarget::SelfTarget) }
    }

    #[must_use]
    pub fn scry(count: i32) -> Self {
        Self { value: count, ..Self::new(EffectType::Scry, EffectTarget::SelfTarget) }
    }

    #[must_use]
    pub fn gain_pulse(amount: i32) -> Self {
        Self { value: amount, ..Self::new(EffectType::GainPulse, EffectTarget::SelfTarget) }
    }

    #[must_use]
    pub fn status(target: EffectTarget, status: StatusKind, stacks: i32) -> Self {
        Self { value: stacks, status, ..Self::new(EffectType::ApplyStatus, target) }
    }

    #[must_use]
    pub fn remove_status(target: EffectTarget, status: StatusKind, stacks: i32) -> Self {
        Self { value: stacks, status, ..Self::new(EffectType::RemoveStatus, target) }
    }

    #[must_use]
    pub fn exhaust_self() -> Self {
        Self::new(EffectType::ExhaustSelf, EffectTarget::SelfTarget)
    }

    #[must_use]
    pub fn retain_self() -> Self {
        Self::new(EffectType::RetainSelf, EffectTarget::SelfTarget)
    }

    /// Custom opcode with its operand in `value2`.
    #[must_use]
    pub fn custom(op: CustomOp, operand: i32) -> Self {
        Self {
            value: op.code(),
            value2: operand,
            ..Self::new(EffectType::Custom, EffectTarget::Enemy)
        }
    }

    /// Mark the enemy's body part for harvest.
    #[must_use]
    pub fn mark_enemy(tag: BodyTag) -> Self {
        Self::custom(CustomOp::MarkEnemy, tag.code())
    }

    /// Operand of a stacking custom effect, at least 1.
    #[must_use]
    pub fn magnitude(&self) -> i32 {
        self.value2.max(1)
    }

    /// Hit count of a damage effect, at least 1.
    #[must_use]
    pub fn hits(&self) -> i32 {
        self.value2.max(1)
    }

    /// Body tag named by a mark-enemy operand. Anything unrecognised marks the eye.
    #[must_use]
    pub fn mark_tag(&self) -> BodyTag {
        BodyTag::from_code(self.value2).unwrap_or(BodyTag::Eye)
    }

    /// Rules-text phrase, if the effect has one.
    #[must_use]
    pub fn describe(&self) -> Option<String> {
        let text = match self.effect_type {
            EffectType::Damage if self.hits() > 1 => {
                format!("Deal {}×{}.", self.value, self.hits())
            }
            EffectType::Damage => format!("Deal {}.", self.value),
            EffectType::GainBlock => format!("Gain {} Block.", self.value),
            EffectType::Draw => format!("Draw {}.", self.value),
            EffectType::Scry => format!("Scry {}.", self.value),
            EffectType::GainPulse => format!("Gain {} Pulse.", self.value),
            EffectType::ApplyStatus => format!("Apply {} {:?}.", self.value, self.status),
            EffectType::RemoveStatus => format!("Remove {} {:?}.", self.value, self.status),
            EffectType::ExhaustSelf => "Exhaust.".to_string(),
            EffectType::RetainSelf => "Retain.".to_string(),
            EffectType::Custom => match CustomOp::from_code(self.value)? {
                CustomOp::RevealIntent => "Reveal intent.".to_string(),
                CustomOp::MarkEnemy => format!("Mark {}.", self.mark_tag()),
                CustomOp::ExhaustOneCurseFromHand => "Exhaust a Curse in hand.".to_string(),
                CustomOp::EndTurnLoseHp => {
                    format!("End of turn: lose {} HP.", self.magnitude())
                }
                CustomOp::BleedBonusNext => format!(
                    "Next time you apply Bleed this combat, +{} stack.",
                    self.magnitude()
                ),
                CustomOp::Unplayable => "Unplayable.".to_string(),
            },
        };
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_op_codes() {
        for op in [
            CustomOp::RevealIntent,
            CustomOp::MarkEnemy,
            CustomOp::ExhaustOneCurseFromHand,
            CustomOp::EndTurnLoseHp,
            CustomOp::BleedBonusNext,
            CustomOp::Unplayable,
        ] {
            assert_eq!(CustomOp::from_code(op.code()), Some(op));
        }
        assert_eq!(CustomOp::from_code(42), None);
        assert_eq!(CustomOp::Unplayable.code(), 9);
    }

    #[test]
    fn test_damage_hits_at_least_one() {
        assert_eq!(EffectDefinition::damage(EffectTarget::Enemy, 4, 0).hits(), 1);
        assert_eq!(EffectDefinition::damage(EffectTarget::Enemy, 4, 3).hits(), 3);
    }

    #[test]
    fn test_mark_tag_defaults_to_eye() {
        assert_eq!(EffectDefinition::mark_enemy(BodyTag::Skin).mark_tag(), BodyTag::Skin);
        assert_eq!(EffectDefinition::custom(CustomOp::MarkEnemy, 0).mark_tag(), BodyTag::Eye);
    }

    #[test]
    fn test_describe() {
        let multi = EffectDefinition::damage(EffectTarget::Enemy, 3, 2);
        assert_eq!(multi.describe().as_deref(), Some("Deal 3×2."));

        let loss = EffectDefinition::custom(CustomOp::EndTurnLoseHp, 0);
        assert_eq!(loss.describe().as_deref(), Some("End of turn: lose 1 HP."));

        let unknown =
            EffectDefinition { value: 77, ..EffectDefinition::custom(CustomOp::Unplayable, 0) };
        assert_eq!(unknown.describe(), None);
    }

    #[test]
    fn test_effect_json_shape() {
        let json = r#"{ "type": "Damage", "target": "Self", "value": 2 }"#;
        let effect: EffectDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(effect.effect_type, EffectType::Damage);
        assert_eq!(effect.target, EffectTarget::SelfTarget);
        assert_eq!(effect.value2, 0);
        assert_eq!(effect.status, StatusKind::Bleed);
    }
}
