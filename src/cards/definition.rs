//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type: cost,
//! base numbers, routing flags and the ordered effect list the resolver
//! walks. Piles and decks only store `CardId`s that point back here.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::effects::{CustomOp, EffectDefinition, EffectType};

/// Unique identifier for a card definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Thematic family tying cards, tools and harvested parts together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardFamily {
    Neutral,
    Skin,
    Eye,
    Blood,
    Limb,
}

impl CardFamily {
    /// Families that have their own reward pool, in pool order.
    pub const HARVESTABLE: [CardFamily; 4] =
        [CardFamily::Skin, CardFamily::Eye, CardFamily::Blood, CardFamily::Limb];

    /// Numeric code shared with [`BodyTag::code`].
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            CardFamily::Neutral => 0,
            CardFamily::Skin => 10,
            CardFamily::Eye => 20,
            CardFamily::Blood => 30,
            CardFamily::Limb => 40,
        }
    }
}

/// Rarity bucket. `Curse` marks negative cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardRarity {
    Common,
    Uncommon,
    Rare,
    Curse,
}

/// Body part a mark can point at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyTag {
    Skin,
    Eye,
}

impl BodyTag {
    /// The card family harvested from this body part.
    #[must_use]
    pub const fn family(self) -> CardFamily {
        match self {
            BodyTag::Skin => CardFamily::Skin,
            BodyTag::Eye => CardFamily::Eye,
        }
    }

    /// Numeric code, matching the family code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.family().code()
    }

    /// Decode a tag from an effect operand.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            10 => Some(BodyTag::Skin),
            20 => Some(BodyTag::Eye),
            _ => None,
        }
    }
}

impl std::fmt::Display for BodyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyTag::Skin => write!(f, "Skin"),
            BodyTag::Eye => write!(f, "Eye"),
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use harvest_core::cards::{CardDefinition, CardFamily, CardId};
///
/// let cut = CardDefinition::new(CardId::new(1), "Cut", CardFamily::Skin)
///     .with_cost(1)
///     .with_damage(6);
///
/// assert_eq!(cut.rules_text(), "Deal 6.");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub family: CardFamily,
    pub rarity: CardRarity,

    /// Pulse spent to play the card.
    #[serde(default)]
    pub cost: i32,

    #[serde(default)]
    pub base_damage: i32,
    #[serde(default)]
    pub base_block: i32,
    #[serde(default)]
    pub base_draw: i32,
    #[serde(default)]
    pub base_scry: i32,

    /// Goes to the exhaust pile after it is played.
    #[serde(default)]
    pub exhaust_after_play: bool,

    /// Stays in hand at end of turn.
    #[serde(default)]
    pub retain_in_hand: bool,

    /// Effects resolved in order after the base numbers.
    #[serde(default)]
    pub effects: SmallVec<[EffectDefinition; 4]>,

    /// Replaces the generated rules line when present.
    #[serde(default)]
    pub rules_override: Option<String>,
}

impl CardDefinition {
    /// Create a common card with no cost and no effects.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, family: CardFamily) -> Self {
        Self {
            id,
            name: name.into(),
            family,
            rarity: CardRarity::Common,
            cost: 0,
            base_damage: 0,
            base_block: 0,
            base_draw: 0,
            base_scry: 0,
            exhaust_after_play: false,
            retain_in_hand: false,
            effects: SmallVec::new(),
            rules_override: None,
        }
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: CardRarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = cost.max(0);
        self
    }

    #[must_use]
    pub fn with_damage(mut self, amount: i32) -> Self {
        self.base_damage = amount.max(0);
        self
    }

    #[must_use]
    pub fn with_block(mut self, amount: i32) -> Self {
        self.base_block = amount.max(0);
        self
    }

    #[must_use]
    pub fn with_draw(mut self, amount: i32) -> Self {
        self.base_draw = amount.max(0);
        self
    }

    #[must_use]
    pub fn with_scry(mut self, amount: i32) -> Self {
        self.base_scry = amount.max(0);
        self
    }

    #[must_use]
    pub fn exhausting(mut self) -> Self {
        self.exhaust_after_play = true;
        self
    }

    #[must_use]
    pub fn retained(mut self) -> Self {
        self.retain_in_hand = true;
        self
    }

    /// Append an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: EffectDefinition) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_rules_override(mut self, text: impl Into<String>) -> Self {
        self.rules_override = Some(text.into());
        self
    }

    #[must_use]
    pub fn is_curse(&self) -> bool {
        self.rarity == CardRarity::Curse
    }

    /// True if any effect carries the unplayable opcode.
    #[must_use]
    pub fn is_unplayable(&self) -> bool {
        self.custom_ops().any(|(op, _)| op == CustomOp::Unplayable)
    }

    /// HP lost at end of turn while this card sits in hand.
    #[must_use]
    pub fn end_of_turn_hp_loss(&self) -> i32 {
        self.custom_ops()
            .filter(|(op, _)| *op == CustomOp::EndTurnLoseHp)
            .map(|(_, effect)| effect.magnitude())
            .sum()
    }

    fn custom_ops(&self) -> impl Iterator<Item = (CustomOp, &EffectDefinition)> {
        self.effects.iter().filter_map(|effect| {
            if effect.effect_type != EffectType::Custom {
                return None;
            }
            CustomOp::from_code(effect.value).map(|op| (op, effect))
        })
    }

    /// Human-readable rules line.
    #[must_use]
    pub fn rules_text(&self) -> String {
        if let Some(text) = self.rules_override.as_deref() {
            if !text.trim().is_empty() {
                return text.trim().to_string();
            }
        }

        let mut parts: Vec<String> = Vec::new();
        if self.base_damage > 0 {
            parts.push(format!("Deal {}.", self.base_damage));
        }
        if self.base_block > 0 {
            parts.push(format!("Gain {} Block.", self.base_block));
        }
        if self.base_draw > 0 {
            parts.push(format!("Draw {}.", self.base_draw));
        }
        if self.base_scry > 0 {
            parts.push(format!("Scry {}.", self.base_scry));
        }
        parts.extend(self.effects.iter().filter_map(EffectDefinition::describe));
        if self.exhaust_after_play {
            parts.push("Exhaust.".to_string());
        }
        parts.join(" ")
    }
}

impl std::fmt::Display for CardDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{:?}/{:?}] Cost:{}", self.name, self.family, self.rarity, self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectTarget, StatusKind};

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_body_tag_codes() {
        assert_eq!(BodyTag::from_code(BodyTag::Skin.code()), Some(BodyTag::Skin));
        assert_eq!(BodyTag::from_code(20), Some(BodyTag::Eye));
        assert_eq!(BodyTag::from_code(0), None);
        assert_eq!(BodyTag::Eye.family(), CardFamily::Eye);
    }

    #[test]
    fn test_builder_clamps_negatives() {
        let card = CardDefinition::new(CardId::new(1), "Odd", CardFamily::Neutral)
            .with_cost(-2)
            .with_damage(-5);
        assert_eq!(card.cost, 0);
        assert_eq!(card.base_damage, 0);
    }

    #[test]
    fn test_unplayable_and_end_turn_loss() {
        let parasite = CardDefinition::new(CardId::new(2), "Parasite", CardFamily::Neutral)
            .with_rarity(CardRarity::Curse)
            .with_effect(EffectDefinition::custom(CustomOp::Unplayable, 0))
            .with_effect(EffectDefinition::custom(CustomOp::EndTurnLoseHp, 2));

        assert!(parasite.is_curse());
        assert!(parasite.is_unplayable());
        assert_eq!(parasite.end_of_turn_hp_loss(), 2);

        let plain = CardDefinition::new(CardId::new(3), "Plain", CardFamily::Skin);
        assert!(!plain.is_unplayable());
        assert_eq!(plain.end_of_turn_hp_loss(), 0);
    }

    #[test]
    fn test_rules_text_composition() {
        let card = CardDefinition::new(CardId::new(4), "Clot Shield", CardFamily::Skin)
            .with_block(5)
            .with_draw(1)
            .with_effect(EffectDefinition::custom(CustomOp::BleedBonusNext, 2))
            .with_effect(EffectDefinition::status(EffectTarget::Enemy, StatusKind::Bleed, 3))
            .exhausting();

        assert_eq!(
            card.rules_text(),
            "Gain 5 Block. Draw 1. Next time you apply Bleed this combat, +2 stack. \
             Apply 3 Bleed. Exhaust."
        );
    }

    #[test]
    fn test_rules_override_wins() {
        let card = CardDefinition::new(CardId::new(5), "Liar", CardFamily::Neutral)
            .with_damage(3)
            .with_rules_override("  Exhaust. Do nothing.  ");
        assert_eq!(card.rules_text(), "Exhaust. Do nothing.");
    }

    #[test]
    fn test_card_definition_serialization() {
        let card = CardDefinition::new(CardId::new(1), "Test", CardFamily::Eye)
            .with_cost(2)
            .with_effect(EffectDefinition::damage(EffectTarget::Enemy, 3, 2));

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: CardDefinition = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
    }

    #[test]
    fn test_minimal_json_defaults() {
        let json = r#"{ "id": 9, "name": "Wound", "family": "Neutral", "rarity": "Curse" }"#;
        let card: CardDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(card.cost, 0);
        assert!(card.effects.is_empty());
        assert!(card.is_curse());
    }
}
