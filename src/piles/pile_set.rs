//! The four battle piles and movement between them.
//!
//! A `Pile` is an ordered stack of `CardId`s: index 0 is the bottom, the
//! last element is the top. Cards are added to and drawn from the top.
//!
//! `PileSet` holds Draw, Discard, Exhaust and Hand for one battle. No
//! operation creates, drops or duplicates a card: the multiset union of
//! the four piles only changes through [`PileSet::load`].

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::GameRng;

/// Which pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PileKind {
    Draw,
    Discard,
    Exhaust,
    Hand,
}

impl PileKind {
    pub const ALL: [PileKind; 4] =
        [PileKind::Draw, PileKind::Discard, PileKind::Exhaust, PileKind::Hand];
}

/// Ordered stack of cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    cards: Vec<CardId>,
}

impl Pile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a card on top.
    pub fn add(&mut self, card: CardId) {
        self.cards.push(card);
    }

    /// Insert at `index` from the bottom, clamped to the pile size.
    pub fn insert(&mut self, index: usize, card: CardId) {
        let idx = index.min(self.cards.len());
        self.cards.insert(idx, card);
    }

    /// Remove and return the top card: the most recently added leaves first.
    pub fn draw_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    /// Remove the card at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<CardId> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    /// Move every card onto `other`, keeping order. Leaves this pile empty.
    pub fn move_all_to(&mut self, other: &mut Pile) {
        other.cards.append(&mut self.cards);
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Cards bottom to top.
    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    #[must_use]
    pub fn top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    /// Index of the first card matching `predicate`.
    pub fn position(&self, predicate: impl FnMut(&CardId) -> bool) -> Option<usize> {
        self.cards.iter().position(predicate)
    }

    fn take_top(&mut self, count: usize) -> Vec<CardId> {
        let start = self.cards.len().saturating_sub(count);
        self.cards.split_off(start)
    }
}

/// Draw, Discard, Exhaust and Hand for one battle.
///
/// ## Usage
///
/// ```
/// use harvest_core::cards::CardId;
/// use harvest_core::core::GameRng;
/// use harvest_core::piles::{PileKind, PileSet};
///
/// let mut piles = PileSet::new();
/// piles.load((1..=6).map(CardId::new));
///
/// let mut rng = GameRng::new(7);
/// piles.shuffle(PileKind::Draw, &mut rng);
/// let drawn = piles.draw_to_hand(5, 10, &mut rng);
///
/// assert_eq!(drawn, 5);
/// assert_eq!(piles.pile(PileKind::Draw).len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileSet {
    draw: Pile,
    discard: Pile,
    exhaust: Pile,
    hand: Pile,
}

impl PileSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty every pile and put `cards` into Draw in the given order.
    pub fn load(&mut self, cards: impl IntoIterator<Item = CardId>) {
        *self = Self::default();
        self.draw.cards.extend(cards);
        log::trace!("loaded {} cards into draw", self.draw.len());
    }

    #[must_use]
    pub fn pile(&self, kind: PileKind) -> &Pile {
        match kind {
            PileKind::Draw => &self.draw,
            PileKind::Discard => &self.discard,
            PileKind::Exhaust => &self.exhaust,
            PileKind::Hand => &self.hand,
        }
    }

    pub fn pile_mut(&mut self, kind: PileKind) -> &mut Pile {
        match kind {
            PileKind::Draw => &mut self.draw,
            PileKind::Discard => &mut self.discard,
            PileKind::Exhaust => &mut self.exhaust,
            PileKind::Hand => &mut self.hand,
        }
    }

    #[must_use]
    pub fn hand(&self) -> &Pile {
        &self.hand
    }

    /// Put a card on top of a pile.
    pub fn add(&mut self, kind: PileKind, card: CardId) {
        self.pile_mut(kind).add(card);
        log::trace!("{card} -> {kind:?}");
    }

    /// Move every card of `from` onto `to`.
    pub fn move_all(&mut self, from: PileKind, to: PileKind) {
        if from == to {
            return;
        }
        let mut moving = std::mem::take(self.pile_mut(from));
        moving.move_all_to(self.pile_mut(to));
        log::trace!("moved all {from:?} -> {to:?}");
    }

    /// Move the card at `index` of `from` onto the top of `to`.
    pub fn move_card(&mut self, from: PileKind, index: usize, to: PileKind) -> Option<CardId> {
        let card = self.pile_mut(from).remove_at(index)?;
        self.add(to, card);
        Some(card)
    }

    pub fn shuffle(&mut self, kind: PileKind, rng: &mut GameRng) {
        self.pile_mut(kind).shuffle(rng);
    }

    /// Move Discard into Draw and shuffle, if Draw is empty and Discard is not.
    ///
    /// Returns whether a reshuffle happened.
    pub fn reshuffle_if_empty(&mut self, rng: &mut GameRng) -> bool {
        if !self.draw.is_empty() || self.discard.is_empty() {
            return false;
        }
        self.discard.move_all_to(&mut self.draw);
        self.draw.shuffle(rng);
        log::trace!("reshuffled discard into draw ({} cards)", self.draw.len());
        true
    }

    /// Draw one card into the hand, reshuffling Discard into Draw if needed.
    pub fn draw_one(&mut self, rng: &mut GameRng) -> Option<CardId> {
        self.reshuffle_if_empty(rng);
        let card = self.draw.draw_top()?;
        self.hand.add(card);
        log::trace!("drew {card}");
        Some(card)
    }

    /// Draw up to `count` cards, stopping at `hand_limit` or when both
    /// Draw and Discard run out. Returns how many were drawn.
    pub fn draw_to_hand(&mut self, count: usize, hand_limit: usize, rng: &mut GameRng) -> usize {
        let mut drawn = 0;
        while drawn < count && self.hand.len() < hand_limit {
            if self.draw_one(rng).is_none() {
                break;
            }
            drawn += 1;
        }
        drawn
    }

    /// Look at the top `count` cards of Draw and discard the ones `discard`
    /// picks. Kept cards go back on top in their original order.
    ///
    /// Only the Draw pile is inspected; no reshuffle happens. Returns the
    /// discarded cards, top first.
    pub fn scry(&mut self, count: usize, mut discard: impl FnMut(CardId) -> bool) -> Vec<CardId> {
        let seen = self.draw.take_top(count);
        let mut keep = vec![true; seen.len()];
        let mut discarded = Vec::new();
        for (i, &card) in seen.iter().enumerate().rev() {
            if discard(card) {
                keep[i] = false;
                discarded.push(card);
            }
        }
        for (card, kept) in seen.into_iter().zip(keep) {
            if kept {
                self.draw.add(card);
            }
        }
        for &card in &discarded {
            self.discard.add(card);
        }
        if !discarded.is_empty() {
            log::trace!("scry discarded {}", discarded.len());
        }
        discarded
    }

    /// Total cards across all four piles.
    #[must_use]
    pub fn total(&self) -> usize {
        PileKind::ALL.iter().map(|&k| self.pile(k).len()).sum()
    }

    /// Every card across all four piles, sorted.
    #[must_use]
    pub fn all_cards(&self) -> Vec<CardId> {
        let mut all: Vec<CardId> = PileKind::ALL
            .iter()
            .flat_map(|&k| self.pile(k).cards().iter().copied())
            .collect();
        all.sort();
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<CardId> {
        raw.iter().copied().map(CardId::new).collect()
    }

    #[test]
    fn test_draw_top_is_last_added() {
        let mut pile = Pile::new();
        pile.add(CardId::new(10));
        pile.add(CardId::new(11));

        assert_eq!(pile.draw_top(), Some(CardId::new(11)));
        assert_eq!(pile.draw_top(), Some(CardId::new(10)));
        assert_eq!(pile.draw_top(), None);
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut pile = Pile::new();
        pile.add(CardId::new(10));
        pile.add(CardId::new(11));
        pile.insert(1, CardId::new(12));
        pile.insert(99, CardId::new(13));

        assert_eq!(pile.cards(), ids(&[10, 12, 11, 13]).as_slice());
    }

    #[test]
    fn test_move_all_clears_source() {
        let mut piles = PileSet::new();
        piles.load(ids(&[1, 2, 3]));
        piles.move_all(PileKind::Draw, PileKind::Exhaust);

        assert!(piles.pile(PileKind::Draw).is_empty());
        assert_eq!(piles.pile(PileKind::Exhaust).cards(), ids(&[1, 2, 3]).as_slice());
    }

    #[test]
    fn test_draw_reshuffles_discard() {
        let mut piles = PileSet::new();
        piles.load(ids(&[1]));
        piles.add(PileKind::Discard, CardId::new(2));
        piles.add(PileKind::Discard, CardId::new(3));
        let mut rng = GameRng::new(3);

        assert_eq!(piles.draw_to_hand(3, 10, &mut rng), 3);
        assert_eq!(piles.hand().len(), 3);
        assert!(piles.pile(PileKind::Discard).is_empty());
        assert_eq!(piles.hand().cards()[0], CardId::new(1));
    }

    #[test]
    fn test_draw_from_nothing_is_silent() {
        let mut piles = PileSet::new();
        let mut rng = GameRng::new(3);
        assert_eq!(piles.draw_to_hand(5, 10, &mut rng), 0);
        assert!(piles.hand().is_empty());
    }

    #[test]
    fn test_draw_respects_hand_limit() {
        let mut piles = PileSet::new();
        piles.load(ids(&[1, 2, 3, 4, 5, 6]));
        let mut rng = GameRng::new(3);

        assert_eq!(piles.draw_to_hand(6, 4, &mut rng), 4);
        assert_eq!(piles.pile(PileKind::Draw).len(), 2);
    }

    #[test]
    fn test_scry_keeps_order() {
        let mut piles = PileSet::new();
        piles.load(ids(&[1, 2, 3, 4, 5]));

        let discarded = piles.scry(3, |card| card == CardId::new(4));

        assert_eq!(discarded, ids(&[4]));
        assert_eq!(piles.pile(PileKind::Draw).cards(), ids(&[1, 2, 3, 5]).as_slice());
        assert_eq!(piles.pile(PileKind::Discard).cards(), ids(&[4]).as_slice());
    }

    #[test]
    fn test_scry_sees_top_first_and_no_reshuffle() {
        let mut piles = PileSet::new();
        piles.load(ids(&[1, 2]));
        piles.add(PileKind::Discard, CardId::new(9));

        let mut seen = Vec::new();
        let discarded = piles.scry(5, |card| {
            seen.push(card);
            false
        });

        assert!(discarded.is_empty());
        assert_eq!(seen, ids(&[2, 1]));
        assert_eq!(piles.pile(PileKind::Discard).len(), 1);
    }

    #[test]
    fn test_scry_duplicate_ids() {
        let mut piles = PileSet::new();
        piles.load(ids(&[7, 7, 7]));
        let mut first = true;

        let discarded = piles.scry(3, |_| std::mem::take(&mut first));

        assert_eq!(discarded.len(), 1);
        assert_eq!(piles.total(), 3);
        assert_eq!(piles.pile(PileKind::Draw).len(), 2);
    }

    #[test]
    fn test_move_card() {
        let mut piles = PileSet::new();
        piles.load(ids(&[1, 2]));
        assert_eq!(piles.move_card(PileKind::Draw, 0, PileKind::Hand), Some(CardId::new(1)));
        assert_eq!(piles.move_card(PileKind::Draw, 5, PileKind::Hand), None);
        assert_eq!(piles.all_cards(), ids(&[1, 2]));
    }
}
