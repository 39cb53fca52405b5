//! Battle piles.
//!
//! Four ordered containers per battle: Draw, Discard, Exhaust and Hand.
//! Draws follow one rule everywhere: when Draw is empty and Discard is not,
//! Discard is moved into Draw and shuffled first; when both are empty the
//! draw stops short without error.

pub mod pile_set;

pub use pile_set::{Pile, PileKind, PileSet};
