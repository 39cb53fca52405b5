//! Effect system for card abilities.
//!
//! - `EffectDefinition`: one data-driven instruction on a card
//! - `CustomOp`: opcodes carried by `Custom` effects
//! - `EffectResolver`: plays a card against the running battle
//! - `CardCollaborator`: the pile-owning side of a play
//!
//! ## Design Philosophy
//!
//! The resolver owns no cards. Draw, scry and exhaust requests go to the
//! collaborator synchronously, and routing decisions come back as flags on
//! the returned `CardPlay` for the caller to act on.

mod effect;
mod resolver;

pub use effect::{CustomOp, EffectDefinition, EffectTarget, EffectType, StatusKind};
pub use resolver::{
    CardCollaborator, CardPlay, EffectResolver, NullCollaborator, PlayRejected, Routing,
    ScryOutcome,
};
