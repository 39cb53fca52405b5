//! Host-facing sessions.
//!
//! - `Battle`: one fight, owning the piles and answering the resolver
//! - `Run`: deck, rewards and battles strung together

pub mod battle;
pub mod run;

pub use battle::{discard_curses, Battle, ScryPolicy};
pub use run::Run;
