//! Pure combat & progression simulation.
//!
//! Everything in this module is synchronous and free of I/O: the fight
//! engines take snapshots of combatant state and return complete logs, all
//! randomness flows through an injected seeded RNG, and progression operates
//! on values the caller owns. Per-combatant mutual exclusion between
//! concurrent fights is the caller's responsibility.

pub mod cache;
pub mod combatant;
pub mod damage;
pub mod duel;
pub mod melee;
pub mod progression;
pub mod summon;

pub use cache::BoundedCache;
pub use combatant::{Combatant, Element, ScalingStat, Skill, StatBlock, MAX_LEVEL};
pub use damage::{BattleAction, BASIC_ATTACK_SLOT};
pub use duel::{resolve_duel, BattleLog};
pub use melee::{resolve_melee, RumbleResult, RumbleRound, MIN_PARTICIPANTS};
pub use progression::Player;
pub use summon::{draw_template, materialize, SkillTemplate, SummonRecord, SummonTemplate};
