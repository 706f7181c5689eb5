//! Deterministic two-party fight resolution.

use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use super::combatant::{Combatant, ScalingStat};
use super::damage::{perform_attack, BattleAction};
use crate::error::EngineError;

/// Experience awarded to a duel winner.
pub fn duel_experience(loser_level: u32) -> i32 {
    20 + loser_level as i32 * 10
}

/// Complete record of a resolved duel. Immutable once the fight concludes;
/// `id` and `fought_at` are filled in by the store on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct BattleLog {
    pub id: u64,
    pub combatant1_id: u64,
    pub combatant2_id: u64,
    pub winner_id: u64,
    pub actions: Vec<BattleAction>,
    /// Derived from the loser's level; recomputable from the log.
    pub experience_awarded: i32,
    pub fought_at: u64,
}

/// Resolve a duel between snapshots of two combatants.
///
/// Both start at full hp with all cooldowns clear. Turn order is decided once
/// from effective speed (ties go to `a`) and never re-evaluated. Each round
/// the first actor attacks, the fight ends immediately if the defender drops
/// to 0 hp, otherwise the second actor attacks with the same end check, then
/// both tick cooldowns. Pure: the caller's combatants are untouched.
pub fn resolve_duel(a: &Combatant, b: &Combatant) -> Result<BattleLog, EngineError> {
    if a.id == b.id {
        return Err(EngineError::InvalidArgument(
            "a combatant cannot duel itself".to_string(),
        ));
    }

    let mut first = a.clone();
    let mut second = b.clone();
    first.reset_for_fight();
    second.reset_for_fight();
    if second.effective_stat(ScalingStat::Speed) > first.effective_stat(ScalingStat::Speed) {
        std::mem::swap(&mut first, &mut second);
    }

    let mut actions: Vec<BattleAction> = Vec::new();
    loop {
        actions.push(perform_attack(&mut first, &mut second));
        if second.is_defeated() {
            break;
        }
        actions.push(perform_attack(&mut second, &mut first));
        if first.is_defeated() {
            break;
        }
        first.tick_cooldowns();
        second.tick_cooldowns();
    }

    // The end check after every single action guarantees exactly one side
    // is standing here.
    let (winner, loser) = if second.is_defeated() {
        (&first, &second)
    } else {
        (&second, &first)
    };

    Ok(BattleLog {
        id: 0,
        combatant1_id: a.id,
        combatant2_id: b.id,
        winner_id: winner.id,
        actions,
        experience_awarded: duel_experience(loser.level),
        fought_at: 0,
    })
}
