//! Shared skill selection and damage resolution used by both fight engines.

use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use super::combatant::{Combatant, ScalingStat, Skill};

/// Skill slot recorded in a battle action when no skill was ready.
pub const BASIC_ATTACK_SLOT: u32 = 0;

/// One attack in a fight. Appending these in order is the sole evidence of
/// what happened: replaying them against the pre-fight stats reproduces the
/// final hp values exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct BattleAction {
    pub actor_id: u64,
    /// Slot of the skill used, or [`BASIC_ATTACK_SLOT`].
    pub skill_slot: u32,
    pub damage: i32,
    pub target_id: u64,
    pub target_remaining_hp: i32,
}

/// Pick the skill to use this turn: skills ordered by slot descending, first
/// one off cooldown wins. Returns the index into `skills`, or `None` when the
/// caller should fall back to a basic attack.
///
/// The alternative heuristic of picking the ready skill with the highest
/// computed damage against the current defender was considered and rejected;
/// both engines use this policy.
pub fn select_skill(skills: &[Skill]) -> Option<usize> {
    let mut order: Vec<usize> = (0..skills.len()).collect();
    order.sort_by(|&a, &b| skills[b].slot.cmp(&skills[a].slot));
    order.into_iter().find(|&i| skills[i].is_ready())
}

/// Basic attack damage: attack minus half the defender's defense, at least 1.
pub fn basic_damage(attacker: &Combatant, defender: &Combatant) -> i32 {
    (attacker.effective_stat(ScalingStat::Attack) - defender.effective_stat(ScalingStat::Defense) / 2)
        .max(1)
}

/// Skill damage: base damage plus the scaling stat's current value times the
/// scaling percentage, reduced by a third of the defender's defense, at
/// least 1. The defense term uses integer division.
pub fn skill_damage(attacker: &Combatant, skill: &Skill, defender: &Combatant) -> i32 {
    let stat_value = match skill.scaling_stat {
        ScalingStat::Hp => attacker.current_hp,
        other => attacker.effective_stat(other),
    };
    let raw = skill.damage as f64 + stat_value as f64 * (skill.scaling_percent / 100.0);
    (raw.floor() as i32 - defender.effective_stat(ScalingStat::Defense) / 3).max(1)
}

/// Resolve one attack: select a skill (or basic attack), put the used skill
/// on cooldown, apply damage to the defender, and return the log entry.
pub fn perform_attack(attacker: &mut Combatant, defender: &mut Combatant) -> BattleAction {
    match select_skill(&attacker.skills) {
        Some(index) => {
            let damage = skill_damage(attacker, &attacker.skills[index], defender);
            let slot = attacker.skills[index].slot;
            attacker.skills[index].trigger();
            defender.apply_damage(damage);
            BattleAction {
                actor_id: attacker.id,
                skill_slot: slot,
                damage,
                target_id: defender.id,
                target_remaining_hp: defender.current_hp,
            }
        }
        None => {
            let damage = basic_damage(attacker, defender);
            defender.apply_damage(damage);
            BattleAction {
                actor_id: attacker.id,
                skill_slot: BASIC_ATTACK_SLOT,
                damage,
                target_id: defender.id,
                target_remaining_hp: defender.current_hp,
            }
        }
    }
}
