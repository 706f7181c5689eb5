//! Free-for-all elimination fights ("royal rumble").

use rand::seq::SliceRandom;
use rand::RngCore;
use rand_pcg::Lcg64Xsh32;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use super::combatant::Combatant;
use super::damage::{perform_attack, BattleAction};
use crate::error::EngineError;

/// Minimum number of participants for a rumble.
pub const MIN_PARTICIPANTS: usize = 3;

/// Experience awarded to the last combatant standing.
pub fn rumble_experience(participant_count: usize) -> i32 {
    50 + participant_count as i32 * 10
}

/// One round of a rumble: every action taken plus the ids still alive after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct RumbleRound {
    pub round: u32,
    pub actions: Vec<BattleAction>,
    pub survivors: Vec<u64>,
}

/// Complete record of a resolved rumble. `id` and `fought_at` are filled in
/// by the store on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct RumbleResult {
    pub id: u64,
    pub participant_ids: Vec<u64>,
    pub rounds: Vec<RumbleRound>,
    pub winner_id: u64,
    pub experience_awarded: i32,
    pub fought_at: u64,
}

fn pair_mut(fighters: &mut [Combatant], a: usize, b: usize) -> (&mut Combatant, &mut Combatant) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = fighters.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = fighters.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

/// Resolve a free-for-all over snapshots of at least three combatants.
///
/// Each round the surviving roster is shuffled into a random attack order;
/// every survivor that is still alive when its turn comes attacks one
/// uniformly random other survivor. A combatant dropping to 0 hp leaves the
/// surviving set immediately: it cannot act or be targeted again. Survivors
/// tick cooldowns at the end of the round. Runs until exactly one remains.
pub fn resolve_melee(
    participants: &[Combatant],
    rng: &mut Lcg64Xsh32,
) -> Result<RumbleResult, EngineError> {
    if participants.len() < MIN_PARTICIPANTS {
        return Err(EngineError::InsufficientParticipants(participants.len()));
    }
    let participant_ids: Vec<u64> = participants.iter().map(|c| c.id).collect();
    for (i, id) in participant_ids.iter().enumerate() {
        if participant_ids[..i].contains(id) {
            return Err(EngineError::InvalidArgument(format!(
                "combatant {id} appears more than once"
            )));
        }
    }

    let mut fighters: Vec<Combatant> = participants.to_vec();
    for fighter in &mut fighters {
        fighter.reset_for_fight();
    }

    let index_of = |fighters: &[Combatant], id: u64| -> Option<usize> {
        fighters.iter().position(|f| f.id == id)
    };

    let mut rounds: Vec<RumbleRound> = Vec::new();
    let mut round_number = 0u32;
    while fighters.iter().filter(|f| !f.is_defeated()).count() > 1 {
        round_number += 1;
        let mut order: Vec<u64> = fighters
            .iter()
            .filter(|f| !f.is_defeated())
            .map(|f| f.id)
            .collect();
        order.shuffle(rng);

        let mut actions: Vec<BattleAction> = Vec::new();
        for attacker_id in order {
            let Some(attacker_index) = index_of(&fighters, attacker_id) else {
                continue;
            };
            // Eliminated earlier this same round: loses its turn.
            if fighters[attacker_index].is_defeated() {
                continue;
            }
            let targets: Vec<usize> = fighters
                .iter()
                .enumerate()
                .filter(|(i, f)| *i != attacker_index && !f.is_defeated())
                .map(|(i, _)| i)
                .collect();
            let Some(&target_index) = targets.get(rng.next_u64() as usize % targets.len().max(1))
            else {
                continue;
            };
            let (attacker, defender) = pair_mut(&mut fighters, attacker_index, target_index);
            actions.push(perform_attack(attacker, defender));
        }

        let survivors: Vec<u64> = fighters
            .iter()
            .filter(|f| !f.is_defeated())
            .map(|f| f.id)
            .collect();
        for fighter in fighters.iter_mut().filter(|f| !f.is_defeated()) {
            fighter.tick_cooldowns();
        }
        rounds.push(RumbleRound {
            round: round_number,
            actions,
            survivors,
        });
    }

    let winner_id = fighters
        .iter()
        .find(|f| !f.is_defeated())
        .map(|f| f.id)
        .ok_or_else(|| {
            EngineError::InvalidArgument("rumble terminated with no survivor".to_string())
        })?;

    Ok(RumbleResult {
        id: 0,
        participant_ids,
        rounds,
        winner_id,
        experience_awarded: rumble_experience(participants.len()),
        fought_at: 0,
    })
}
