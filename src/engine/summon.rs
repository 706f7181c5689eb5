//! Weighted-random creature acquisition.

use rand::Rng;
use rand_pcg::Lcg64Xsh32;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use super::combatant::{Combatant, Element, Skill, StatBlock};
use crate::error::EngineError;

/// Skill points granted to a freshly summoned combatant.
pub const STARTING_SKILL_POINTS: u32 = 3;

/// Experience threshold for a fresh combatant's first level-up.
pub const STARTING_EXPERIENCE_TO_NEXT_LEVEL: f64 = 100.0;

/// A skill definition on a template: no runtime level or cooldown state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct SkillTemplate {
    pub name: String,
    pub slot: u32,
    pub damage: i32,
    pub scaling_stat: super::combatant::ScalingStat,
    pub scaling_percent: f64,
    pub cooldown: u32,
    pub max_level: u32,
}

/// A creature that can be drawn from the summon pool. `summon_weight` is an
/// unnormalized weight; the sampler normalizes against the pool's total at
/// draw time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct SummonTemplate {
    pub id: u32,
    pub name: String,
    pub element: Element,
    pub base_stats: StatBlock,
    pub skills: Vec<SkillTemplate>,
    pub summon_weight: f64,
}

/// Append-only ledger entry for one summon attempt. Written before
/// materialization is attempted, so a failure partway through is observable
/// and retryable; updated exactly once on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct SummonRecord {
    pub id: u64,
    pub requester: String,
    pub template_id: u32,
    pub combatant_id: Option<u64>,
    pub resolved: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Draw one template from the pool, weighted by `summon_weight`.
///
/// Walks the pool in its stable order accumulating weight and returns the
/// first template whose cumulative weight reaches the draw. If accumulation
/// never reaches it (floating point edge) the first template is returned
/// rather than failing, so a draw needs at most one attempt.
pub fn draw_template<'a>(
    templates: &'a [SummonTemplate],
    rng: &mut Lcg64Xsh32,
) -> Result<&'a SummonTemplate, EngineError> {
    if templates.is_empty() {
        return Err(EngineError::NoTemplatesAvailable);
    }
    if let Some(bad) = templates.iter().find(|t| t.summon_weight < 0.0) {
        return Err(EngineError::InvalidArgument(format!(
            "template {} has a negative summon weight",
            bad.id
        )));
    }
    let total: f64 = templates.iter().map(|t| t.summon_weight).sum();
    if total <= 0.0 {
        return Ok(&templates[0]);
    }
    let draw = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for template in templates {
        cumulative += template.summon_weight;
        if cumulative >= draw {
            return Ok(template);
        }
    }
    Ok(&templates[0])
}

/// Instantiate a fresh combatant from a template.
///
/// Skills are deep-copied at level 0 with cooldowns idle; base stats carry
/// over unmodified. The combatant starts at level 1 with no experience and a
/// small skill-point grant, and with id 0 until the store assigns one.
pub fn materialize(template: &SummonTemplate, owner: &str) -> Combatant {
    let skills: Vec<Skill> = template
        .skills
        .iter()
        .map(|s| Skill {
            name: s.name.clone(),
            slot: s.slot,
            damage: s.damage,
            scaling_stat: s.scaling_stat,
            scaling_percent: s.scaling_percent,
            cooldown: s.cooldown,
            base_cooldown: s.cooldown,
            remaining: 0,
            level: 0,
            max_level: s.max_level,
        })
        .collect();
    Combatant {
        id: 0,
        owner: owner.to_string(),
        template_id: template.id,
        name: template.name.clone(),
        element: template.element,
        level: 1,
        experience: 0.0,
        experience_to_next_level: STARTING_EXPERIENCE_TO_NEXT_LEVEL,
        base_stats: template.base_stats,
        current_hp: template.base_stats.hp,
        skills,
        skill_points: STARTING_SKILL_POINTS,
    }
}
