use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

/// Hard level cap for combatants and players alike.
pub const MAX_LEVEL: u32 = 50;

/// Per-level multiplier applied to all base stats (5% per level past 1).
pub const LEVEL_STAT_BONUS: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub enum Element {
    Fire,
    Water,
    Wind,
    Earth,
}

/// Which attacker stat a skill scales with. `Hp` reads the attacker's
/// *current* hp at the moment the skill fires, not max hp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub enum ScalingStat {
    Attack,
    Defense,
    Hp,
    Speed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct StatBlock {
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

impl StatBlock {
    pub fn get(&self, stat: ScalingStat) -> i32 {
        match stat {
            ScalingStat::Attack => self.attack,
            ScalingStat::Defense => self.defense,
            ScalingStat::Hp => self.hp,
            ScalingStat::Speed => self.speed,
        }
    }
}

/// A learned skill on a combatant.
///
/// `slot` is the skill's stable identity within its owner; slot 0 is reserved
/// for the basic-attack sentinel in battle logs, so real skills use slots
/// starting at 1. `base_cooldown` keeps the pre-upgrade cooldown so upgrades
/// can floor at half the original value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct Skill {
    pub name: String,
    pub slot: u32,
    pub damage: i32,
    pub scaling_stat: ScalingStat,
    pub scaling_percent: f64,
    pub cooldown: u32,
    pub base_cooldown: u32,
    pub remaining: u32,
    pub level: u32,
    pub max_level: u32,
}

impl Skill {
    pub fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    /// Put the skill on cooldown. Called exactly once per use, at selection
    /// time, before any damage is applied.
    pub fn trigger(&mut self) {
        self.remaining = self.cooldown;
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// Runtime fight-participant snapshot of a creature.
///
/// `current_hp` and skill cooldowns are scoped to a single fight: the engines
/// reset both at fight start and never persist them across fights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct Combatant {
    /// 0 until first save; the store assigns the real id.
    pub id: u64,
    pub owner: String,
    pub template_id: u32,
    pub name: String,
    pub element: Element,
    pub level: u32,
    pub experience: f64,
    pub experience_to_next_level: f64,
    pub base_stats: StatBlock,
    pub current_hp: i32,
    pub skills: Vec<Skill>,
    pub skill_points: u32,
}

impl Combatant {
    /// Effective stat value at the combatant's current level.
    pub fn effective_stat(&self, stat: ScalingStat) -> i32 {
        let multiplier = 1.0 + LEVEL_STAT_BONUS * (self.level.saturating_sub(1)) as f64;
        (self.base_stats.get(stat) as f64 * multiplier).floor() as i32
    }

    pub fn max_hp(&self) -> i32 {
        self.effective_stat(ScalingStat::Hp)
    }

    /// Restore full hp and clear all cooldowns. Every fight starts here.
    pub fn reset_for_fight(&mut self) {
        self.current_hp = self.max_hp();
        for skill in &mut self.skills {
            skill.remaining = 0;
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.current_hp <= 0
    }

    /// Reduce current hp, clamped at 0.
    pub fn apply_damage(&mut self, damage: i32) {
        self.current_hp = (self.current_hp - damage).max(0);
    }

    pub fn tick_cooldowns(&mut self) {
        for skill in &mut self.skills {
            skill.tick();
        }
    }

    pub fn skill(&self, slot: u32) -> Option<&Skill> {
        self.skills.iter().find(|s| s.slot == slot)
    }
}
