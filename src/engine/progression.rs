//! Experience, level-ups, and skill upgrades for combatants and players.

use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use super::combatant::{Combatant, MAX_LEVEL};
use crate::error::EngineError;

/// Experience-to-next-level multiplier applied on every level-up.
pub const GROWTH_FACTOR: f64 = 1.1;

/// Base roster capacity of a fresh player; grows by one per level.
pub const BASE_ROSTER_CAPACITY: usize = 10;

impl Combatant {
    /// Accrue experience and resolve any level-ups it triggers.
    ///
    /// Overflow experience carries into the next level (the reset-to-zero
    /// policy discards it and was rejected). Each level gained multiplies the
    /// threshold by [`GROWTH_FACTOR`] and grants one skill point; stats grow
    /// implicitly through the per-level effective-stat multiplier. Returns
    /// the number of levels gained.
    pub fn gain_experience(&mut self, amount: f64) -> u32 {
        self.experience += amount;
        let mut gained = 0;
        while self.experience >= self.experience_to_next_level && self.level < MAX_LEVEL {
            self.experience -= self.experience_to_next_level;
            self.experience_to_next_level *= GROWTH_FACTOR;
            self.level += 1;
            self.skill_points += 1;
            gained += 1;
        }
        gained
    }

    /// Spend one skill point to level a skill up.
    ///
    /// Damage grows 10% per level and the scaling percentage 5%; every second
    /// level shaves one turn off the cooldown per two levels gained, floored
    /// at half the original cooldown (minimum 1).
    pub fn upgrade_skill(&mut self, slot: u32) -> Result<(), EngineError> {
        if self.skill_points == 0 {
            return Err(EngineError::NoSkillPoints);
        }
        let skill = self
            .skills
            .iter_mut()
            .find(|s| s.slot == slot)
            .ok_or(EngineError::SkillNotFound(slot))?;
        if skill.level >= skill.max_level {
            return Err(EngineError::SkillAtMaxLevel(slot));
        }

        skill.level += 1;
        skill.damage = (skill.damage as f64 * 1.10).floor() as i32;
        skill.scaling_percent *= 1.05;
        if skill.level % 2 == 0 && skill.base_cooldown > 0 {
            let floor = (skill.base_cooldown / 2).max(1);
            skill.cooldown = skill
                .base_cooldown
                .saturating_sub(skill.level / 2)
                .max(floor);
        }
        self.skill_points -= 1;
        Ok(())
    }
}

/// The owning player: levels up on the same carry-over curve as combatants
/// and gains one roster slot per level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct Player {
    pub name: String,
    pub level: u32,
    pub experience: f64,
    pub experience_to_next_level: f64,
    pub roster: Vec<u64>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            level: 1,
            experience: 0.0,
            experience_to_next_level: 50.0,
            roster: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        BASE_ROSTER_CAPACITY + (self.level.saturating_sub(1)) as usize
    }

    pub fn has_room(&self) -> bool {
        self.roster.len() < self.capacity()
    }

    /// Accrue experience; returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: f64) -> u32 {
        self.experience += amount;
        let mut gained = 0;
        while self.experience >= self.experience_to_next_level && self.level < MAX_LEVEL {
            self.experience -= self.experience_to_next_level;
            self.experience_to_next_level *= GROWTH_FACTOR;
            self.level += 1;
            gained += 1;
        }
        gained
    }
}
