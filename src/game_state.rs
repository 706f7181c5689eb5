//! In-memory document store plus the orchestration that wires engine results
//! back into progression and roster state.
//!
//! A single `GameState` lives behind an async mutex in Rocket managed state;
//! holding that lock across a whole operation is what gives each combatant's
//! progression state the single-writer guarantee the engine requires.

use std::collections::{BTreeMap, HashMap};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Lcg64Xsh32;

use crate::engine::cache::BoundedCache;
use crate::engine::combatant::{Combatant, Element, ScalingStat, StatBlock};
use crate::engine::duel::{resolve_duel, BattleLog};
use crate::engine::melee::{resolve_melee, RumbleResult, MIN_PARTICIPANTS};
use crate::engine::progression::Player;
use crate::engine::summon::{draw_template, materialize, SkillTemplate, SummonRecord, SummonTemplate};
use crate::error::EngineError;

/// Cap on combatants summoned in a single multi-summon request.
pub const MAX_MULTI_SUMMON: usize = 10;

/// Capacity of the fight-id experience caches. Evicted entries fall back to
/// the stored fight record, so this only bounds memory.
const EXPERIENCE_CACHE_CAPACITY: usize = 1024;

fn now_ms() -> u64 {
    match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
        Ok(duration) => duration.as_millis() as u64,
        Err(_) => 0,
    }
}

fn seed_bytes(seed: u64) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    bytes[0..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..16].copy_from_slice(&seed.to_le_bytes());
    bytes
}

pub struct GameState {
    pub players: HashMap<String, Player>,
    pub combatants: HashMap<u64, Combatant>,
    pub templates: Vec<SummonTemplate>,
    pub battle_logs: BTreeMap<u64, BattleLog>,
    pub rumbles: BTreeMap<u64, RumbleResult>,
    pub summon_records: BTreeMap<u64, SummonRecord>,
    duel_experience_cache: BoundedCache<u64, i32>,
    rumble_experience_cache: BoundedCache<u64, i32>,
    rng: Lcg64Xsh32,
    next_combatant_id: u64,
    next_battle_id: u64,
    next_rumble_id: u64,
    next_summon_id: u64,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_seed(now_ms())
    }

    pub fn with_seed(seed: u64) -> Self {
        GameState {
            players: HashMap::new(),
            combatants: HashMap::new(),
            templates: default_templates(),
            battle_logs: BTreeMap::new(),
            rumbles: BTreeMap::new(),
            summon_records: BTreeMap::new(),
            duel_experience_cache: BoundedCache::new(EXPERIENCE_CACHE_CAPACITY),
            rumble_experience_cache: BoundedCache::new(EXPERIENCE_CACHE_CAPACITY),
            rng: Lcg64Xsh32::from_seed(seed_bytes(seed)),
            next_combatant_id: 1,
            next_battle_id: 1,
            next_rumble_id: 1,
            next_summon_id: 1,
        }
    }

    /// Re-seed the RNG, making every subsequent summon and rumble
    /// reproducible.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = Lcg64Xsh32::from_seed(seed_bytes(seed));
    }

    // ---- store contracts -------------------------------------------------

    pub fn ensure_player(&mut self, name: &str) -> &mut Player {
        self.players
            .entry(name.to_string())
            .or_insert_with(|| Player::new(name))
    }

    pub fn player(&self, name: &str) -> Result<&Player, EngineError> {
        self.players.get(name).ok_or(EngineError::NotFound("player"))
    }

    /// Load a combatant, checking that it belongs to `owner`.
    pub fn load_combatant(&self, id: u64, owner: &str) -> Result<&Combatant, EngineError> {
        let combatant = self
            .combatants
            .get(&id)
            .ok_or(EngineError::NotFound("combatant"))?;
        if combatant.owner != owner {
            return Err(EngineError::Unauthorized(id, owner.to_string()));
        }
        Ok(combatant)
    }

    pub fn roster(&self, owner: &str) -> Vec<&Combatant> {
        let Some(player) = self.players.get(owner) else {
            return Vec::new();
        };
        player
            .roster
            .iter()
            .filter_map(|id| self.combatants.get(id))
            .collect()
    }

    /// Persist a combatant, assigning an id on first save.
    pub fn save_combatant(&mut self, mut combatant: Combatant) -> u64 {
        if combatant.id == 0 {
            combatant.id = self.next_combatant_id;
            self.next_combatant_id += 1;
        }
        let id = combatant.id;
        self.combatants.insert(id, combatant);
        id
    }

    /// Drop a combatant from its owner's roster and from the store.
    /// Elimination in a rumble is permanent.
    pub fn remove_from_roster(&mut self, owner: &str, combatant_id: u64) -> bool {
        let Some(player) = self.players.get_mut(owner) else {
            return false;
        };
        let before = player.roster.len();
        player.roster.retain(|id| *id != combatant_id);
        if player.roster.len() == before {
            return false;
        }
        self.combatants.remove(&combatant_id);
        true
    }

    fn save_battle_log(&mut self, mut log: BattleLog) -> BattleLog {
        log.id = self.next_battle_id;
        self.next_battle_id += 1;
        log.fought_at = now_ms();
        self.battle_logs.insert(log.id, log.clone());
        log
    }

    // ---- duels -----------------------------------------------------------

    /// Run a duel between two of the requester's combatants, persist the log,
    /// and award the winner its experience.
    pub fn duel(
        &mut self,
        player_name: &str,
        combatant1_id: u64,
        combatant2_id: u64,
    ) -> Result<BattleLog, EngineError> {
        let a = self.load_combatant(combatant1_id, player_name)?.clone();
        let b = self.load_combatant(combatant2_id, player_name)?.clone();
        let log = self.save_battle_log(resolve_duel(&a, &b)?);

        let experience = log.experience_awarded;
        if let Some(winner) = self.combatants.get_mut(&log.winner_id) {
            let levels = winner.gain_experience(experience as f64);
            log::info!(
                "duel {}: {} beat {} in {} actions, +{} xp ({} level-ups)",
                log.id,
                log.winner_id,
                if log.winner_id == a.id { b.id } else { a.id },
                log.actions.len(),
                experience,
                levels
            );
        }
        self.duel_experience_cache.insert(log.id, experience);
        Ok(log)
    }

    pub fn battle_log(&self, battle_id: u64) -> Result<&BattleLog, EngineError> {
        self.battle_logs
            .get(&battle_id)
            .ok_or(EngineError::NotFound("battle"))
    }

    pub fn battles_for(&self, combatant_id: u64) -> Vec<&BattleLog> {
        self.battle_logs
            .values()
            .filter(|log| log.combatant1_id == combatant_id || log.combatant2_id == combatant_id)
            .collect()
    }

    /// Experience awarded for a past duel. Served from the bounded cache,
    /// falling back to the persisted log for evicted fight ids.
    pub fn duel_experience(&mut self, battle_id: u64) -> Result<i32, EngineError> {
        if let Some(experience) = self.duel_experience_cache.get(&battle_id) {
            return Ok(*experience);
        }
        let experience = self.battle_log(battle_id)?.experience_awarded;
        self.duel_experience_cache.insert(battle_id, experience);
        Ok(experience)
    }

    // ---- rumbles ---------------------------------------------------------

    /// Run a free-for-all over the given combatants (all must belong to the
    /// requester), or over the requester's whole roster when `explicit` is
    /// `None`, picking 3 at random if the roster is larger. Every non-winner
    /// is removed from the roster permanently.
    pub fn rumble(
        &mut self,
        player_name: &str,
        explicit: Option<Vec<u64>>,
    ) -> Result<RumbleResult, EngineError> {
        let ids: Vec<u64> = match explicit {
            Some(ids) => {
                for id in &ids {
                    self.load_combatant(*id, player_name)?;
                }
                ids
            }
            None => {
                let mut roster = self.player(player_name)?.roster.clone();
                if roster.len() < MIN_PARTICIPANTS {
                    return Err(EngineError::InsufficientParticipants(roster.len()));
                }
                if roster.len() > MIN_PARTICIPANTS {
                    roster.shuffle(&mut self.rng);
                    roster.truncate(MIN_PARTICIPANTS);
                }
                roster
            }
        };
        let snapshots: Vec<Combatant> = ids
            .iter()
            .map(|id| self.load_combatant(*id, player_name).cloned())
            .collect::<Result<_, _>>()?;

        let mut result = resolve_melee(&snapshots, &mut self.rng)?;
        result.id = self.next_rumble_id;
        self.next_rumble_id += 1;
        result.fought_at = now_ms();

        let experience = result.experience_awarded;
        if let Some(winner) = self.combatants.get_mut(&result.winner_id) {
            winner.gain_experience(experience as f64);
        }
        for id in result.participant_ids.clone() {
            if id != result.winner_id {
                self.remove_from_roster(player_name, id);
            }
        }
        log::info!(
            "rumble {}: {} outlasted {} others over {} rounds, +{} xp",
            result.id,
            result.winner_id,
            result.participant_ids.len() - 1,
            result.rounds.len(),
            experience
        );
        self.rumble_experience_cache.insert(result.id, experience);
        self.rumbles.insert(result.id, result.clone());
        Ok(result)
    }

    pub fn rumble_result(&self, rumble_id: u64) -> Result<&RumbleResult, EngineError> {
        self.rumbles
            .get(&rumble_id)
            .ok_or(EngineError::NotFound("rumble"))
    }

    pub fn rumble_experience(&mut self, rumble_id: u64) -> Result<i32, EngineError> {
        if let Some(experience) = self.rumble_experience_cache.get(&rumble_id) {
            return Ok(*experience);
        }
        let experience = self.rumble_result(rumble_id)?.experience_awarded;
        self.rumble_experience_cache.insert(rumble_id, experience);
        Ok(experience)
    }

    // ---- progression -----------------------------------------------------

    pub fn award_experience(
        &mut self,
        player_name: &str,
        combatant_id: u64,
        amount: f64,
    ) -> Result<Combatant, EngineError> {
        if !(amount > 0.0) {
            return Err(EngineError::InvalidArgument(
                "experience amount must be positive".to_string(),
            ));
        }
        self.load_combatant(combatant_id, player_name)?;
        let combatant = self
            .combatants
            .get_mut(&combatant_id)
            .ok_or(EngineError::NotFound("combatant"))?;
        combatant.gain_experience(amount);
        Ok(combatant.clone())
    }

    pub fn upgrade_skill(
        &mut self,
        player_name: &str,
        combatant_id: u64,
        slot: u32,
    ) -> Result<Combatant, EngineError> {
        self.load_combatant(combatant_id, player_name)?;
        let combatant = self
            .combatants
            .get_mut(&combatant_id)
            .ok_or(EngineError::NotFound("combatant"))?;
        combatant.upgrade_skill(slot)?;
        Ok(combatant.clone())
    }

    pub fn player_gain_experience(
        &mut self,
        player_name: &str,
        amount: f64,
    ) -> Result<Player, EngineError> {
        if !(amount > 0.0) {
            return Err(EngineError::InvalidArgument(
                "experience amount must be positive".to_string(),
            ));
        }
        let player = self
            .players
            .get_mut(player_name)
            .ok_or(EngineError::NotFound("player"))?;
        player.gain_experience(amount);
        Ok(player.clone())
    }

    // ---- summoning -------------------------------------------------------

    /// Draw one template and materialize a combatant from it. The summon
    /// record is written before materialization is attempted, so a failure
    /// leaves an unresolved record for the reprocessing sweep.
    pub fn summon(&mut self, player_name: &str) -> Result<Combatant, EngineError> {
        self.ensure_player(player_name);
        let template = draw_template(&self.templates, &mut self.rng)?.clone();

        let record_id = self.next_summon_id;
        self.next_summon_id += 1;
        let now = now_ms();
        self.summon_records.insert(
            record_id,
            SummonRecord {
                id: record_id,
                requester: player_name.to_string(),
                template_id: template.id,
                combatant_id: None,
                resolved: false,
                created_at: now,
                updated_at: now,
            },
        );

        match self.try_materialize(&template, player_name) {
            Ok(combatant) => {
                if let Some(record) = self.summon_records.get_mut(&record_id) {
                    record.combatant_id = Some(combatant.id);
                    record.resolved = true;
                    record.updated_at = now_ms();
                }
                log::info!(
                    "summon {}: {} drew template {} -> combatant {}",
                    record_id,
                    player_name,
                    template.id,
                    combatant.id
                );
                Ok(combatant)
            }
            Err(error) => {
                log::warn!(
                    "summon {}: materialization failed for {}: {}",
                    record_id,
                    player_name,
                    error
                );
                Err(error)
            }
        }
    }

    fn try_materialize(
        &mut self,
        template: &SummonTemplate,
        player_name: &str,
    ) -> Result<Combatant, EngineError> {
        let player = self.player(player_name)?;
        if !player.has_room() {
            return Err(EngineError::MaterializationFailed(
                "roster is full".to_string(),
            ));
        }
        let id = self.save_combatant(materialize(template, player_name));
        if let Some(player) = self.players.get_mut(player_name) {
            player.roster.push(id);
        }
        self.combatants
            .get(&id)
            .cloned()
            .ok_or(EngineError::NotFound("combatant"))
    }

    /// Summon up to `count` combatants (capped, and bounded by free roster
    /// slots). Fails only when nothing could be summoned at all.
    pub fn summon_multi(
        &mut self,
        player_name: &str,
        count: usize,
    ) -> Result<Vec<Combatant>, EngineError> {
        self.ensure_player(player_name);
        let count = count.min(MAX_MULTI_SUMMON);
        let player = self.player(player_name)?;
        let free_slots = player.capacity().saturating_sub(player.roster.len());
        let attempts = count.min(free_slots);
        if attempts == 0 {
            return Err(EngineError::InvalidArgument(
                "roster has no free slots".to_string(),
            ));
        }

        let mut summoned = Vec::new();
        for _ in 0..attempts {
            match self.summon(player_name) {
                Ok(combatant) => summoned.push(combatant),
                Err(error) => log::warn!("multi-summon attempt failed: {error}"),
            }
        }
        if summoned.is_empty() {
            return Err(EngineError::MaterializationFailed(
                "every summon attempt failed".to_string(),
            ));
        }
        Ok(summoned)
    }

    pub fn summon_history(&self, player_name: &str) -> Vec<&SummonRecord> {
        self.summon_records
            .values()
            .filter(|record| record.requester == player_name)
            .collect()
    }

    /// Retry every unresolved summon record exactly once. Returns the number
    /// of records resolved by this sweep.
    pub fn reprocess_failed_summons(&mut self) -> usize {
        let pending: Vec<u64> = self
            .summon_records
            .values()
            .filter(|record| !record.resolved)
            .map(|record| record.id)
            .collect();

        let mut recovered = 0;
        for record_id in pending {
            let Some((template_id, requester)) = self
                .summon_records
                .get(&record_id)
                .map(|r| (r.template_id, r.requester.clone()))
            else {
                continue;
            };
            let Some(template) = self
                .templates
                .iter()
                .find(|t| t.id == template_id)
                .cloned()
            else {
                log::warn!("summon {record_id}: template {template_id} no longer exists");
                continue;
            };
            match self.try_materialize(&template, &requester) {
                Ok(combatant) => {
                    if let Some(record) = self.summon_records.get_mut(&record_id) {
                        record.combatant_id = Some(combatant.id);
                        record.resolved = true;
                        record.updated_at = now_ms();
                    }
                    recovered += 1;
                }
                Err(error) => {
                    log::warn!("summon {record_id}: retry failed: {error}");
                }
            }
        }
        if recovered > 0 {
            log::info!("summon sweep resolved {recovered} pending records");
        }
        recovered
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// The stock summon pool. Weights are unnormalized; the sampler divides by
/// their sum at draw time.
fn default_templates() -> Vec<SummonTemplate> {
    vec![
        SummonTemplate {
            id: 1,
            name: "Fire Demon Warrior".to_string(),
            element: Element::Fire,
            base_stats: StatBlock {
                hp: 1200,
                attack: 450,
                defense: 300,
                speed: 85,
            },
            skills: vec![
                SkillTemplate {
                    name: "Flame Strike".to_string(),
                    slot: 1,
                    damage: 125,
                    scaling_stat: ScalingStat::Attack,
                    scaling_percent: 25.0,
                    cooldown: 0,
                    max_level: 5,
                },
                SkillTemplate {
                    name: "Rage of Fire".to_string(),
                    slot: 2,
                    damage: 250,
                    scaling_stat: ScalingStat::Attack,
                    scaling_percent: 27.5,
                    cooldown: 2,
                    max_level: 7,
                },
                SkillTemplate {
                    name: "Hellfire".to_string(),
                    slot: 3,
                    damage: 425,
                    scaling_stat: ScalingStat::Attack,
                    scaling_percent: 40.0,
                    cooldown: 5,
                    max_level: 5,
                },
            ],
            summon_weight: 0.3,
        },
        SummonTemplate {
            id: 2,
            name: "Wind Guardian".to_string(),
            element: Element::Wind,
            base_stats: StatBlock {
                hp: 1500,
                attack: 200,
                defense: 450,
                speed: 80,
            },
            skills: vec![
                SkillTemplate {
                    name: "Defense Counter".to_string(),
                    slot: 1,
                    damage: 200,
                    scaling_stat: ScalingStat::Defense,
                    scaling_percent: 10.0,
                    cooldown: 0,
                    max_level: 4,
                },
                SkillTemplate {
                    name: "Guardian Strike".to_string(),
                    slot: 2,
                    damage: 315,
                    scaling_stat: ScalingStat::Defense,
                    scaling_percent: 17.5,
                    cooldown: 2,
                    max_level: 7,
                },
                SkillTemplate {
                    name: "Gale Bulwark".to_string(),
                    slot: 3,
                    damage: 525,
                    scaling_stat: ScalingStat::Defense,
                    scaling_percent: 20.0,
                    cooldown: 6,
                    max_level: 7,
                },
            ],
            summon_weight: 0.3,
        },
        SummonTemplate {
            id: 3,
            name: "Deep Sea Beast".to_string(),
            element: Element::Water,
            base_stats: StatBlock {
                hp: 2500,
                attack: 150,
                defense: 200,
                speed: 70,
            },
            skills: vec![
                SkillTemplate {
                    name: "Life Drain".to_string(),
                    slot: 1,
                    damage: 150,
                    scaling_stat: ScalingStat::Hp,
                    scaling_percent: 5.0,
                    cooldown: 0,
                    max_level: 7,
                },
                SkillTemplate {
                    name: "Life Burst".to_string(),
                    slot: 2,
                    damage: 350,
                    scaling_stat: ScalingStat::Hp,
                    scaling_percent: 7.0,
                    cooldown: 2,
                    max_level: 4,
                },
                SkillTemplate {
                    name: "Water Blade Slash".to_string(),
                    slot: 3,
                    damage: 250,
                    scaling_stat: ScalingStat::Attack,
                    scaling_percent: 12.0,
                    cooldown: 5,
                    max_level: 5,
                },
            ],
            summon_weight: 0.3,
        },
        SummonTemplate {
            id: 4,
            name: "Water Sword Saint".to_string(),
            element: Element::Water,
            base_stats: StatBlock {
                hp: 1200,
                attack: 550,
                defense: 350,
                speed: 80,
            },
            skills: vec![
                SkillTemplate {
                    name: "Water Blade".to_string(),
                    slot: 1,
                    damage: 150,
                    scaling_stat: ScalingStat::Attack,
                    scaling_percent: 27.5,
                    cooldown: 0,
                    max_level: 6,
                },
                SkillTemplate {
                    name: "Torrent Slash".to_string(),
                    slot: 2,
                    damage: 285,
                    scaling_stat: ScalingStat::Attack,
                    scaling_percent: 27.5,
                    cooldown: 2,
                    max_level: 9,
                },
                SkillTemplate {
                    name: "Wrath of the Sea God".to_string(),
                    slot: 3,
                    damage: 550,
                    scaling_stat: ScalingStat::Attack,
                    scaling_percent: 60.0,
                    cooldown: 4,
                    max_level: 6,
                },
            ],
            summon_weight: 0.1,
        },
    ]
}
