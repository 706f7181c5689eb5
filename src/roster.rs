//! Roster endpoints: listing and inspecting a player's combatants, manual
//! experience grants, and skill upgrades.

use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::{openapi, JsonSchema};

use crate::engine::Combatant;
use crate::game_state::GameState;
use crate::status_messages::{api_error, ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct ExperienceGrant {
    pub amount: f64,
}

/// All combatants currently on `player`'s roster.
#[openapi]
#[get("/roster?<player>")]
pub async fn list_roster(
    player: String,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Json<Vec<Combatant>> {
    let gs = game_state.lock().await;
    Json(gs.roster(&player).into_iter().cloned().collect())
}

/// A single combatant. 404 unless it exists and belongs to `player`.
#[openapi]
#[get("/roster/<combatant_id>?<player>")]
pub async fn get_combatant(
    combatant_id: u64,
    player: String,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<Combatant>, ApiError> {
    let gs = game_state.lock().await;
    gs.load_combatant(combatant_id, &player)
        .map(|combatant| Json(combatant.clone()))
        .map_err(api_error)
}

/// Grant a combatant experience directly. Level-ups cascade while the carry
/// covers the next threshold, awarding one skill point per level.
#[openapi]
#[post("/roster/<combatant_id>/experience?<player>", data = "<grant>")]
pub async fn grant_experience(
    combatant_id: u64,
    player: String,
    grant: Json<ExperienceGrant>,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<Combatant>, ApiError> {
    let mut gs = game_state.lock().await;
    gs.award_experience(&player, combatant_id, grant.amount)
        .map(Json)
        .map_err(api_error)
}

/// Spend one of the combatant's skill points on the skill in `slot`.
#[openapi]
#[post("/roster/<combatant_id>/skills/<slot>/upgrade?<player>")]
pub async fn upgrade_skill(
    combatant_id: u64,
    slot: u32,
    player: String,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<Combatant>, ApiError> {
    let mut gs = game_state.lock().await;
    gs.upgrade_skill(&player, combatant_id, slot)
        .map(Json)
        .map_err(api_error)
}
