//! Duel endpoints. A duel is resolved synchronously inside the request,
//! and the returned log carries the full action-by-action replay.

use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::{openapi, JsonSchema};

use crate::engine::BattleLog;
use crate::game_state::GameState;
use crate::status_messages::{api_error, ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct DuelRequest {
    pub combatant1_id: u64,
    pub combatant2_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct ExperienceResponse {
    pub experience: i32,
}

/// Fight two of `player`'s combatants against each other. Both must belong
/// to the requester and must be distinct. The winner is awarded experience
/// before the log is returned.
#[openapi]
#[post("/battles?<player>", data = "<request>")]
pub async fn create_battle(
    player: String,
    request: Json<DuelRequest>,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<BattleLog>, ApiError> {
    let mut gs = game_state.lock().await;
    gs.duel(&player, request.combatant1_id, request.combatant2_id)
        .map(Json)
        .map_err(api_error)
}

/// Replay log of a past duel.
#[openapi]
#[get("/battles/<battle_id>")]
pub async fn get_battle(
    battle_id: u64,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<BattleLog>, ApiError> {
    let gs = game_state.lock().await;
    gs.battle_log(battle_id)
        .map(|log| Json(log.clone()))
        .map_err(api_error)
}

/// All duels a combatant has taken part in, oldest first.
#[openapi]
#[get("/battles?<combatant>")]
pub async fn list_battles(
    combatant: u64,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Json<Vec<BattleLog>> {
    let gs = game_state.lock().await;
    Json(gs.battles_for(combatant).into_iter().cloned().collect())
}

/// Experience that was awarded for a past duel. Served from a bounded cache
/// with fallback to the stored log.
#[openapi]
#[get("/battles/<battle_id>/experience")]
pub async fn get_battle_experience(
    battle_id: u64,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<ExperienceResponse>, ApiError> {
    let mut gs = game_state.lock().await;
    gs.duel_experience(battle_id)
        .map(|experience| Json(ExperienceResponse { experience }))
        .map_err(api_error)
}
