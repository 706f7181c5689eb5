//! Summoning endpoints: weighted draws from the template pool, the per-player
//! summon history, and the multi-summon convenience wrapper.

use rocket::serde::json::Json;
use rocket_okapi::openapi;

use crate::engine::{Combatant, SummonRecord};
use crate::game_state::GameState;
use crate::status_messages::{api_error, ApiError};

/// Summon one combatant for `player`, drawing a template weighted by the
/// pool's summon weights. The summon is recorded before the combatant is
/// materialized; a failed materialization leaves an unresolved record.
#[openapi]
#[post("/summon?<player>")]
pub async fn summon(
    player: String,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<Combatant>, ApiError> {
    let mut gs = game_state.lock().await;
    gs.summon(&player).map(Json).map_err(api_error)
}

/// Summon up to `count` combatants in one request. The count is capped and
/// further bounded by the player's free roster slots; the response holds
/// whatever was actually summoned.
#[openapi]
#[post("/summon/multi?<player>&<count>")]
pub async fn summon_multi(
    player: String,
    count: usize,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<Vec<Combatant>>, ApiError> {
    let mut gs = game_state.lock().await;
    gs.summon_multi(&player, count).map(Json).map_err(api_error)
}

/// Full summon history for `player`, oldest first, including unresolved
/// records still waiting for a reprocessing sweep.
#[openapi]
#[get("/summon/history?<player>")]
pub async fn summon_history(
    player: String,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Json<Vec<SummonRecord>> {
    let gs = game_state.lock().await;
    Json(gs.summon_history(&player).into_iter().cloned().collect())
}
