//! Operational endpoints: RNG seeding for reproducible runs and the sweep
//! that retries unresolved summons.

use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::{openapi, JsonSchema};

use crate::game_state::GameState;
use crate::status_messages::{new_status, Status};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct SeedRequest {
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct ReprocessResponse {
    pub recovered: usize,
}

/// Re-seed the RNG. Every summon draw and rumble shuffle from this point on
/// is reproducible from the given seed.
#[openapi]
#[post("/admin/seed", data = "<request>")]
pub async fn set_seed(
    request: Json<SeedRequest>,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Json<Status> {
    let mut gs = game_state.lock().await;
    gs.set_seed(request.seed);
    new_status(format!("rng seeded with {}", request.seed))
}

/// Retry every unresolved summon record once, materializing combatants for
/// the requesters whose rosters have room again.
#[openapi]
#[post("/admin/summons/reprocess")]
pub async fn reprocess_summons(
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Json<ReprocessResponse> {
    let mut gs = game_state.lock().await;
    let recovered = gs.reprocess_failed_summons();
    Json(ReprocessResponse { recovered })
}
