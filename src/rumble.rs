//! Free-for-all endpoints. A rumble is a last-one-standing melee; every
//! eliminated combatant is removed from its owner's roster for good.

use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::{openapi, JsonSchema};

use crate::battle::ExperienceResponse;
use crate::engine::RumbleResult;
use crate::game_state::GameState;
use crate::status_messages::{api_error, ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct RumbleRequest {
    /// Combatants to throw into the pit. When omitted the whole roster
    /// enters, with 3 picked at random if the roster is larger.
    pub participant_ids: Option<Vec<u64>>,
}

/// Run a free-for-all over `player`'s combatants. Losers are permanently
/// removed from the roster; only the winner survives and gains experience.
#[openapi]
#[post("/rumbles?<player>", data = "<request>")]
pub async fn create_rumble(
    player: String,
    request: Json<RumbleRequest>,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<RumbleResult>, ApiError> {
    let mut gs = game_state.lock().await;
    gs.rumble(&player, request.0.participant_ids)
        .map(Json)
        .map_err(api_error)
}

/// Round-by-round record of a past rumble.
#[openapi]
#[get("/rumbles/<rumble_id>")]
pub async fn get_rumble(
    rumble_id: u64,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<RumbleResult>, ApiError> {
    let gs = game_state.lock().await;
    gs.rumble_result(rumble_id)
        .map(|result| Json(result.clone()))
        .map_err(api_error)
}

/// Experience that was awarded to the winner of a past rumble.
#[openapi]
#[get("/rumbles/<rumble_id>/experience")]
pub async fn get_rumble_experience(
    rumble_id: u64,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<ExperienceResponse>, ApiError> {
    let mut gs = game_state.lock().await;
    gs.rumble_experience(rumble_id)
        .map(|experience| Json(ExperienceResponse { experience }))
        .map_err(api_error)
}
