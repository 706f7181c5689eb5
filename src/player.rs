//! Player profile endpoints. A player account is created implicitly by the
//! first summon; the profile tracks its own level, which sets the roster cap.

use rocket::serde::json::Json;
use rocket_okapi::openapi;

use crate::engine::Player;
use crate::game_state::GameState;
use crate::roster::ExperienceGrant;
use crate::status_messages::{api_error, ApiError};

/// Profile for a player: level, experience progress, and roster ids.
#[openapi]
#[get("/players/<name>")]
pub async fn get_player(
    name: String,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<Player>, ApiError> {
    let gs = game_state.lock().await;
    gs.player(&name)
        .map(|player| Json(player.clone()))
        .map_err(api_error)
}

/// Grant the player account experience. Each level-up raises the roster
/// capacity by one slot.
#[openapi]
#[post("/players/<name>/experience", data = "<grant>")]
pub async fn grant_player_experience(
    name: String,
    grant: Json<ExperienceGrant>,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Result<Json<Player>, ApiError> {
    let mut gs = game_state.lock().await;
    gs.player_gain_experience(&name, grant.amount)
        .map(Json)
        .map_err(api_error)
}
