//! # Gacha Arena
//!
//! A collection-game backend: summon combatants from a weighted template
//! pool, level them up, and pit them against each other in duels and
//! free-for-all rumbles.
//!
//! ## Architecture
//!
//! The API is built on the Rocket web framework with OpenAPI documentation.
//! All fight resolution lives in the pure [`engine`] module; the HTTP layer
//! only locks the shared [`game_state::GameState`] (an `Arc<Mutex<T>>` in
//! managed state), calls into the engine, and persists the results. Summons
//! and rumble target picks draw from one seeded PCG generator, so a run is
//! fully reproducible after `POST /admin/seed`.

// Rocket makes this a bit tricky to support
#![allow(clippy::module_name_repetitions)]
#[macro_use]
extern crate rocket;

use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};

pub mod admin;
pub mod battle;
pub mod engine;
pub mod error;
pub mod game_state;
pub mod player;
pub mod roster;
pub mod rumble;
pub mod status_messages;
pub mod summoning;

/// Initializes and configures the Rocket web server with all routes and
/// OpenAPI documentation.
///
/// # Example
///
/// ```no_run
/// use gacha_arena::rocket_initialize;
///
/// #[rocket::main]
/// async fn main() {
///     rocket_initialize().launch().await.expect("Failed to launch rocket");
/// }
/// ```
pub fn rocket_initialize() -> rocket::Rocket<rocket::Build> {
    use crate::admin::okapi_add_operation_for_reprocess_summons_;
    use crate::admin::okapi_add_operation_for_set_seed_;
    use crate::admin::{reprocess_summons, set_seed};
    use crate::battle::okapi_add_operation_for_create_battle_;
    use crate::battle::okapi_add_operation_for_get_battle_;
    use crate::battle::okapi_add_operation_for_get_battle_experience_;
    use crate::battle::okapi_add_operation_for_list_battles_;
    use crate::battle::{create_battle, get_battle, get_battle_experience, list_battles};
    use crate::player::okapi_add_operation_for_get_player_;
    use crate::player::okapi_add_operation_for_grant_player_experience_;
    use crate::player::{get_player, grant_player_experience};
    use crate::roster::okapi_add_operation_for_get_combatant_;
    use crate::roster::okapi_add_operation_for_grant_experience_;
    use crate::roster::okapi_add_operation_for_list_roster_;
    use crate::roster::okapi_add_operation_for_upgrade_skill_;
    use crate::roster::{get_combatant, grant_experience, list_roster, upgrade_skill};
    use crate::rumble::okapi_add_operation_for_create_rumble_;
    use crate::rumble::okapi_add_operation_for_get_rumble_;
    use crate::rumble::okapi_add_operation_for_get_rumble_experience_;
    use crate::rumble::{create_rumble, get_rumble, get_rumble_experience};
    use crate::summoning::okapi_add_operation_for_summon_;
    use crate::summoning::okapi_add_operation_for_summon_history_;
    use crate::summoning::okapi_add_operation_for_summon_multi_;
    use crate::summoning::{summon, summon_history, summon_multi};

    #[allow(clippy::no_effect_underscore_binding)]
    let _ = env_logger::try_init();

    let gs = std::sync::Arc::new(rocket::futures::lock::Mutex::new(
        game_state::GameState::new(),
    ));

    rocket::build()
        .mount(
            "/",
            openapi_get_routes![
                summon,
                summon_multi,
                summon_history,
                list_roster,
                get_combatant,
                grant_experience,
                upgrade_skill,
                create_battle,
                get_battle,
                list_battles,
                get_battle_experience,
                create_rumble,
                get_rumble,
                get_rumble_experience,
                get_player,
                grant_player_experience,
                set_seed,
                reprocess_summons
            ],
        )
        .mount("/swagger", make_swagger_ui(&get_docs()))
        .manage(gs)
}

fn get_docs() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/openapi.json".to_string(),
        ..Default::default()
    }
}
