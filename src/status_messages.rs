use either::{Either, Left, Right};
use rocket::response::status::{BadRequest, NotFound};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::error::EngineError;

/// JSON body returned by every failed request.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct Status {
    pub message: String,
}

pub fn new_status(message: impl Into<String>) -> Json<Status> {
    Json(Status {
        message: message.into(),
    })
}

/// Error responder shared by all endpoints.
pub type ApiError = Either<NotFound<Json<Status>>, BadRequest<Json<Status>>>;

/// Map an engine error onto an HTTP response.
///
/// Missing entities and ownership mismatches both surface as 404 so a
/// requester cannot probe which combatant ids exist for other players.
/// Everything else is a 400 with the error message as body.
pub fn api_error(error: EngineError) -> ApiError {
    match error {
        EngineError::NotFound(_) | EngineError::Unauthorized(..) => {
            Left(NotFound(new_status(error.to_string())))
        }
        _ => Right(BadRequest(new_status(error.to_string()))),
    }
}
