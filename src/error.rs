use thiserror::Error;

/// Failure modes of the simulation engine and its surrounding stores.
///
/// Validation errors are terminal for the request that raised them and are
/// never retried. `MaterializationFailed` is the one transient case: a summon
/// that could not be completed stays recorded as unresolved and is retried
/// exactly once per reprocessing sweep.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("combatant {0} does not belong to player {1}")]
    Unauthorized(u64, String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no skill points available")]
    NoSkillPoints,

    #[error("skill {0} is already at max level")]
    SkillAtMaxLevel(u32),

    #[error("skill {0} not found")]
    SkillNotFound(u32),

    #[error("at least 3 combatants are required for a rumble, got {0}")]
    InsufficientParticipants(usize),

    #[error("no summon templates available")]
    NoTemplatesAvailable,

    #[error("summon could not be completed: {0}")]
    MaterializationFailed(String),
}
