use thiserror::Error;

use crate::models::{ActionKind, MapId, MatchId, MatchStatus, TeamId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid best-of, unresolved team or a match that references the wrong teams.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("match {0} does not exist")]
    MatchNotFound(MatchId),

    #[error("it is not team {claimed}'s turn, team {expected} must act")]
    NotYourTurn { expected: TeamId, claimed: TeamId },

    #[error("expected a {expected} action, got {got}")]
    WrongActionKind { expected: ActionKind, got: ActionKind },

    #[error("map {0} has already been banned or picked")]
    MapAlreadyUsed(MapId),

    #[error("map {0} is not in the active map pool")]
    MapNotInPool(MapId),

    #[error("draft for match {0} is already complete")]
    DraftComplete(MatchId),

    #[error("match {0} is no longer in the draft phase ({1})")]
    DraftClosed(MatchId, MatchStatus),

    #[error("match {0} is not in progress ({1})")]
    NotInProgress(MatchId, MatchStatus),

    #[error("map pool is not ready: {enabled} maps enabled, {required} required")]
    PoolNotReady { enabled: usize, required: usize },

    #[error("draft action {sequence_order} of match {match_id} was recorded concurrently")]
    ConcurrentModification { match_id: MatchId, sequence_order: i32 },

    #[error("game {play_order} of match {match_id} was planned concurrently")]
    GameSlotTaken { match_id: MatchId, play_order: i32 },

    #[error("match {match_id} cannot move from {from} to {to}")]
    InvalidTransition {
        match_id: MatchId,
        from: MatchStatus,
        to: MatchStatus,
    },

    #[error("scores cannot be negative ({0}-{1})")]
    InvalidScore(i32, i32),

    #[error("match {match_id} has no game at position {play_order}")]
    GameNotFound { match_id: MatchId, play_order: i32 },

    #[error("member {0} already plays for a team")]
    AlreadyOnTeam(i64),

    #[error("member {member} is not a captain in match {match_id}")]
    NotCaptain { match_id: MatchId, member: i64 },

    #[error("map {0} already exists")]
    DuplicateMap(String),

    #[error("stored record is corrupt: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl Error {
    /// Errors caused by what the caller submitted; nothing was written and the
    /// request can be corrected and retried.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::NotYourTurn { .. }
                | Error::WrongActionKind { .. }
                | Error::MapAlreadyUsed(_)
                | Error::MapNotInPool(_)
                | Error::DraftComplete(_)
                | Error::DraftClosed(..)
                | Error::NotInProgress(..)
                | Error::InvalidScore(..)
                | Error::AlreadyOnTeam(_)
                | Error::NotCaptain { .. }
        )
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::ConcurrentModification { .. } | Error::GameSlotTaken { .. }
        )
    }
}
