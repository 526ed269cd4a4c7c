use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum::{Display, EnumIter, EnumString};
use time::OffsetDateTime;

use crate::error::Error;

pub type TeamId = i32;
pub type MatchId = i32;
pub type MapId = i32;
pub type DraftActionId = i32;
pub type GameId = i32;
pub type PlayerId = i32;

/// Number of enabled maps a draft is played over.
pub const MAP_POOL_SIZE: usize = 7;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum BestOf {
    Bo1,
    Bo3,
    Bo5,
}

impl BestOf {
    pub fn max_games(self) -> i32 {
        match self {
            BestOf::Bo1 => 1,
            BestOf::Bo3 => 3,
            BestOf::Bo5 => 5,
        }
    }
}

impl TryFrom<i32> for BestOf {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BestOf::Bo1),
            3 => Ok(BestOf::Bo3),
            5 => Ok(BestOf::Bo5),
            _ => Err(Error::Configuration(format!(
                "unsupported best-of value: {value}"
            ))),
        }
    }
}

impl From<BestOf> for i32 {
    fn from(best_of: BestOf) -> Self {
        best_of.max_games()
    }
}

/// Ordering follows the lifecycle, so a transition is legal only when it does
/// not compare lower than the current status.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum MatchStatus {
    DraftPhase,
    InProgress,
    Finished,
}

impl MatchStatus {
    pub fn can_transition_to(self, next: MatchStatus) -> bool {
        next >= self
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Ban,
    Pick,
    SideChoice,
    Decider,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Side {
    #[strum(to_string = "attack", serialize = "atk")]
    Attack,
    #[strum(to_string = "defense", serialize = "def")]
    Defense,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// External id of the captain's account.
    pub captain: i64,
    pub has_first_pick: bool,
    pub thread_id: Option<String>,
    pub voice_channel_id: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    pub captain: i64,
    pub has_first_pick: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamPatch {
    pub has_first_pick: Option<bool>,
    pub thread_id: Option<String>,
    pub voice_channel_id: Option<String>,
}

/// Roster entry. A member belongs to at most one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Player {
    pub id: PlayerId,
    pub team_id: TeamId,
    /// External id of the member's account.
    pub member: i64,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    pub team_id: TeamId,
    pub member: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub best_of: BestOf,
    pub status: MatchStatus,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    pub thread_id: Option<String>,
    pub updated_at: OffsetDateTime,
}

impl Match {
    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        if team == self.team_a {
            Some(self.team_b)
        } else if team == self.team_b {
            Some(self.team_a)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub best_of: BestOf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPatch {
    pub status: Option<MatchStatus>,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    pub thread_id: Option<String>,
}

impl MatchPatch {
    pub fn status(status: MatchStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            ..Default::default()
        }
    }
}

/// What a team submits during the draft. The kind of action is carried by the
/// variant so a ban can never arrive with a side attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftChoice {
    Ban(MapId),
    Pick(MapId),
    SideChoice(Side),
    Decider(MapId),
}

impl DraftChoice {
    pub fn kind(&self) -> ActionKind {
        match self {
            DraftChoice::Ban(_) => ActionKind::Ban,
            DraftChoice::Pick(_) => ActionKind::Pick,
            DraftChoice::SideChoice(_) => ActionKind::SideChoice,
            DraftChoice::Decider(_) => ActionKind::Decider,
        }
    }

    pub fn map(&self) -> Option<MapId> {
        match self {
            DraftChoice::Ban(map) | DraftChoice::Pick(map) | DraftChoice::Decider(map) => {
                Some(*map)
            }
            DraftChoice::SideChoice(_) => None,
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            DraftChoice::SideChoice(side) => Some(*side),
            _ => None,
        }
    }

    /// Rebuilds a choice from its stored columns.
    pub fn from_parts(
        kind: ActionKind,
        map: Option<MapId>,
        side: Option<Side>,
    ) -> Result<Self, Error> {
        match (kind, map, side) {
            (ActionKind::Ban, Some(map), None) => Ok(DraftChoice::Ban(map)),
            (ActionKind::Pick, Some(map), None) => Ok(DraftChoice::Pick(map)),
            (ActionKind::Decider, Some(map), None) => Ok(DraftChoice::Decider(map)),
            (ActionKind::SideChoice, None, Some(side)) => Ok(DraftChoice::SideChoice(side)),
            _ => Err(Error::Corrupt(format!(
                "{kind} action with map {map:?} and side {side:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAction {
    pub id: DraftActionId,
    pub match_id: MatchId,
    /// `None` for the decider, which is recorded by the system rather than a team.
    pub team_id: Option<TeamId>,
    pub sequence_order: i32,
    pub choice: DraftChoice,
    pub updated_at: OffsetDateTime,
}

impl DraftAction {
    pub fn kind(&self) -> ActionKind {
        self.choice.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDraftAction {
    pub match_id: MatchId,
    pub team_id: Option<TeamId>,
    pub sequence_order: i32,
    pub choice: DraftChoice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Map {
    pub id: MapId,
    pub name: String,
    pub enabled: bool,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Game {
    pub id: GameId,
    pub match_id: MatchId,
    pub map_id: MapId,
    pub play_order: i32,
    pub picked_by: Option<TeamId>,
    pub start_attack: Option<TeamId>,
    pub start_defense: Option<TeamId>,
    pub score_a: i32,
    pub score_b: i32,
    pub updated_at: OffsetDateTime,
}

impl Game {
    pub fn is_played(&self) -> bool {
        self.score_a > 0 || self.score_b > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub match_id: MatchId,
    pub map_id: MapId,
    pub play_order: i32,
    pub picked_by: Option<TeamId>,
    pub start_attack: Option<TeamId>,
    pub start_defense: Option<TeamId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn best_of_rejects_even_counts() {
        assert_eq!(BestOf::try_from(3).unwrap(), BestOf::Bo3);
        assert!(matches!(
            BestOf::try_from(2),
            Err(Error::Configuration(_))
        ));
        assert!(BestOf::try_from(7).is_err());
    }

    #[test]
    fn status_only_moves_forward() {
        assert!(MatchStatus::DraftPhase.can_transition_to(MatchStatus::InProgress));
        assert!(MatchStatus::DraftPhase.can_transition_to(MatchStatus::Finished));
        assert!(MatchStatus::InProgress.can_transition_to(MatchStatus::InProgress));
        assert!(!MatchStatus::Finished.can_transition_to(MatchStatus::InProgress));
        assert!(!MatchStatus::InProgress.can_transition_to(MatchStatus::DraftPhase));
    }

    #[test]
    fn enums_use_storage_names() {
        assert_eq!(MatchStatus::DraftPhase.to_string(), "draft_phase");
        assert_eq!(ActionKind::SideChoice.to_string(), "side_choice");
        assert_eq!(BestOf::Bo5.to_string(), "bo5");
        assert_eq!(Side::Attack.to_string(), "attack");
        assert_eq!(Side::from_str("def").unwrap(), Side::Defense);
        assert_eq!(
            MatchStatus::from_str("in_progress").unwrap(),
            MatchStatus::InProgress
        );
    }

    #[test]
    fn choice_parts_must_agree_with_kind() {
        assert_eq!(
            DraftChoice::from_parts(ActionKind::Pick, Some(4), None).unwrap(),
            DraftChoice::Pick(4)
        );
        assert!(DraftChoice::from_parts(ActionKind::Ban, None, Some(Side::Attack)).is_err());
        assert!(DraftChoice::from_parts(ActionKind::SideChoice, Some(1), None).is_err());
    }
}
