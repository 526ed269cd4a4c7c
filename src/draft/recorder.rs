use crate::error::{Error, Result};
use crate::models::{
    DraftAction, DraftChoice, Match, MatchId, MatchStatus, NewDraftAction, Team, TeamId,
};
use crate::store::EntityStore;

use super::sequencer::{next_step, DraftState};
use super::used_maps;

/// Loads a match together with both of its teams.
pub(crate) async fn load_match<S: EntityStore + ?Sized>(
    store: &S,
    match_id: MatchId,
) -> Result<(Match, Team, Team)> {
    let m = store
        .get_match(match_id)
        .await?
        .ok_or(Error::MatchNotFound(match_id))?;
    let team_a = resolve_team(store, m.team_a).await?;
    let team_b = resolve_team(store, m.team_b).await?;
    Ok((m, team_a, team_b))
}

async fn resolve_team<S: EntityStore + ?Sized>(store: &S, id: TeamId) -> Result<Team> {
    store
        .get_team(id)
        .await?
        .ok_or_else(|| Error::Configuration(format!("team {id} does not exist")))
}

/// What the match is waiting for right now.
pub async fn current_step<S: EntityStore + ?Sized>(
    store: &S,
    match_id: MatchId,
) -> Result<DraftState> {
    let (m, team_a, team_b) = load_match(store, match_id).await?;
    let history = store.get_match_actions(match_id).await?;
    next_step(&m, &team_a, &team_b, &history)
}

/// Validates `choice` against the step the sequencer currently demands and
/// appends it to the match history. Nothing is written when validation fails,
/// and the match status is left for the lifecycle to derive.
pub async fn record_action<S: EntityStore + ?Sized>(
    store: &S,
    match_id: MatchId,
    acting_team: TeamId,
    choice: DraftChoice,
) -> Result<DraftAction> {
    let (m, team_a, team_b) = load_match(store, match_id).await?;
    if m.status != MatchStatus::DraftPhase {
        return Err(Error::DraftClosed(match_id, m.status));
    }
    let history = store.get_match_actions(match_id).await?;
    let step = match next_step(&m, &team_a, &team_b, &history)? {
        DraftState::Next(step) => step,
        DraftState::Complete => return Err(Error::DraftComplete(match_id)),
    };
    if acting_team != step.acting_team {
        return Err(Error::NotYourTurn {
            expected: step.acting_team,
            claimed: acting_team,
        });
    }
    if choice.kind() != step.kind {
        return Err(Error::WrongActionKind {
            expected: step.kind,
            got: choice.kind(),
        });
    }
    if let Some(map) = choice.map() {
        if used_maps(&history).contains(&map) {
            return Err(Error::MapAlreadyUsed(map));
        }
        let pool = store.get_enabled_maps().await?;
        if !pool.iter().any(|candidate| candidate.id == map) {
            return Err(Error::MapNotInPool(map));
        }
    }

    let action = store
        .insert_draft_action(NewDraftAction {
            match_id,
            team_id: Some(acting_team),
            sequence_order: step.sequence_order,
            choice,
        })
        .await?;
    log::info!(
        "Match {}: team {} recorded {} #{} ({:?})",
        match_id,
        acting_team,
        step.kind,
        step.sequence_order,
        choice
    );
    Ok(action)
}
