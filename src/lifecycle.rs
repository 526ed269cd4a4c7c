//! Match status transitions: DraftPhase -> InProgress -> Finished.

use crate::draft::recorder::load_match;
use crate::draft::{next_step, remaining_maps, series_maps};
use crate::error::{Error, Result};
use crate::map_pool;
use crate::models::{
    ActionKind, BestOf, DraftChoice, Game, Match, MatchId, MatchPatch, MatchStatus,
    NewDraftAction, NewGame, NewMatch, TeamId,
};
use crate::store::EntityStore;

pub async fn create_match<S: EntityStore + ?Sized>(
    store: &S,
    team_a: TeamId,
    team_b: TeamId,
    best_of: i32,
) -> Result<Match> {
    let best_of = BestOf::try_from(best_of)?;
    if team_a == team_b {
        return Err(Error::Configuration(format!(
            "team {team_a} cannot play against itself"
        )));
    }
    for team in [team_a, team_b] {
        if store.get_team(team).await?.is_none() {
            return Err(Error::Configuration(format!("team {team} does not exist")));
        }
    }
    map_pool::ensure_pool_ready(store).await?;
    let m = store
        .insert_match(NewMatch {
            team_a,
            team_b,
            best_of,
        })
        .await?;
    log::info!(
        "Match {} created: team {} vs team {} ({})",
        m.id,
        team_a,
        team_b,
        best_of
    );
    Ok(m)
}

async fn transition<S: EntityStore + ?Sized>(
    store: &S,
    m: &Match,
    patch: MatchPatch,
) -> Result<Match> {
    if let Some(to) = patch.status {
        if !m.status.can_transition_to(to) {
            return Err(Error::InvalidTransition {
                match_id: m.id,
                from: m.status,
                to,
            });
        }
    }
    store.patch_match(m.id, patch).await
}

/// Run after every recorded action. Once the draft is complete this records
/// the decider, lays out the games and moves the match to InProgress; in any
/// other state it does nothing, so calling it again is harmless.
pub async fn after_action<S: EntityStore + ?Sized>(store: &S, match_id: MatchId) -> Result<Match> {
    let (m, team_a, team_b) = load_match(store, match_id).await?;
    if m.status != MatchStatus::DraftPhase {
        return Ok(m);
    }
    let mut history = store.get_match_actions(match_id).await?;
    if !next_step(&m, &team_a, &team_b, &history)?.is_complete() {
        return Ok(m);
    }

    if !history.iter().any(|a| a.kind() == ActionKind::Decider) {
        let pool = store.get_enabled_maps().await?;
        let decider = match remaining_maps(&pool, &history).as_slice() {
            [only] => Some(only.id),
            remaining => {
                log::warn!(
                    "Match {}: {} maps left after the draft, no decider recorded",
                    match_id,
                    remaining.len()
                );
                None
            }
        };
        if let Some(map) = decider {
            store
                .insert_draft_action(NewDraftAction {
                    match_id,
                    team_id: None,
                    sequence_order: history.len() as i32 + 1,
                    choice: DraftChoice::Decider(map),
                })
                .await?;
            log::info!("Match {}: map {} is the decider", match_id, map);
            history = store.get_match_actions(match_id).await?;
        }
    }

    if store.get_games(match_id).await?.is_empty() {
        let games: Vec<NewGame> = series_maps(&m, &history)
            .into_iter()
            .enumerate()
            .map(|(i, s)| NewGame {
                match_id,
                map_id: s.map_id,
                play_order: i as i32 + 1,
                picked_by: s.picked_by,
                start_attack: s.start_attack,
                start_defense: s.start_defense,
            })
            .collect();
        store.insert_games(games).await?;
    }

    let m = transition(store, &m, MatchPatch::status(MatchStatus::InProgress)).await?;
    log::info!("Match {}: draft complete, match in progress", match_id);
    Ok(m)
}

/// Records the final score and finishes the match whatever state the draft
/// is in. Submitting again overwrites the previous score.
pub async fn submit_score<S: EntityStore + ?Sized>(
    store: &S,
    match_id: MatchId,
    score_a: i32,
    score_b: i32,
) -> Result<Match> {
    if score_a < 0 || score_b < 0 {
        return Err(Error::InvalidScore(score_a, score_b));
    }
    let m = store
        .get_match(match_id)
        .await?
        .ok_or(Error::MatchNotFound(match_id))?;
    if m.status == MatchStatus::DraftPhase {
        log::warn!("Match {}: finishing before the draft completed", match_id);
    }
    let m = transition(
        store,
        &m,
        MatchPatch {
            status: Some(MatchStatus::Finished),
            score_a: Some(score_a),
            score_b: Some(score_b),
            thread_id: None,
        },
    )
    .await?;
    log::info!("Match {} score set to {}-{}", match_id, score_a, score_b);
    Ok(m)
}

/// Sets the round tally of one played map.
pub async fn record_game_score<S: EntityStore + ?Sized>(
    store: &S,
    match_id: MatchId,
    play_order: i32,
    score_a: i32,
    score_b: i32,
) -> Result<Game> {
    if score_a < 0 || score_b < 0 {
        return Err(Error::InvalidScore(score_a, score_b));
    }
    let m = store
        .get_match(match_id)
        .await?
        .ok_or(Error::MatchNotFound(match_id))?;
    if m.status != MatchStatus::InProgress {
        return Err(Error::NotInProgress(match_id, m.status));
    }
    let game = store
        .update_game_score(match_id, play_order, score_a, score_b)
        .await?;
    log::info!(
        "Match {} game {} score set to {}-{}",
        match_id,
        play_order,
        score_a,
        score_b
    );
    Ok(game)
}

/// Series score. A best-of-1 reports the round tally of its only game,
/// longer series count maps won, skipping games nobody has scored yet.
pub fn series_score(best_of: BestOf, games: &[Game]) -> (i32, i32) {
    match best_of {
        BestOf::Bo1 => games
            .first()
            .map(|g| (g.score_a, g.score_b))
            .unwrap_or((0, 0)),
        _ => games
            .iter()
            .filter(|g| g.is_played())
            .fold((0, 0), |(a, b), g| {
                if g.score_a > g.score_b {
                    (a + 1, b)
                } else if g.score_b > g.score_a {
                    (a, b + 1)
                } else {
                    (a, b)
                }
            }),
    }
}

pub async fn attach_thread<S: EntityStore + ?Sized>(
    store: &S,
    match_id: MatchId,
    thread_id: &str,
) -> Result<Match> {
    store
        .patch_match(match_id, MatchPatch::thread(thread_id))
        .await
}

pub async fn find_by_thread<S: EntityStore + ?Sized>(
    store: &S,
    thread_id: &str,
) -> Result<Option<Match>> {
    store.get_match_by_thread_id(thread_id).await
}
