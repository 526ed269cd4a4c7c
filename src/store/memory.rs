use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::{
    DraftAction, Game, Map, MapId, Match, MatchId, MatchPatch, MatchStatus, NewDraftAction,
    NewGame, NewMatch, NewPlayer, NewTeam, Player, Team, TeamId, TeamPatch,
};

use super::EntityStore;

#[derive(Debug, Default)]
struct Tables {
    next_id: i32,
    teams: Vec<Team>,
    players: Vec<Player>,
    matches: Vec<Match>,
    draft_actions: Vec<DraftAction>,
    maps: Vec<Map>,
    games: Vec<Game>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Store kept entirely in memory. Every operation runs under one lock and
/// checks the same unique slots the Postgres schema declares.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the enabled flag of a map, for driving pool readiness in tests.
    pub async fn set_map_enabled(&self, id: MapId, enabled: bool) -> Result<()> {
        let mut tables = self.tables.lock().await;
        let map = tables
            .maps
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::Configuration(format!("map {id} does not exist")))?;
        map.enabled = enabled;
        map.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get_team(&self, id: TeamId) -> Result<Option<Team>> {
        let tables = self.tables.lock().await;
        Ok(tables.teams.iter().find(|t| t.id == id).cloned())
    }

    async fn insert_team(&self, team: NewTeam) -> Result<Team> {
        let mut tables = self.tables.lock().await;
        let team = Team {
            id: tables.next_id(),
            name: team.name,
            captain: team.captain,
            has_first_pick: team.has_first_pick,
            thread_id: None,
            voice_channel_id: None,
            updated_at: OffsetDateTime::now_utc(),
        };
        tables.teams.push(team.clone());
        Ok(team)
    }

    async fn patch_team(&self, id: TeamId, patch: TeamPatch) -> Result<Team> {
        let mut tables = self.tables.lock().await;
        let team = tables
            .teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::Configuration(format!("team {id} does not exist")))?;
        if let Some(has_first_pick) = patch.has_first_pick {
            team.has_first_pick = has_first_pick;
        }
        if let Some(thread_id) = patch.thread_id {
            team.thread_id = Some(thread_id);
        }
        if let Some(voice_channel_id) = patch.voice_channel_id {
            team.voice_channel_id = Some(voice_channel_id);
        }
        team.updated_at = OffsetDateTime::now_utc();
        Ok(team.clone())
    }

    async fn get_team_by_thread_id(&self, thread_id: &str) -> Result<Option<Team>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .teams
            .iter()
            .find(|t| t.thread_id.as_deref() == Some(thread_id))
            .cloned())
    }

    async fn get_team_by_member(&self, member: i64) -> Result<Option<Team>> {
        let tables = self.tables.lock().await;
        let Some(player) = tables.players.iter().find(|p| p.member == member) else {
            return Ok(None);
        };
        Ok(tables.teams.iter().find(|t| t.id == player.team_id).cloned())
    }

    async fn get_players(&self, team: TeamId) -> Result<Vec<Player>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .players
            .iter()
            .filter(|p| p.team_id == team)
            .cloned()
            .collect())
    }

    async fn insert_player(&self, player: NewPlayer) -> Result<Player> {
        let mut tables = self.tables.lock().await;
        if tables.players.iter().any(|p| p.member == player.member) {
            return Err(Error::AlreadyOnTeam(player.member));
        }
        let player = Player {
            id: tables.next_id(),
            team_id: player.team_id,
            member: player.member,
            updated_at: OffsetDateTime::now_utc(),
        };
        tables.players.push(player.clone());
        Ok(player)
    }

    async fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
        let tables = self.tables.lock().await;
        Ok(tables.matches.iter().find(|m| m.id == id).cloned())
    }

    async fn get_match_by_thread_id(&self, thread_id: &str) -> Result<Option<Match>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .matches
            .iter()
            .find(|m| m.thread_id.as_deref() == Some(thread_id))
            .cloned())
    }

    async fn get_matches_by_status(&self, status: MatchStatus) -> Result<Vec<Match>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .matches
            .iter()
            .filter(|m| m.status == status)
            .cloned()
            .collect())
    }

    async fn insert_match(&self, new_match: NewMatch) -> Result<Match> {
        let mut tables = self.tables.lock().await;
        let m = Match {
            id: tables.next_id(),
            team_a: new_match.team_a,
            team_b: new_match.team_b,
            best_of: new_match.best_of,
            status: MatchStatus::DraftPhase,
            score_a: None,
            score_b: None,
            thread_id: None,
            updated_at: OffsetDateTime::now_utc(),
        };
        tables.matches.push(m.clone());
        Ok(m)
    }

    async fn patch_match(&self, id: MatchId, patch: MatchPatch) -> Result<Match> {
        let mut tables = self.tables.lock().await;
        let m = tables
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(Error::MatchNotFound(id))?;
        if let Some(status) = patch.status {
            m.status = status;
        }
        if let Some(score_a) = patch.score_a {
            m.score_a = Some(score_a);
        }
        if let Some(score_b) = patch.score_b {
            m.score_b = Some(score_b);
        }
        if let Some(thread_id) = patch.thread_id {
            m.thread_id = Some(thread_id);
        }
        m.updated_at = OffsetDateTime::now_utc();
        Ok(m.clone())
    }

    async fn get_match_actions(&self, match_id: MatchId) -> Result<Vec<DraftAction>> {
        let tables = self.tables.lock().await;
        let mut actions: Vec<DraftAction> = tables
            .draft_actions
            .iter()
            .filter(|a| a.match_id == match_id)
            .cloned()
            .collect();
        actions.sort_by_key(|a| a.sequence_order);
        Ok(actions)
    }

    async fn insert_draft_action(&self, action: NewDraftAction) -> Result<DraftAction> {
        let mut tables = self.tables.lock().await;
        let taken = tables
            .draft_actions
            .iter()
            .any(|a| a.match_id == action.match_id && a.sequence_order == action.sequence_order);
        if taken {
            return Err(Error::ConcurrentModification {
                match_id: action.match_id,
                sequence_order: action.sequence_order,
            });
        }
        let stored = DraftAction {
            id: tables.next_id(),
            match_id: action.match_id,
            team_id: action.team_id,
            sequence_order: action.sequence_order,
            choice: action.choice,
            updated_at: OffsetDateTime::now_utc(),
        };
        tables.draft_actions.push(stored.clone());
        Ok(stored)
    }

    async fn get_maps(&self) -> Result<Vec<Map>> {
        let tables = self.tables.lock().await;
        Ok(tables.maps.clone())
    }

    async fn get_enabled_maps(&self) -> Result<Vec<Map>> {
        let tables = self.tables.lock().await;
        Ok(tables.maps.iter().filter(|m| m.enabled).cloned().collect())
    }

    async fn get_map_by_name(&self, name: &str) -> Result<Option<Map>> {
        let tables = self.tables.lock().await;
        Ok(tables.maps.iter().find(|m| m.name == name).cloned())
    }

    async fn insert_map(&self, name: &str, enabled: bool) -> Result<MapId> {
        let mut tables = self.tables.lock().await;
        if tables.maps.iter().any(|m| m.name == name) {
            return Err(Error::DuplicateMap(name.to_string()));
        }
        let id = tables.next_id();
        tables.maps.push(Map {
            id,
            name: name.to_string(),
            enabled,
            updated_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }

    async fn get_games(&self, match_id: MatchId) -> Result<Vec<Game>> {
        let tables = self.tables.lock().await;
        let mut games: Vec<Game> = tables
            .games
            .iter()
            .filter(|g| g.match_id == match_id)
            .cloned()
            .collect();
        games.sort_by_key(|g| g.play_order);
        Ok(games)
    }

    async fn insert_games(&self, games: Vec<NewGame>) -> Result<()> {
        let mut tables = self.tables.lock().await;
        for (i, game) in games.iter().enumerate() {
            let same_slot = |match_id: MatchId, play_order: i32| {
                match_id == game.match_id && play_order == game.play_order
            };
            let taken = tables
                .games
                .iter()
                .any(|g| same_slot(g.match_id, g.play_order))
                || games[..i]
                    .iter()
                    .any(|g| same_slot(g.match_id, g.play_order));
            if taken {
                return Err(Error::GameSlotTaken {
                    match_id: game.match_id,
                    play_order: game.play_order,
                });
            }
        }
        for game in games {
            let id = tables.next_id();
            tables.games.push(Game {
                id,
                match_id: game.match_id,
                map_id: game.map_id,
                play_order: game.play_order,
                picked_by: game.picked_by,
                start_attack: game.start_attack,
                start_defense: game.start_defense,
                score_a: 0,
                score_b: 0,
                updated_at: OffsetDateTime::now_utc(),
            });
        }
        Ok(())
    }

    async fn update_game_score(
        &self,
        match_id: MatchId,
        play_order: i32,
        score_a: i32,
        score_b: i32,
    ) -> Result<Game> {
        let mut tables = self.tables.lock().await;
        let game = tables
            .games
            .iter_mut()
            .find(|g| g.match_id == match_id && g.play_order == play_order)
            .ok_or(Error::GameNotFound {
                match_id,
                play_order,
            })?;
        game.score_a = score_a;
        game.score_b = score_b;
        game.updated_at = OffsetDateTime::now_utc();
        Ok(game.clone())
    }
}
