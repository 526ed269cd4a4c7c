use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::{
    DraftAction, Game, Map, MapId, Match, MatchId, MatchPatch, MatchStatus, NewDraftAction,
    NewGame, NewMatch, NewPlayer, NewTeam, Player, Team, TeamId, TeamPatch,
};

use super::EntityStore;

mod draft_actions;
mod games;
mod maps;
mod matches;
mod players;
mod teams;

const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
    )
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(sqlx::Error::from)?;
        Ok(())
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn get_team(&self, id: TeamId) -> Result<Option<Team>> {
        Team::get(&self.pool, id).await
    }

    async fn insert_team(&self, team: NewTeam) -> Result<Team> {
        Team::create(&self.pool, &team).await
    }

    async fn patch_team(&self, id: TeamId, patch: TeamPatch) -> Result<Team> {
        Team::patch(&self.pool, id, &patch)
            .await?
            .ok_or_else(|| Error::Configuration(format!("team {id} does not exist")))
    }

    async fn get_team_by_thread_id(&self, thread_id: &str) -> Result<Option<Team>> {
        Team::get_by_thread_id(&self.pool, thread_id).await
    }

    async fn get_team_by_member(&self, member: i64) -> Result<Option<Team>> {
        Team::get_by_member(&self.pool, member).await
    }

    async fn get_players(&self, team: TeamId) -> Result<Vec<Player>> {
        Player::get_by_team(&self.pool, team).await
    }

    async fn insert_player(&self, player: NewPlayer) -> Result<Player> {
        Player::create(&self.pool, &player).await
    }

    async fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
        Match::get(&self.pool, id).await
    }

    async fn get_match_by_thread_id(&self, thread_id: &str) -> Result<Option<Match>> {
        Match::get_by_thread_id(&self.pool, thread_id).await
    }

    async fn get_matches_by_status(&self, status: MatchStatus) -> Result<Vec<Match>> {
        Match::get_all_by_status(&self.pool, status).await
    }

    async fn insert_match(&self, new_match: NewMatch) -> Result<Match> {
        Match::create(&self.pool, &new_match).await
    }

    async fn patch_match(&self, id: MatchId, patch: MatchPatch) -> Result<Match> {
        Match::patch(&self.pool, id, &patch)
            .await?
            .ok_or(Error::MatchNotFound(id))
    }

    async fn get_match_actions(&self, match_id: MatchId) -> Result<Vec<DraftAction>> {
        DraftAction::get_by_match(&self.pool, match_id).await
    }

    async fn insert_draft_action(&self, action: NewDraftAction) -> Result<DraftAction> {
        DraftAction::create(&self.pool, &action).await
    }

    async fn get_maps(&self) -> Result<Vec<Map>> {
        Map::get_all(&self.pool, false).await
    }

    async fn get_enabled_maps(&self) -> Result<Vec<Map>> {
        Map::get_all(&self.pool, true).await
    }

    async fn get_map_by_name(&self, name: &str) -> Result<Option<Map>> {
        Map::get_by_name(&self.pool, name).await
    }

    async fn insert_map(&self, name: &str, enabled: bool) -> Result<MapId> {
        Map::create(&self.pool, name, enabled).await
    }

    async fn get_games(&self, match_id: MatchId) -> Result<Vec<Game>> {
        Game::get_by_match(&self.pool, match_id).await
    }

    async fn insert_games(&self, games: Vec<NewGame>) -> Result<()> {
        let mut transaction = self.pool.begin().await?;
        for game in &games {
            Game::create(&mut transaction, game).await?;
        }
        transaction.commit().await?;
        Ok(())
    }

    async fn update_game_score(
        &self,
        match_id: MatchId,
        play_order: i32,
        score_a: i32,
        score_b: i32,
    ) -> Result<Game> {
        Game::update_score(&self.pool, match_id, play_order, score_a, score_b)
            .await?
            .ok_or(Error::GameNotFound {
                match_id,
                play_order,
            })
    }
}
