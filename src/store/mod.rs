//! Persistence boundary. The engine only talks to storage through
//! [`EntityStore`]; `PgStore` backs the bot and `MemoryStore` backs tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    DraftAction, Game, Map, MapId, Match, MatchId, MatchPatch, MatchStatus, NewDraftAction,
    NewGame, NewMatch, NewPlayer, NewTeam, Player, Team, TeamId, TeamPatch,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_team(&self, id: TeamId) -> Result<Option<Team>>;
    async fn insert_team(&self, team: NewTeam) -> Result<Team>;
    async fn patch_team(&self, id: TeamId, patch: TeamPatch) -> Result<Team>;
    async fn get_team_by_thread_id(&self, thread_id: &str) -> Result<Option<Team>>;
    async fn get_team_by_member(&self, member: i64) -> Result<Option<Team>>;

    /// Players of one team in the order they joined.
    async fn get_players(&self, team: TeamId) -> Result<Vec<Player>>;
    /// Fails with `AlreadyOnTeam` when the member is on any roster already.
    async fn insert_player(&self, player: NewPlayer) -> Result<Player>;

    async fn get_match(&self, id: MatchId) -> Result<Option<Match>>;
    async fn get_match_by_thread_id(&self, thread_id: &str) -> Result<Option<Match>>;
    async fn get_matches_by_status(&self, status: MatchStatus) -> Result<Vec<Match>>;
    async fn insert_match(&self, new_match: NewMatch) -> Result<Match>;
    /// Applies the set fields and always stamps `updated_at`.
    async fn patch_match(&self, id: MatchId, patch: MatchPatch) -> Result<Match>;

    /// Actions of one match ordered by `sequence_order`.
    async fn get_match_actions(&self, match_id: MatchId) -> Result<Vec<DraftAction>>;
    /// Returns the stored row. Fails with `ConcurrentModification` when the
    /// (match, order) slot is taken.
    async fn insert_draft_action(&self, action: NewDraftAction) -> Result<DraftAction>;

    async fn get_maps(&self) -> Result<Vec<Map>>;
    async fn get_enabled_maps(&self) -> Result<Vec<Map>>;
    async fn get_map_by_name(&self, name: &str) -> Result<Option<Map>>;
    async fn insert_map(&self, name: &str, enabled: bool) -> Result<MapId>;

    /// Games of one match ordered by `play_order`.
    async fn get_games(&self, match_id: MatchId) -> Result<Vec<Game>>;
    async fn insert_games(&self, games: Vec<NewGame>) -> Result<()>;
    async fn update_game_score(
        &self,
        match_id: MatchId,
        play_order: i32,
        score_a: i32,
        score_b: i32,
    ) -> Result<Game>;
}
