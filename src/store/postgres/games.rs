use sqlx::PgExecutor;
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::models::{Game, MatchId, NewGame};

use super::is_unique_violation;

impl Game {
    pub async fn get_by_match(
        executor: impl PgExecutor<'_>,
        match_id: MatchId,
    ) -> Result<Vec<Game>> {
        Ok(sqlx::query_as::<_, Game>(
            "SELECT * FROM games WHERE match_id = $1 ORDER BY play_order",
        )
        .bind(match_id)
        .fetch_all(executor)
        .await?)
    }

    /// A second plan for the same (match_id, play_order) fails with `GameSlotTaken`.
    pub async fn create(executor: impl PgExecutor<'_>, game: &NewGame) -> Result<Game> {
        sqlx::query_as::<_, Game>(
            "INSERT INTO games
                        (match_id, map_id, play_order, picked_by, start_attack, start_defense,
                         score_a, score_b, updated_at)
                    VALUES
                        ($1, $2, $3, $4, $5, $6, 0, 0, $7)
                    RETURNING *",
        )
        .bind(game.match_id)
        .bind(game.map_id)
        .bind(game.play_order)
        .bind(game.picked_by)
        .bind(game.start_attack)
        .bind(game.start_defense)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(executor)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                Error::GameSlotTaken {
                    match_id: game.match_id,
                    play_order: game.play_order,
                }
            } else {
                Error::Database(err)
            }
        })
    }

    pub async fn update_score(
        executor: impl PgExecutor<'_>,
        match_id: MatchId,
        play_order: i32,
        score_a: i32,
        score_b: i32,
    ) -> Result<Option<Game>> {
        Ok(sqlx::query_as::<_, Game>(
            "UPDATE games
                    SET score_a = $3, score_b = $4, updated_at = $5
                    WHERE match_id = $1 AND play_order = $2
                    RETURNING *",
        )
        .bind(match_id)
        .bind(play_order)
        .bind(score_a)
        .bind(score_b)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(executor)
        .await?)
    }
}
