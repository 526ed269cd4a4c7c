use sqlx::PgExecutor;
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::models::{NewPlayer, Player, TeamId};

use super::is_unique_violation;

impl Player {
    pub async fn get_by_team(executor: impl PgExecutor<'_>, team: TeamId) -> Result<Vec<Player>> {
        Ok(
            sqlx::query_as::<_, Player>("SELECT * FROM players WHERE team_id = $1 ORDER BY id")
                .bind(team)
                .fetch_all(executor)
                .await?,
        )
    }

    pub async fn create(executor: impl PgExecutor<'_>, player: &NewPlayer) -> Result<Player> {
        sqlx::query_as::<_, Player>(
            "INSERT INTO players (team_id, member, updated_at) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(player.team_id)
        .bind(player.member)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(executor)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                Error::AlreadyOnTeam(player.member)
            } else {
                Error::Database(err)
            }
        })
    }
}
