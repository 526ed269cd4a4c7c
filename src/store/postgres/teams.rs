use sqlx::PgExecutor;
use time::OffsetDateTime;

use crate::error::Result;
use crate::models::{NewTeam, Team, TeamId, TeamPatch};

impl Team {
    pub async fn get(executor: impl PgExecutor<'_>, id: TeamId) -> Result<Option<Team>> {
        Ok(
            sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?,
        )
    }

    pub async fn get_by_thread_id(
        executor: impl PgExecutor<'_>,
        thread_id: &str,
    ) -> Result<Option<Team>> {
        Ok(sqlx::query_as::<_, Team>(
            "SELECT * FROM teams WHERE thread_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(thread_id)
        .fetch_optional(executor)
        .await?)
    }

    pub async fn get_by_member(executor: impl PgExecutor<'_>, member: i64) -> Result<Option<Team>> {
        Ok(sqlx::query_as::<_, Team>(
            "SELECT teams.*
                     FROM players
                     JOIN teams
                        ON players.team_id = teams.id
                     WHERE players.member = $1",
        )
        .bind(member)
        .fetch_optional(executor)
        .await?)
    }

    pub async fn create(executor: impl PgExecutor<'_>, team: &NewTeam) -> Result<Team> {
        Ok(sqlx::query_as::<_, Team>(
            "INSERT INTO teams
                        (name, captain, has_first_pick, updated_at)
                    VALUES
                        ($1, $2, $3, $4)
                    RETURNING *",
        )
        .bind(&team.name)
        .bind(team.captain)
        .bind(team.has_first_pick)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(executor)
        .await?)
    }

    pub async fn patch(
        executor: impl PgExecutor<'_>,
        id: TeamId,
        patch: &TeamPatch,
    ) -> Result<Option<Team>> {
        Ok(sqlx::query_as::<_, Team>(
            "UPDATE teams
                    SET has_first_pick = COALESCE($2, has_first_pick),
                        thread_id = COALESCE($3, thread_id),
                        voice_channel_id = COALESCE($4, voice_channel_id),
                        updated_at = $5
                    WHERE id = $1
                    RETURNING *",
        )
        .bind(id)
        .bind(patch.has_first_pick)
        .bind(&patch.thread_id)
        .bind(&patch.voice_channel_id)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(executor)
        .await?)
    }
}
