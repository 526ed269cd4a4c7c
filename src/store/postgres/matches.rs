use sqlx::{FromRow, PgExecutor};
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::models::{BestOf, Match, MatchId, MatchPatch, MatchStatus, NewMatch};

#[derive(Debug, FromRow)]
struct MatchRow {
    id: i32,
    team_a: i32,
    team_b: i32,
    best_of: i32,
    status: String,
    score_a: Option<i32>,
    score_b: Option<i32>,
    thread_id: Option<String>,
    updated_at: OffsetDateTime,
}

impl TryFrom<MatchRow> for Match {
    type Error = Error;

    fn try_from(row: MatchRow) -> Result<Self> {
        let status = row
            .status
            .parse::<MatchStatus>()
            .map_err(|_| Error::Corrupt(format!("match {} status '{}'", row.id, row.status)))?;
        Ok(Match {
            id: row.id,
            team_a: row.team_a,
            team_b: row.team_b,
            best_of: BestOf::try_from(row.best_of)?,
            status,
            score_a: row.score_a,
            score_b: row.score_b,
            thread_id: row.thread_id,
            updated_at: row.updated_at,
        })
    }
}

fn convert(row: Option<MatchRow>) -> Result<Option<Match>> {
    row.map(Match::try_from).transpose()
}

impl Match {
    pub async fn get(executor: impl PgExecutor<'_>, id: MatchId) -> Result<Option<Match>> {
        let row = sqlx::query_as::<_, MatchRow>("SELECT * FROM matches WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        convert(row)
    }

    pub async fn get_by_thread_id(
        executor: impl PgExecutor<'_>,
        thread_id: &str,
    ) -> Result<Option<Match>> {
        let row = sqlx::query_as::<_, MatchRow>(
            "SELECT * FROM matches WHERE thread_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(thread_id)
        .fetch_optional(executor)
        .await?;
        convert(row)
    }

    pub async fn get_all_by_status(
        executor: impl PgExecutor<'_>,
        status: MatchStatus,
    ) -> Result<Vec<Match>> {
        sqlx::query_as::<_, MatchRow>("SELECT * FROM matches WHERE status = $1 ORDER BY id")
            .bind(status.to_string())
            .fetch_all(executor)
            .await?
            .into_iter()
            .map(Match::try_from)
            .collect()
    }

    pub async fn create(executor: impl PgExecutor<'_>, new_match: &NewMatch) -> Result<Match> {
        let row = sqlx::query_as::<_, MatchRow>(
            "INSERT INTO matches
                        (team_a, team_b, best_of, status, updated_at)
                    VALUES
                        ($1, $2, $3, $4, $5)
                    RETURNING *",
        )
        .bind(new_match.team_a)
        .bind(new_match.team_b)
        .bind(i32::from(new_match.best_of))
        .bind(MatchStatus::DraftPhase.to_string())
        .bind(OffsetDateTime::now_utc())
        .fetch_one(executor)
        .await?;
        Match::try_from(row)
    }

    pub async fn patch(
        executor: impl PgExecutor<'_>,
        id: MatchId,
        patch: &MatchPatch,
    ) -> Result<Option<Match>> {
        let row = sqlx::query_as::<_, MatchRow>(
            "UPDATE matches
                    SET status = COALESCE($2, status),
                        score_a = COALESCE($3, score_a),
                        score_b = COALESCE($4, score_b),
                        thread_id = COALESCE($5, thread_id),
                        updated_at = $6
                    WHERE id = $1
                    RETURNING *",
        )
        .bind(id)
        .bind(patch.status.map(|s| s.to_string()))
        .bind(patch.score_a)
        .bind(patch.score_b)
        .bind(&patch.thread_id)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(executor)
        .await?;
        convert(row)
    }
}
