use sqlx::{FromRow, PgExecutor};
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::models::{ActionKind, DraftAction, DraftChoice, MatchId, NewDraftAction, Side};

use super::is_unique_violation;

#[derive(Debug, FromRow)]
struct DraftActionRow {
    id: i32,
    match_id: i32,
    team_id: Option<i32>,
    kind: String,
    map_id: Option<i32>,
    side: Option<String>,
    sequence_order: i32,
    updated_at: OffsetDateTime,
}

impl TryFrom<DraftActionRow> for DraftAction {
    type Error = Error;

    fn try_from(row: DraftActionRow) -> Result<Self> {
        let kind = row
            .kind
            .parse::<ActionKind>()
            .map_err(|_| Error::Corrupt(format!("draft action {} kind '{}'", row.id, row.kind)))?;
        let side = row
            .side
            .as_deref()
            .map(|s| {
                s.parse::<Side>()
                    .map_err(|_| Error::Corrupt(format!("draft action {} side '{}'", row.id, s)))
            })
            .transpose()?;
        Ok(DraftAction {
            id: row.id,
            match_id: row.match_id,
            team_id: row.team_id,
            sequence_order: row.sequence_order,
            choice: DraftChoice::from_parts(kind, row.map_id, side)?,
            updated_at: row.updated_at,
        })
    }
}

impl DraftAction {
    pub async fn get_by_match(
        executor: impl PgExecutor<'_>,
        match_id: MatchId,
    ) -> Result<Vec<DraftAction>> {
        sqlx::query_as::<_, DraftActionRow>(
            "SELECT * FROM draft_actions WHERE match_id = $1 ORDER BY sequence_order",
        )
        .bind(match_id)
        .fetch_all(executor)
        .await?
        .into_iter()
        .map(DraftAction::try_from)
        .collect()
    }

    /// Relies on the unique (match_id, sequence_order) constraint: a second
    /// writer for the same slot loses with `ConcurrentModification`.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        action: &NewDraftAction,
    ) -> Result<DraftAction> {
        let row = sqlx::query_as::<_, DraftActionRow>(
            "INSERT INTO draft_actions
                        (match_id, team_id, kind, map_id, side, sequence_order, updated_at)
                    VALUES
                        ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING *",
        )
        .bind(action.match_id)
        .bind(action.team_id)
        .bind(action.choice.kind().to_string())
        .bind(action.choice.map())
        .bind(action.choice.side().map(|s| s.to_string()))
        .bind(action.sequence_order)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(executor)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                Error::ConcurrentModification {
                    match_id: action.match_id,
                    sequence_order: action.sequence_order,
                }
            } else {
                Error::Database(err)
            }
        })?;
        DraftAction::try_from(row)
    }
}
