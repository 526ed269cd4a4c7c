use sqlx::PgExecutor;
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::models::{Map, MapId};

use super::is_unique_violation;

impl Map {
    pub async fn get_all(executor: impl PgExecutor<'_>, only_enabled: bool) -> Result<Vec<Map>> {
        if only_enabled {
            Ok(
                sqlx::query_as::<_, Map>("SELECT * FROM maps WHERE enabled ORDER BY id")
                    .fetch_all(executor)
                    .await?,
            )
        } else {
            Ok(sqlx::query_as::<_, Map>("SELECT * FROM maps ORDER BY id")
                .fetch_all(executor)
                .await?)
        }
    }

    pub async fn get_by_name(executor: impl PgExecutor<'_>, name: &str) -> Result<Option<Map>> {
        Ok(
            sqlx::query_as::<_, Map>("SELECT * FROM maps WHERE name = $1")
                .bind(name)
                .fetch_optional(executor)
                .await?,
        )
    }

    pub async fn create(executor: impl PgExecutor<'_>, name: &str, enabled: bool) -> Result<MapId> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO maps (name, enabled, updated_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(name)
        .bind(enabled)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(executor)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                Error::DuplicateMap(name.to_string())
            } else {
                Error::Database(err)
            }
        })
    }
}
