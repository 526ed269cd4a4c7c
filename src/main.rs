use anyhow::{Context, Result};
use valorant_matchbot::config::Config;
use valorant_matchbot::draft::{self, DraftState};
use valorant_matchbot::{lifecycle, map_pool};
use valorant_matchbot::models::{MatchStatus, MAP_POOL_SIZE};
use valorant_matchbot::store::{EntityStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let store = PgStore::connect(&config.database.url, config.database.max_connections)
        .await
        .context("Could not connect to the database")?;
    if config.database.run_migrations {
        store.migrate().await.context("Could not run migrations")?;
        log::info!("Migrations applied");
    }

    let maps = store.get_maps().await?;
    let enabled: Vec<&str> = maps
        .iter()
        .filter(|m| m.enabled)
        .map(|m| m.name.as_str())
        .collect();
    if map_pool::is_pool_ready(&store).await? {
        log::info!(
            "Map pool ready: {} ({} registered)",
            enabled.join(", "),
            maps.len()
        );
    } else {
        log::warn!(
            "Map pool not ready: {} of {} maps enabled, new matches cannot be created",
            enabled.len(),
            MAP_POOL_SIZE
        );
    }

    for m in store.get_matches_by_status(MatchStatus::DraftPhase).await? {
        match draft::current_step(&store, m.id).await {
            Ok(DraftState::Next(step)) => log::info!(
                "Match {} ({}): waiting on team {} to {} (step {})",
                m.id,
                m.best_of,
                step.acting_team,
                step.kind,
                step.sequence_order
            ),
            Ok(DraftState::Complete) => {
                log::warn!("Match {}: draft complete but still in draft phase", m.id);
                match lifecycle::after_action(&store, m.id).await {
                    Ok(m) => log::info!("Match {} moved to {}", m.id, m.status),
                    Err(err) => log::error!("Match {}: {:#}", m.id, err),
                }
            }
            Err(err) => log::error!("Match {}: {:#}", m.id, err),
        }
    }
    Ok(())
}
