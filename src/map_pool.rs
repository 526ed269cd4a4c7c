use crate::error::{Error, Result};
use crate::models::{Map, MapId, MAP_POOL_SIZE};
use crate::store::EntityStore;

pub fn canonical_map_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// True when exactly [`MAP_POOL_SIZE`] maps are enabled.
pub async fn is_pool_ready<S: EntityStore + ?Sized>(store: &S) -> Result<bool> {
    Ok(store.get_enabled_maps().await?.len() == MAP_POOL_SIZE)
}

/// Returns the enabled pool, or `PoolNotReady` when its size is off.
pub async fn ensure_pool_ready<S: EntityStore + ?Sized>(store: &S) -> Result<Vec<Map>> {
    let enabled = store.get_enabled_maps().await?;
    if enabled.len() != MAP_POOL_SIZE {
        log::warn!(
            "Map pool has {} enabled maps, {} required",
            enabled.len(),
            MAP_POOL_SIZE
        );
        return Err(Error::PoolNotReady {
            enabled: enabled.len(),
            required: MAP_POOL_SIZE,
        });
    }
    Ok(enabled)
}

pub async fn register_map<S: EntityStore + ?Sized>(
    store: &S,
    name: &str,
    enabled: bool,
) -> Result<MapId> {
    let name = canonical_map_name(name);
    if name.is_empty() {
        return Err(Error::Configuration(String::from("map name cannot be empty")));
    }
    if store.get_map_by_name(&name).await?.is_some() {
        return Err(Error::DuplicateMap(name));
    }
    let id = store.insert_map(&name, enabled).await?;
    log::info!("Registered map {} (id {}, enabled: {})", name, id, enabled);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn names_are_trimmed_and_upper_cased() {
        assert_eq!(canonical_map_name("  ascent "), "ASCENT");
        assert_eq!(canonical_map_name("Lotus"), "LOTUS");
    }

    #[tokio::test]
    async fn pool_is_ready_only_at_seven_maps() {
        let store = MemoryStore::new();
        for name in ["ascent", "bind", "haven", "split", "fracture", "lotus"] {
            register_map(&store, name, true).await.unwrap();
        }
        assert!(!is_pool_ready(&store).await.unwrap());
        assert!(matches!(
            ensure_pool_ready(&store).await,
            Err(Error::PoolNotReady {
                enabled: 6,
                required: 7
            })
        ));

        let pearl = register_map(&store, "pearl", true).await.unwrap();
        assert!(is_pool_ready(&store).await.unwrap());

        register_map(&store, "breeze", false).await.unwrap();
        assert!(is_pool_ready(&store).await.unwrap());

        store.set_map_enabled(pearl, false).await.unwrap();
        assert!(!is_pool_ready(&store).await.unwrap());
        assert_eq!(store.get_maps().await.unwrap().len(), 8);
        assert_eq!(store.get_enabled_maps().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn duplicate_names_collide_after_normalizing() {
        let store = MemoryStore::new();
        register_map(&store, "Ascent", true).await.unwrap();
        let err = register_map(&store, "ASCENT ", true).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateMap(name) if name == "ASCENT"));
        assert!(register_map(&store, "   ", true).await.is_err());
    }
}
