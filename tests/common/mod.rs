#![allow(dead_code)]

use valorant_matchbot::map_pool::register_map;
use valorant_matchbot::models::{Map, Match, Team};
use valorant_matchbot::store::{EntityStore, MemoryStore};
use valorant_matchbot::{lifecycle, teams};

pub const MAP_NAMES: [&str; 7] = [
    "ascent", "bind", "haven", "split", "fracture", "lotus", "pearl",
];

pub struct Fixture {
    pub store: MemoryStore,
    pub team_a: Team,
    pub team_b: Team,
    pub maps: Vec<Map>,
}

/// Store with a ready pool and two teams, team A holding first pick.
pub async fn fixture() -> Fixture {
    let store = MemoryStore::new();
    for name in MAP_NAMES {
        register_map(&store, name, true).await.unwrap();
    }
    let team_a = teams::register_team(&store, "Alpha", 1001, true)
        .await
        .unwrap();
    let team_b = teams::register_team(&store, "Bravo", 2002, false)
        .await
        .unwrap();
    let maps = store.get_enabled_maps().await.unwrap();
    Fixture {
        store,
        team_a,
        team_b,
        maps,
    }
}

impl Fixture {
    pub async fn new_match(&self, best_of: i32) -> Match {
        lifecycle::create_match(&self.store, self.team_a.id, self.team_b.id, best_of)
            .await
            .unwrap()
    }

    pub fn map(&self, name: &str) -> i32 {
        let name = name.to_uppercase();
        self.maps
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.id)
            .unwrap()
    }
}
