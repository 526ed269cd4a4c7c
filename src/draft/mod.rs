//! Map draft: the turn tables, validation of submitted actions, and
//! projections of a recorded history onto the maps that will be played.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{DraftAction, DraftChoice, Map, MapId, Match, Side, Team, TeamId};

pub mod recorder;
pub mod sequencer;

pub use recorder::{current_step, record_action};
pub use sequencer::{next_step, turn_table, DraftState, NextStep};

/// Maps already banned, picked or taken as decider.
pub fn used_maps(history: &[DraftAction]) -> HashSet<MapId> {
    history.iter().filter_map(|a| a.choice.map()).collect()
}

/// Enabled maps still available, in pool order.
pub fn remaining_maps<'a>(pool: &'a [Map], history: &[DraftAction]) -> Vec<&'a Map> {
    let used = used_maps(history);
    pool.iter()
        .filter(|m| m.enabled && !used.contains(&m.id))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMap {
    pub map_id: MapId,
    /// `None` for the decider.
    pub picked_by: Option<TeamId>,
    pub start_attack: Option<TeamId>,
    pub start_defense: Option<TeamId>,
}

impl SeriesMap {
    fn assign_sides(&mut self, m: &Match, chooser: TeamId, side: Side) {
        let other = m.opponent_of(chooser);
        let (attack, defense) = match side {
            Side::Attack => (Some(chooser), other),
            Side::Defense => (other, Some(chooser)),
        };
        self.start_attack = attack;
        self.start_defense = defense;
    }

    fn has_sides(&self) -> bool {
        self.start_attack.is_some() || self.start_defense.is_some()
    }
}

/// Maps in play order: every pick as it was made, then the decider. A side
/// choice belongs to the pick right before it; one made before any pick
/// (best-of-1) belongs to the decider.
pub fn series_maps(m: &Match, history: &[DraftAction]) -> Vec<SeriesMap> {
    let mut maps: Vec<SeriesMap> = Vec::new();
    let mut decider_side: Option<(TeamId, Side)> = None;
    for action in history {
        match action.choice {
            DraftChoice::Ban(_) => {}
            DraftChoice::Pick(map_id) => maps.push(SeriesMap {
                map_id,
                picked_by: action.team_id,
                start_attack: None,
                start_defense: None,
            }),
            DraftChoice::SideChoice(side) => {
                let Some(chooser) = action.team_id else {
                    continue;
                };
                match maps.last_mut() {
                    Some(last) if last.picked_by.is_some() && !last.has_sides() => {
                        last.assign_sides(m, chooser, side)
                    }
                    _ => decider_side = Some((chooser, side)),
                }
            }
            DraftChoice::Decider(map_id) => {
                let mut decider = SeriesMap {
                    map_id,
                    picked_by: None,
                    start_attack: None,
                    start_defense: None,
                };
                if let Some((chooser, side)) = decider_side.take() {
                    decider.assign_sides(m, chooser, side);
                }
                maps.push(decider);
            }
        }
    }
    maps
}

/// Renders the history as a diff-style block: bans as removals, picks and the
/// decider as additions.
pub fn veto_summary(history: &[DraftAction], teams: [&Team; 2], maps: &[Map]) -> String {
    if history.is_empty() {
        return String::from("This match has no veto info yet");
    }
    let team_name = |id: Option<TeamId>| {
        teams
            .iter()
            .find(|t| Some(t.id) == id)
            .map(|t| t.name.as_str())
            .unwrap_or("unknown team")
    };
    let map_name = |id: MapId| {
        maps.iter()
            .find(|m| m.id == id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| format!("map #{id}"))
    };
    let mut resp = String::from("```diff\n");
    for action in history {
        let line = match action.choice {
            DraftChoice::Ban(map) => {
                format!("- {} banned {}\n", team_name(action.team_id), map_name(map))
            }
            DraftChoice::Pick(map) => {
                format!("+ {} picked {}\n", team_name(action.team_id), map_name(map))
            }
            DraftChoice::SideChoice(side) => {
                format!("  {} chose {}\n", team_name(action.team_id), side)
            }
            DraftChoice::Decider(map) => format!("+ decider {}\n", map_name(map)),
        };
        resp.push_str(&line);
    }
    resp.push_str("```");
    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BestOf, MatchStatus};
    use time::OffsetDateTime;

    fn action(order: i32, team_id: Option<TeamId>, choice: DraftChoice) -> DraftAction {
        DraftAction {
            id: order,
            match_id: 1,
            team_id,
            sequence_order: order,
            choice,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn match_of(best_of: BestOf) -> Match {
        Match {
            id: 1,
            team_a: 1,
            team_b: 2,
            best_of,
            status: MatchStatus::DraftPhase,
            score_a: None,
            score_b: None,
            thread_id: None,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn pool() -> Vec<Map> {
        ["ASCENT", "BIND", "HAVEN", "SPLIT", "FRACTURE", "LOTUS", "PEARL"]
            .iter()
            .enumerate()
            .map(|(i, name)| Map {
                id: i as i32 + 1,
                name: name.to_string(),
                enabled: true,
                updated_at: OffsetDateTime::UNIX_EPOCH,
            })
            .collect()
    }

    #[test]
    fn remaining_excludes_used_and_disabled_maps() {
        let mut pool = pool();
        pool[6].enabled = false;
        let history = vec![
            action(1, Some(2), DraftChoice::Ban(1)),
            action(2, Some(1), DraftChoice::Pick(3)),
            action(3, Some(2), DraftChoice::SideChoice(Side::Attack)),
        ];
        let ids: Vec<_> = remaining_maps(&pool, &history).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 4, 5, 6]);
    }

    #[test]
    fn bo3_series_maps_assign_sides_to_the_pick_before() {
        let m = match_of(BestOf::Bo3);
        let history = vec![
            action(1, Some(2), DraftChoice::Ban(1)),
            action(2, Some(1), DraftChoice::Ban(2)),
            action(3, Some(1), DraftChoice::Pick(3)),
            action(4, Some(2), DraftChoice::SideChoice(Side::Defense)),
            action(5, Some(2), DraftChoice::Pick(4)),
            action(6, Some(1), DraftChoice::SideChoice(Side::Attack)),
            action(7, Some(1), DraftChoice::Ban(5)),
            action(8, Some(2), DraftChoice::Ban(6)),
            action(9, None, DraftChoice::Decider(7)),
        ];
        let series = series_maps(&m, &history);
        assert_eq!(
            series,
            vec![
                SeriesMap {
                    map_id: 3,
                    picked_by: Some(1),
                    start_attack: Some(1),
                    start_defense: Some(2),
                },
                SeriesMap {
                    map_id: 4,
                    picked_by: Some(2),
                    start_attack: Some(1),
                    start_defense: Some(2),
                },
                SeriesMap {
                    map_id: 7,
                    picked_by: None,
                    start_attack: None,
                    start_defense: None,
                },
            ]
        );
    }

    #[test]
    fn bo1_side_choice_applies_to_decider() {
        let m = match_of(BestOf::Bo1);
        let mut history: Vec<_> = (1..=6)
            .map(|i| action(i, Some(if i % 2 == 1 { 2 } else { 1 }), DraftChoice::Ban(i)))
            .collect();
        history.push(action(7, Some(2), DraftChoice::SideChoice(Side::Attack)));
        history.push(action(8, None, DraftChoice::Decider(7)));
        let series = series_maps(&m, &history);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].map_id, 7);
        assert_eq!(series[0].start_attack, Some(2));
        assert_eq!(series[0].start_defense, Some(1));
    }

    #[test]
    fn summary_lists_bans_and_picks() {
        let team = |id: TeamId, name: &str| Team {
            id,
            name: name.to_string(),
            captain: 0,
            has_first_pick: id == 1,
            thread_id: None,
            voice_channel_id: None,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let (a, b) = (team(1, "Alpha"), team(2, "Bravo"));
        let history = vec![
            action(1, Some(2), DraftChoice::Ban(1)),
            action(2, Some(1), DraftChoice::Pick(2)),
        ];
        let summary = veto_summary(&history, [&a, &b], &pool());
        assert!(summary.contains("- Bravo banned ASCENT"));
        assert!(summary.contains("+ Alpha picked BIND"));
        assert_eq!(
            veto_summary(&[], [&a, &b], &pool()),
            "This match has no veto info yet"
        );
    }
}
