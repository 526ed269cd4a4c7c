use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{ActionKind, BestOf, DraftAction, Match, Team, TeamId};

/// Which of the two teams acts, relative to the first-pick seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub seat: Seat,
    pub kind: ActionKind,
}

const fn turn(seat: Seat, kind: ActionKind) -> Turn {
    Turn { seat, kind }
}

use ActionKind::{Ban, Pick, SideChoice};
use Seat::{First, Second};

// Six bans leave a single map; the team that banned first chooses its side.
const BO1_TURNS: [Turn; 7] = [
    turn(Second, Ban),
    turn(First, Ban),
    turn(Second, Ban),
    turn(First, Ban),
    turn(Second, Ban),
    turn(First, Ban),
    turn(Second, SideChoice),
];

const BO3_TURNS: [Turn; 8] = [
    turn(Second, Ban),
    turn(First, Ban),
    turn(First, Pick),
    turn(Second, SideChoice),
    turn(Second, Pick),
    turn(First, SideChoice),
    turn(First, Ban),
    turn(Second, Ban),
];

// Two bans and four picks leave the fifth map as decider, whose side the
// first seat chooses.
const BO5_TURNS: [Turn; 11] = [
    turn(Second, Ban),
    turn(First, Ban),
    turn(First, Pick),
    turn(Second, SideChoice),
    turn(Second, Pick),
    turn(First, SideChoice),
    turn(First, Pick),
    turn(Second, SideChoice),
    turn(Second, Pick),
    turn(First, SideChoice),
    turn(First, SideChoice),
];

pub fn turn_table(best_of: BestOf) -> &'static [Turn] {
    match best_of {
        BestOf::Bo1 => &BO1_TURNS,
        BestOf::Bo3 => &BO3_TURNS,
        BestOf::Bo5 => &BO5_TURNS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextStep {
    pub acting_team: TeamId,
    pub kind: ActionKind,
    /// Order the action will be recorded under.
    pub sequence_order: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftState {
    Next(NextStep),
    Complete,
}

impl DraftState {
    pub fn is_complete(&self) -> bool {
        matches!(self, DraftState::Complete)
    }
}

/// Resolves the first-pick seat. Teams are matched to the match by id, and a
/// team that does not belong to the match is a configuration error.
pub fn seating(m: &Match, team_a: &Team, team_b: &Team) -> Result<(TeamId, TeamId)> {
    if team_a.id != m.team_a || team_b.id != m.team_b {
        return Err(Error::Configuration(format!(
            "match {} is between teams {} and {}, got {} and {}",
            m.id, m.team_a, m.team_b, team_a.id, team_b.id
        )));
    }
    if team_a.has_first_pick {
        Ok((team_a.id, team_b.id))
    } else {
        Ok((team_b.id, team_a.id))
    }
}

/// Projects the action history onto the turn table. Only the history length
/// matters, so this can be re-queried at any time without side effects.
pub fn next_step(
    m: &Match,
    team_a: &Team,
    team_b: &Team,
    history: &[DraftAction],
) -> Result<DraftState> {
    let (first, second) = seating(m, team_a, team_b)?;
    let table = turn_table(m.best_of);
    // A history longer than the table already passed completion.
    let Some(turn) = table.get(history.len()) else {
        return Ok(DraftState::Complete);
    };
    let acting_team = match turn.seat {
        Seat::First => first,
        Seat::Second => second,
    };
    Ok(DraftState::Next(NextStep {
        acting_team,
        kind: turn.kind,
        sequence_order: history.len() as i32 + 1,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DraftChoice, MatchStatus, MAP_POOL_SIZE};
    use strum::IntoEnumIterator;
    use time::OffsetDateTime;

    const A: TeamId = 10;
    const B: TeamId = 20;

    fn team(id: TeamId, has_first_pick: bool) -> Team {
        Team {
            id,
            name: format!("Team {id}"),
            captain: id as i64 * 100,
            has_first_pick,
            thread_id: None,
            voice_channel_id: None,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn match_of(best_of: BestOf) -> Match {
        Match {
            id: 1,
            team_a: A,
            team_b: B,
            best_of,
            status: MatchStatus::DraftPhase,
            score_a: None,
            score_b: None,
            thread_id: None,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn history(len: usize) -> Vec<DraftAction> {
        (0..len)
            .map(|i| DraftAction {
                id: i as i32 + 1,
                match_id: 1,
                team_id: Some(A),
                sequence_order: i as i32 + 1,
                choice: DraftChoice::Ban(i as i32 + 1),
                updated_at: OffsetDateTime::UNIX_EPOCH,
            })
            .collect()
    }

    fn expect_next(state: DraftState) -> (TeamId, ActionKind) {
        match state {
            DraftState::Next(step) => (step.acting_team, step.kind),
            DraftState::Complete => panic!("draft unexpectedly complete"),
        }
    }

    #[test]
    fn bo3_follows_reference_table_when_a_has_first_pick() {
        let m = match_of(BestOf::Bo3);
        let (a, b) = (team(A, true), team(B, false));
        let expected = [
            (B, Ban),
            (A, Ban),
            (A, Pick),
            (B, SideChoice),
            (B, Pick),
            (A, SideChoice),
            (A, Ban),
            (B, Ban),
        ];
        for (len, want) in expected.iter().enumerate() {
            let state = next_step(&m, &a, &b, &history(len)).unwrap();
            assert_eq!(expect_next(state), *want, "step {}", len + 1);
        }
        assert_eq!(
            next_step(&m, &a, &b, &history(8)).unwrap(),
            DraftState::Complete
        );
    }

    #[test]
    fn seats_swap_when_b_has_first_pick() {
        let m = match_of(BestOf::Bo3);
        let (a, b) = (team(A, false), team(B, true));
        assert_eq!(
            expect_next(next_step(&m, &a, &b, &[]).unwrap()),
            (A, Ban)
        );
        assert_eq!(
            expect_next(next_step(&m, &a, &b, &history(2)).unwrap()),
            (B, Pick)
        );
    }

    #[test]
    fn bo1_bans_down_to_one_map_then_chooses_side() {
        let m = match_of(BestOf::Bo1);
        let (a, b) = (team(A, true), team(B, false));
        for len in 0..6 {
            let (acting, kind) = expect_next(next_step(&m, &a, &b, &history(len)).unwrap());
            assert_eq!(kind, Ban);
            assert_eq!(acting, if len % 2 == 0 { B } else { A });
        }
        assert_eq!(
            expect_next(next_step(&m, &a, &b, &history(6)).unwrap()),
            (B, SideChoice)
        );
        assert!(next_step(&m, &a, &b, &history(7)).unwrap().is_complete());
    }

    #[test]
    fn bo5_picks_four_maps_with_sides() {
        let m = match_of(BestOf::Bo5);
        let (a, b) = (team(A, true), team(B, false));
        let steps: Vec<_> = (0..11)
            .map(|len| expect_next(next_step(&m, &a, &b, &history(len)).unwrap()))
            .collect();
        let picks: Vec<_> = steps
            .iter()
            .filter(|(_, kind)| *kind == Pick)
            .map(|(acting, _)| *acting)
            .collect();
        assert_eq!(picks, vec![A, B, A, B]);
        assert_eq!(steps[10], (A, SideChoice));
        assert!(next_step(&m, &a, &b, &history(11)).unwrap().is_complete());
    }

    #[test]
    fn every_table_leaves_exactly_one_map() {
        for best_of in BestOf::iter() {
            let table = turn_table(best_of);
            let consumed = table
                .iter()
                .filter(|t| matches!(t.kind, Ban | Pick))
                .count();
            assert_eq!(consumed, MAP_POOL_SIZE - 1, "{best_of}");
            let picks = table.iter().filter(|t| t.kind == Pick).count() as i32;
            assert_eq!(picks + 1, best_of.max_games(), "{best_of}");
        }
    }

    #[test]
    fn side_choice_goes_to_the_team_that_did_not_pick() {
        for best_of in BestOf::iter() {
            let table = turn_table(best_of);
            for (i, t) in table.iter().enumerate() {
                if t.kind == Pick {
                    let next = table[i + 1];
                    assert_eq!(next.kind, SideChoice);
                    assert_ne!(next.seat, t.seat);
                }
            }
        }
    }

    #[test]
    fn completion_is_monotonic_for_corrupt_histories() {
        let (a, b) = (team(A, true), team(B, false));
        for best_of in BestOf::iter() {
            let m = match_of(best_of);
            let len = turn_table(best_of).len();
            for extra in 0..4 {
                assert!(next_step(&m, &a, &b, &history(len + extra))
                    .unwrap()
                    .is_complete());
            }
        }
    }

    #[test]
    fn repeated_queries_agree() {
        let m = match_of(BestOf::Bo3);
        let (a, b) = (team(A, true), team(B, false));
        let h = history(3);
        assert_eq!(
            next_step(&m, &a, &b, &h).unwrap(),
            next_step(&m, &a, &b, &h).unwrap()
        );
    }

    #[test]
    fn sequence_order_is_one_past_history() {
        let m = match_of(BestOf::Bo3);
        let (a, b) = (team(A, true), team(B, false));
        match next_step(&m, &a, &b, &history(4)).unwrap() {
            DraftState::Next(step) => assert_eq!(step.sequence_order, 5),
            DraftState::Complete => panic!("draft unexpectedly complete"),
        }
    }

    #[test]
    fn foreign_team_is_rejected() {
        let m = match_of(BestOf::Bo3);
        let err = next_step(&m, &team(A, true), &team(99, false), &[]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
