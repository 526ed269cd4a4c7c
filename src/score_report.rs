//! Two-captain score confirmation. A match score is only submitted once both
//! captains have reported the same result within the confirmation window.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::draft::recorder::load_match;
use crate::error::{Error, Result};
use crate::lifecycle::submit_score;
use crate::models::{Match, MatchId};
use crate::store::EntityStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreReport {
    /// First report, waiting on the other captain.
    Pending,
    /// The same captain reported again and replaced their score.
    Updated,
    /// The other captain disagreed; their score is now the pending one.
    Mismatch,
    Confirmed(Match),
}

#[derive(Debug)]
struct PendingScore {
    reporter: i64,
    score: (i32, i32),
    reported_at: Instant,
}

#[derive(Debug)]
pub struct ScoreReports {
    ttl: Duration,
    pending: Mutex<HashMap<MatchId, PendingScore>>,
}

impl Default for ScoreReports {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

impl ScoreReports {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Records a captain's report for `match_id`. Reports older than the
    /// window are dropped before the new one is compared.
    pub async fn report<S: EntityStore + ?Sized>(
        &self,
        store: &S,
        match_id: MatchId,
        reporter: i64,
        score_a: i32,
        score_b: i32,
    ) -> Result<ScoreReport> {
        if score_a < 0 || score_b < 0 {
            return Err(Error::InvalidScore(score_a, score_b));
        }
        let (_, team_a, team_b) = load_match(store, match_id).await?;
        if reporter != team_a.captain && reporter != team_b.captain {
            return Err(Error::NotCaptain {
                match_id,
                member: reporter,
            });
        }

        let mut pending = self.pending.lock().await;
        if pending
            .get(&match_id)
            .map_or(false, |p| p.reported_at.elapsed() >= self.ttl)
        {
            log::info!("Match {}: pending score expired", match_id);
            pending.remove(&match_id);
        }

        let score = (score_a, score_b);
        let previous = pending.get(&match_id).map(|p| (p.reporter, p.score));
        let outcome = match previous {
            None => ScoreReport::Pending,
            Some((by, _)) if by == reporter => ScoreReport::Updated,
            Some((_, agreed)) if agreed == score => {
                let m = submit_score(store, match_id, score_a, score_b).await?;
                pending.remove(&match_id);
                log::info!(
                    "Match {}: both captains confirmed {}-{}",
                    match_id,
                    score_a,
                    score_b
                );
                return Ok(ScoreReport::Confirmed(m));
            }
            Some(_) => ScoreReport::Mismatch,
        };
        pending.insert(
            match_id,
            PendingScore {
                reporter,
                score,
                reported_at: Instant::now(),
            },
        );
        log::info!(
            "Match {}: captain {} reported {}-{} ({:?})",
            match_id,
            reporter,
            score_a,
            score_b,
            outcome
        );
        Ok(outcome)
    }
}
