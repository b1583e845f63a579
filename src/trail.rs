//! Differential trail bookkeeping.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use itertools::Itertools;
use smallvec::SmallVec;

/// Activity of the eight round function S-boxes in one round, index `i`
/// belonging to S-box `i`. Entries are 0 or 1.
pub type ActiveSboxVector = SmallVec<[u8; 8]>;

/// The active S-boxes of every evaluated round, keyed by absolute round
/// number. Iteration follows recording order until `sort_ascending` is
/// called.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    rounds: IndexMap<usize, ActiveSboxVector>,
}

impl Trail {
    pub fn new() -> Trail {
        Trail {
            rounds: IndexMap::new(),
        }
    }

    /// Records the activity vector of `round`, replacing any earlier entry
    /// for the same round.
    pub fn record(&mut self, round: usize, active: ActiveSboxVector) {
        self.rounds.insert(round, active);
    }

    /// Number of recorded rounds.
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// The activity vector recorded for `round`, if any.
    pub fn get(&self, round: usize) -> Option<&ActiveSboxVector> {
        self.rounds.get(&round)
    }

    /// Iterates over recorded rounds in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ActiveSboxVector)> + '_ {
        self.rounds.iter().map(|(&round, active)| (round, active))
    }

    /// Restores ascending round order after out-of-order recording.
    pub fn sort_ascending(&mut self) {
        self.rounds.sort_keys();
    }

    /// Total number of active S-boxes over all recorded rounds. Fails with
    /// `EmptyTrail` when no round has been recorded.
    pub fn weight(&self) -> Result<usize> {
        if self.rounds.is_empty() {
            return Err(Error::EmptyTrail);
        }

        Ok(self
            .rounds
            .values()
            .map(|active| active.iter().filter(|&&bit| bit != 0).count())
            .sum())
    }

    /// Renders one line per recorded round in storage order, e.g.
    /// ` 8: 0|0|0|0|1|1|0|0`. Fails with `EmptyTrail` on an empty trail.
    pub fn report(&self) -> Result<String> {
        if self.rounds.is_empty() {
            return Err(Error::EmptyTrail);
        }

        let mut out = String::new();

        for (round, active) in self.iter() {
            out.push_str(&format!("{:2}: {}\n", round, active.iter().join("|")));
        }

        Ok(out)
    }
}

/// Everything observed while running a round range: the branch values in
/// round order (the low branch entering each round, then the final pair)
/// plus the activity trail.
#[derive(Clone, Debug, Default)]
pub struct RoundTrace {
    pub inner_states: Vec<u32>,
    pub trail: Trail,
}

impl RoundTrace {
    pub fn new() -> RoundTrace {
        RoundTrace::default()
    }
}
