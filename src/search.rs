//! Exhaustive ranking of four-bit key differences.

use crate::cipher::lblock::{check_range, key_schedule, run_round_range_traced, KEY_SIZE, ROUNDS};
use crate::cipher::{BlockState, Mode};
use crate::error::Result;
use crate::trail::Trail;
use crate::utility::ProgressBar;
use crossbeam_utils::thread;
use lazy_static::lazy_static;
use std::sync::mpsc;

// The number of threads used for parallel calls is fixed
lazy_static! {
    static ref THREADS: usize = num_cpus::get();
}

/// Number of candidate key differences: one four-bit window at every bit
/// offset of the 80-bit key.
pub const NUM_CANDIDATES: usize = KEY_SIZE - 4 + 1;

/// One evaluated key difference: a contiguous four-bit pattern placed at bit
/// `position` of the key, the differential subkey sequence it expands to,
/// and the trail it produced over the evaluated rounds.
#[derive(Clone, Debug)]
pub struct KeyDifferenceCandidate {
    pub position: usize,
    pub key_difference: u128,
    pub round_key_differences: [u32; ROUNDS],
    pub trail: Trail,
    pub weight: usize,
}

fn evaluate_candidate(
    input_difference: u64,
    position: usize,
    min_round: usize,
    max_round: usize,
) -> Result<KeyDifferenceCandidate> {
    let key_difference = 0xfu128 << position;
    let round_key_differences = key_schedule(key_difference, Mode::Differential);
    let state = BlockState::from_plaintext(input_difference);

    let (_, trace) = run_round_range_traced(
        state,
        &round_key_differences,
        Mode::Differential,
        min_round,
        max_round,
    )?;
    let weight = trace.trail.weight()?;

    Ok(KeyDifferenceCandidate {
        position,
        key_difference,
        round_key_differences,
        trail: trace.trail,
        weight,
    })
}

/// Ranks all `NUM_CANDIDATES` four-bit key differences by the weight of the
/// trail they produce when `input_difference` is propagated through rounds
/// `min_round..=max_round`.
///
/// The scan is exhaustive and split over all available cores. The returned
/// vector is sorted by ascending weight, and candidates of equal weight keep
/// their position order.
pub fn rank_key_difference_candidates(
    input_difference: u64,
    min_round: usize,
    max_round: usize,
) -> Result<Vec<KeyDifferenceCandidate>> {
    check_range(min_round, max_round, ROUNDS)?;

    let start = time::precise_time_s();
    let (result_tx, result_rx) = mpsc::channel();

    // Start scoped worker threads
    thread::scope(|scope| {
        for t in 0..*THREADS {
            let result_tx = result_tx.clone();

            scope.spawn(move |_| {
                let mut progress_bar =
                    ProgressBar::new((0..NUM_CANDIDATES).skip(t).step_by(*THREADS).len());

                // Split candidate positions between threads
                let thread_result: Result<Vec<KeyDifferenceCandidate>> = (0..NUM_CANDIDATES)
                    .skip(t)
                    .step_by(*THREADS)
                    .map(|position| {
                        let candidate =
                            evaluate_candidate(input_difference, position, min_round, max_round);

                        if t == 0 {
                            progress_bar.increment();
                        }

                        candidate
                    })
                    .collect();

                result_tx
                    .send(thread_result)
                    .expect("Thread could not send result");
            });
        }
    })
    .expect("Could not join worker threads");

    // Collect results from all threads
    let mut candidates = Vec::with_capacity(NUM_CANDIDATES);

    for _ in 0..*THREADS {
        let thread_result = result_rx.recv().expect("Main could not receive result");
        candidates.extend(thread_result?);
    }

    // Restore position order, then rank by weight. Both sorts are stable,
    // so equal weights stay in position order
    candidates.sort_by_key(|candidate| candidate.position);
    candidates.sort_by_key(|candidate| candidate.weight);

    println!(
        "\nRanked {} candidates. [{} s]",
        candidates.len(),
        time::precise_time_s() - start
    );

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use fnv::FnvHashSet;

    #[test]
    fn full_range_ranking() {
        let candidates = rank_key_difference_candidates(0, 0, 31).unwrap();
        assert_eq!(candidates.len(), NUM_CANDIDATES);

        let best: Vec<(usize, usize)> = candidates
            .iter()
            .take(5)
            .map(|candidate| (candidate.position, candidate.weight))
            .collect();
        assert_eq!(best, [(10, 208), (6, 209), (2, 211), (23, 212), (3, 214)]);
        assert_eq!(candidates.last().unwrap().weight, 236);

        // every position occurs exactly once
        let positions: FnvHashSet<usize> = candidates
            .iter()
            .map(|candidate| candidate.position)
            .collect();
        assert_eq!(positions.len(), NUM_CANDIDATES);

        // weights ascend
        assert!(candidates
            .windows(2)
            .all(|pair| pair[0].weight <= pair[1].weight));
    }

    #[test]
    fn candidate_weights_by_position() {
        let mut candidates = rank_key_difference_candidates(0, 0, 31).unwrap();
        candidates.sort_by_key(|candidate| candidate.position);

        let weights: Vec<usize> = candidates
            .iter()
            .take(11)
            .map(|candidate| candidate.weight)
            .collect();
        assert_eq!(
            weights,
            [216, 216, 211, 214, 216, 216, 209, 216, 216, 219, 208]
        );
    }

    #[test]
    fn mid_range_ranking() {
        let candidates = rank_key_difference_candidates(0, 8, 20).unwrap();
        assert_eq!(candidates.len(), NUM_CANDIDATES);

        let best: Vec<(usize, usize)> = candidates
            .iter()
            .take(5)
            .map(|candidate| (candidate.position, candidate.weight))
            .collect();
        assert_eq!(best, [(18, 56), (22, 63), (11, 64), (12, 64), (13, 64)]);
    }

    #[test]
    fn candidates_carry_their_trails() {
        let candidates = rank_key_difference_candidates(0, 8, 20).unwrap();

        for candidate in &candidates {
            assert_eq!(candidate.key_difference, 0xf << candidate.position);
            assert_eq!(candidate.trail.len(), 13);
            assert_eq!(candidate.trail.weight(), Ok(candidate.weight));
            assert_eq!(
                candidate.round_key_differences,
                key_schedule(candidate.key_difference, Mode::Differential)
            );
        }
    }

    #[test]
    fn rejects_invalid_ranges() {
        assert_eq!(
            rank_key_difference_candidates(0, 12, 8).unwrap_err(),
            Error::InvalidRange { min: 12, max: 8 }
        );
        assert_eq!(
            rank_key_difference_candidates(0, 0, 32).unwrap_err(),
            Error::InvalidRange { min: 0, max: 32 }
        );
    }
}
