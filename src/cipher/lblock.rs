//! Implementation of LBlock.

use crate::cipher::{BlockState, Mode};
use crate::error::{Error, Result};
use crate::trail::{ActiveSboxVector, RoundTrace};
use crate::utility::{from_nibbles, mask, rotate_left, rotate_right, to_nibbles, NibbleOrder};
use lazy_static::lazy_static;
use smallvec::{smallvec, SmallVec};

/// Block size in bits.
pub const BLOCK_SIZE: usize = 64;
/// Key size in bits.
pub const KEY_SIZE: usize = 80;
/// Number of rounds.
pub const ROUNDS: usize = 32;

/// Width of one Feistel branch in bits.
const HALF_SIZE: usize = 32;

/// Nibble permutation of the round function as a destination-index table:
/// nibble `i` of the S-box layer output moves to position `PERMUTATION[i]`.
const PERMUTATION: [usize; 8] = [2, 0, 3, 1, 6, 4, 7, 5];

lazy_static! {
    /// Inverse of `PERMUTATION`, derived once from the forward table.
    static ref IPERMUTATION: [usize; 8] = invert_permutation(&PERMUTATION);
}

fn invert_permutation(table: &[usize; 8]) -> [usize; 8] {
    let mut inverse = [0; 8];

    for (i, &j) in table.iter().enumerate() {
        inverse[j] = i;
    }

    inverse
}

fn permute(nibbles: &[u8], table: &[usize; 8]) -> SmallVec<[u8; 8]> {
    let mut output: SmallVec<[u8; 8]> = smallvec![0; 8];

    for (i, &nibble) in nibbles.iter().enumerate() {
        output[table[i]] = nibble;
    }

    output
}

/// The round function F. Splits the keyed branch into eight nibbles, sends
/// nibble `i` through S-box `i`, permutes, and recomposes. The second return
/// value marks the S-boxes with non-zero output, which under
/// `Mode::Differential` is exactly the set of active S-boxes.
pub(crate) fn round_function(x: u32, mode: Mode) -> (u32, ActiveSboxVector) {
    let nibbles = to_nibbles(u128::from(x), 8, NibbleOrder::LsbFirst);
    let mut substituted: SmallVec<[u8; 8]> = SmallVec::with_capacity(8);
    let mut active = ActiveSboxVector::with_capacity(8);

    for (i, &nibble) in nibbles.iter().enumerate() {
        let output = mode.substitute(i, nibble);
        active.push(u8::from(output != 0));
        substituted.push(output);
    }

    let permuted = permute(&substituted, &PERMUTATION);

    (from_nibbles(&permuted, NibbleOrder::LsbFirst) as u32, active)
}

/// Extends a differential trail one round backwards without key knowledge.
///
/// `current` is the branch difference entering a round and `previous` the
/// known difference one round earlier. The nibble permutation is undone on
/// `current` and the result folded nibble-wise into `previous` by OR; every
/// non-zero nibble of the fold marks an active S-box. Returns the extended
/// difference together with the activity vector.
pub fn reverse_round(current: u32, previous: u32) -> (u32, ActiveSboxVector) {
    let current_nibbles = to_nibbles(u128::from(current), 8, NibbleOrder::LsbFirst);
    let unpermuted = permute(&current_nibbles, &IPERMUTATION);
    let previous_nibbles = to_nibbles(u128::from(previous), 8, NibbleOrder::LsbFirst);

    let mut extended: SmallVec<[u8; 8]> = SmallVec::with_capacity(8);
    let mut active = ActiveSboxVector::with_capacity(8);

    for (&output, &earlier) in unpermuted.iter().zip(previous_nibbles.iter()) {
        let nibble = output | earlier;
        active.push(u8::from(nibble != 0));
        extended.push(nibble);
    }

    (from_nibbles(&extended, NibbleOrder::LsbFirst) as u32, active)
}

/// Derives the 32 round keys from an 80-bit key, which is masked to
/// `KEY_SIZE` bits on entry.
///
/// Under `Mode::Real` this is the published schedule. Under
/// `Mode::Differential` the argument is a key difference: the two schedule
/// S-boxes saturate, and the round counter is omitted since it contributes
/// no difference.
pub fn key_schedule(key: u128, mode: Mode) -> [u32; ROUNDS] {
    let mut register = key & mask(KEY_SIZE);
    let mut round_keys = [0; ROUNDS];
    round_keys[0] = (register >> (KEY_SIZE - HALF_SIZE)) as u32;

    for (round, round_key) in round_keys.iter_mut().enumerate().skip(1) {
        register = rotate_left(register, 29, KEY_SIZE);

        // Substitute the two topmost nibbles of the register
        let top = mode.substitute(9, (register >> 76) as u8);
        let next = mode.substitute(8, ((register >> 72) & 0xf) as u8);
        register = (register & mask(72)) | (u128::from(top) << 76) | (u128::from(next) << 72);

        if mode == Mode::Real {
            register ^= (round as u128) << 46;
        }

        *round_key = (register >> (KEY_SIZE - HALF_SIZE)) as u32;
    }

    round_keys
}

pub(crate) fn check_range(min_round: usize, max_round: usize, rounds: usize) -> Result<()> {
    if min_round > max_round || max_round >= rounds {
        return Err(Error::InvalidRange {
            min: min_round,
            max: max_round,
        });
    }

    Ok(())
}

fn run_forward(
    mut state: BlockState,
    round_keys: &[u32],
    mode: Mode,
    min_round: usize,
    max_round: usize,
    mut trace: Option<&mut RoundTrace>,
) -> BlockState {
    for round in min_round..=max_round {
        if let Some(trace) = trace.as_mut() {
            trace.inner_states.push(state.x0);
        }

        let keyed = mode.combine(state.x1, round_keys[round]);
        let (output, active) = round_function(keyed, mode);

        if let Some(trace) = trace.as_mut() {
            trace.trail.record(round, active);
        }

        let rolled = rotate_left(u128::from(state.x0), 8, HALF_SIZE) as u32;
        state = BlockState {
            x0: state.x1,
            x1: mode.combine(output, rolled),
        };
    }

    if let Some(trace) = trace {
        trace.inner_states.push(state.x0);
        trace.inner_states.push(state.x1);
    }

    state
}

fn run_backward(
    mut state: BlockState,
    round_keys: &[u32],
    mode: Mode,
    min_round: usize,
    max_round: usize,
    mut trace: Option<&mut RoundTrace>,
) -> BlockState {
    for round in (min_round..=max_round).rev() {
        if let Some(trace) = trace.as_mut() {
            trace.inner_states.push(state.x1);
        }

        let keyed = mode.combine(state.x0, round_keys[round]);
        let (output, active) = round_function(keyed, mode);

        if let Some(trace) = trace.as_mut() {
            trace.trail.record(round, active);
        }

        let folded = mode.combine(output, state.x1);
        state = BlockState {
            x0: rotate_right(u128::from(folded), 8, HALF_SIZE) as u32,
            x1: state.x0,
        };
    }

    if let Some(trace) = trace {
        trace.inner_states.push(state.x1);
        trace.inner_states.push(state.x0);
    }

    state
}

/// Runs rounds `min_round..=max_round` of the Feistel network forwards.
/// `round_keys` must cover the requested range. Under `Mode::Differential`
/// the state and keys are read as difference values.
pub fn run_round_range(
    state: BlockState,
    round_keys: &[u32],
    mode: Mode,
    min_round: usize,
    max_round: usize,
) -> Result<BlockState> {
    check_range(min_round, max_round, round_keys.len())?;

    Ok(run_forward(state, round_keys, mode, min_round, max_round, None))
}

/// Like `run_round_range`, but also returns the inner branch states and the
/// activity trail of the covered rounds.
pub fn run_round_range_traced(
    state: BlockState,
    round_keys: &[u32],
    mode: Mode,
    min_round: usize,
    max_round: usize,
) -> Result<(BlockState, RoundTrace)> {
    check_range(min_round, max_round, round_keys.len())?;

    let mut trace = RoundTrace::new();
    let state = run_forward(
        state,
        round_keys,
        mode,
        min_round,
        max_round,
        Some(&mut trace),
    );

    Ok((state, trace))
}

/// Undoes rounds `min_round..=max_round`, unwinding them in descending
/// order. Inverse of `run_round_range` over the same range and keys.
pub fn invert_round_range(
    state: BlockState,
    round_keys: &[u32],
    mode: Mode,
    min_round: usize,
    max_round: usize,
) -> Result<BlockState> {
    check_range(min_round, max_round, round_keys.len())?;

    Ok(run_backward(state, round_keys, mode, min_round, max_round, None))
}

/// Like `invert_round_range`, but also returns the trace. The trace is
/// reordered to ascending rounds, so it lines up with the forward variant.
pub fn invert_round_range_traced(
    state: BlockState,
    round_keys: &[u32],
    mode: Mode,
    min_round: usize,
    max_round: usize,
) -> Result<(BlockState, RoundTrace)> {
    check_range(min_round, max_round, round_keys.len())?;

    let mut trace = RoundTrace::new();
    let state = run_backward(
        state,
        round_keys,
        mode,
        min_round,
        max_round,
        Some(&mut trace),
    );

    trace.inner_states.reverse();
    trace.trail.sort_ascending();

    Ok((state, trace))
}

/// Encrypts one 64-bit block under an 80-bit key.
pub fn encrypt_block(plaintext: u64, key: u128) -> u64 {
    let round_keys = key_schedule(key, Mode::Real);
    let state = run_forward(
        BlockState::from_plaintext(plaintext),
        &round_keys,
        Mode::Real,
        0,
        ROUNDS - 1,
        None,
    );

    state.to_ciphertext()
}

/// Decrypts one 64-bit block under an 80-bit key.
pub fn decrypt_block(ciphertext: u64, key: u128) -> u64 {
    let round_keys = key_schedule(key, Mode::Real);
    let state = run_backward(
        BlockState::from_ciphertext(ciphertext),
        &round_keys,
        Mode::Real,
        0,
        ROUNDS - 1,
        None,
    );

    state.to_plaintext()
}
