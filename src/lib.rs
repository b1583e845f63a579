//! Implementation of the LBlock block cipher together with a coarse
//! differential evaluation mode: the same Feistel network run over
//! difference values, tracing active S-boxes and ranking candidate key
//! differences by the weight of the trails they produce.

pub mod cipher;
pub mod error;
pub mod search;
pub mod sbox;
pub mod trail;
pub mod utility;

pub use crate::cipher::lblock::{
    decrypt_block, encrypt_block, invert_round_range, invert_round_range_traced, key_schedule,
    reverse_round, run_round_range, run_round_range_traced, BLOCK_SIZE, KEY_SIZE, ROUNDS,
};
pub use crate::cipher::{BlockState, Mode};
pub use crate::error::{Error, Result};
pub use crate::search::{rank_key_difference_candidates, KeyDifferenceCandidate, NUM_CANDIDATES};
pub use crate::trail::{ActiveSboxVector, RoundTrace, Trail};
