mod options;

use crate::options::LbtrailOptions;
use fnv::FnvHashMap;
use lbtrail::cipher::lblock::{
    decrypt_block, encrypt_block, key_schedule, run_round_range_traced,
};
use lbtrail::cipher::BlockState;
use lbtrail::error::Result;
use lbtrail::search::rank_key_difference_candidates;
use lbtrail::utility::bit_string;
use std::process;
use structopt::StructOpt;

fn main() {
    if let Err(error) = run(LbtrailOptions::from_args()) {
        eprintln!("Error: {}", error);
        process::exit(1);
    }
}

fn run(options: LbtrailOptions) -> Result<()> {
    match options {
        LbtrailOptions::Encrypt { plaintext, key } => {
            println!("{:016x}", encrypt_block(plaintext, key));
        }
        LbtrailOptions::Decrypt { ciphertext, key } => {
            println!("{:016x}", decrypt_block(ciphertext, key));
        }
        LbtrailOptions::Keys { key, mode } => {
            let round_keys = key_schedule(key, mode);

            for (round, round_key) in round_keys.iter().enumerate() {
                println!("{:2}: {}", round, bit_string(u128::from(*round_key), 32));
            }
        }
        LbtrailOptions::Trace {
            input,
            key,
            mode,
            start,
            end,
        } => {
            let round_keys = key_schedule(key, mode);
            let state = BlockState::from_plaintext(input);
            let (_, trace) = run_round_range_traced(state, &round_keys, mode, start, end)?;

            // The first row belongs to the round before the range
            for (offset, inner) in trace.inner_states.iter().enumerate() {
                let round = start as isize + offset as isize - 1;
                println!("{:2}: {}", round, bit_string(u128::from(*inner), 32));
            }

            println!();
            print!("{}", trace.trail.report()?);
            println!("\nTrail weight: {}", trace.trail.weight()?);
        }
        LbtrailOptions::Search { input, start, end } => {
            let candidates = rank_key_difference_candidates(input, start, end)?;

            println!("\nBest candidates:");

            for candidate in candidates.iter().take(10) {
                println!(
                    "position {:2}, weight {:3}, key difference {:020x}",
                    candidate.position, candidate.weight, candidate.key_difference
                );
            }

            let mut histogram: FnvHashMap<usize, usize> = FnvHashMap::default();

            for candidate in &candidates {
                *histogram.entry(candidate.weight).or_insert(0) += 1;
            }

            let mut weights: Vec<(usize, usize)> = histogram.into_iter().collect();
            weights.sort_unstable();

            println!("\nWeight distribution:");

            for (weight, count) in weights {
                println!("{:3}: {}", weight, count);
            }
        }
    }

    Ok(())
}
