use lbtrail::cipher::Mode;
use std::num::ParseIntError;
use structopt::StructOpt;

fn parse_hex_u64(input: &str) -> Result<u64, ParseIntError> {
    u64::from_str_radix(input.trim_start_matches("0x"), 16)
}

fn parse_hex_u128(input: &str) -> Result<u128, ParseIntError> {
    u128::from_str_radix(input.trim_start_matches("0x"), 16)
}

#[derive(Clone, StructOpt)]
#[structopt(
    name = "lbtrail",
    about = "LBlock encryption and differential trail analysis."
)]
pub enum LbtrailOptions {
    #[structopt(name = "encrypt")]
    Encrypt {
        #[structopt(parse(try_from_str = parse_hex_u64))]
        /**
        Plaintext block as up to 16 hex digits.
        */
        plaintext: u64,

        #[structopt(parse(try_from_str = parse_hex_u128))]
        /**
        Key as up to 20 hex digits.
        */
        key: u128,
    },

    #[structopt(name = "decrypt")]
    Decrypt {
        #[structopt(parse(try_from_str = parse_hex_u64))]
        /**
        Ciphertext block as up to 16 hex digits.
        */
        ciphertext: u64,

        #[structopt(parse(try_from_str = parse_hex_u128))]
        /**
        Key as up to 20 hex digits.
        */
        key: u128,
    },

    #[structopt(name = "keys")]
    Keys {
        #[structopt(parse(try_from_str = parse_hex_u128))]
        /**
        Key, or key difference, as up to 20 hex digits.
        */
        key: u128,

        #[structopt(short = "m", long = "mode", default_value = "real")]
        /**
        Schedule to derive. Supported modes are:
        real, differential
        */
        mode: Mode,
    },

    #[structopt(name = "trace")]
    Trace {
        #[structopt(parse(try_from_str = parse_hex_u64))]
        /**
        Input block, or block difference, as up to 16 hex digits.
        */
        input: u64,

        #[structopt(parse(try_from_str = parse_hex_u128))]
        /**
        Key, or key difference, as up to 20 hex digits.
        */
        key: u128,

        #[structopt(short = "m", long = "mode", default_value = "differential")]
        /**
        Evaluation mode. Supported modes are:
        real, differential
        */
        mode: Mode,

        #[structopt(short = "s", long = "start", default_value = "0")]
        /**
        First round of the evaluated range.
        */
        start: usize,

        #[structopt(short = "e", long = "end", default_value = "31")]
        /**
        Last round of the evaluated range, inclusive.
        */
        end: usize,
    },

    #[structopt(name = "search")]
    Search {
        #[structopt(default_value = "0", parse(try_from_str = parse_hex_u64))]
        /**
        Input block difference as up to 16 hex digits.
        */
        input: u64,

        #[structopt(short = "s", long = "start", default_value = "0")]
        /**
        First round of the evaluated range.
        */
        start: usize,

        #[structopt(short = "e", long = "end", default_value = "31")]
        /**
        Last round of the evaluated range, inclusive.
        */
        end: usize,
    },
}
