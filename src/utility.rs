//! Fixed-width helpers used throughout the library.
//!
//! Everything here follows register semantics: values are masked to their
//! declared bit width up front, and oversized inputs truncate instead of
//! erroring.

use itertools::Itertools;
use smallvec::SmallVec;
use std::io::{self, Write};

/// Selects which end of a value nibble index 0 refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NibbleOrder {
    /// Index 0 holds the least significant nibble.
    LsbFirst,
    /// Index 0 holds the most significant nibble.
    MsbFirst,
}

/// Returns a bitmask of `n` ones. Saturates at the full 128-bit width.
pub fn mask(n: usize) -> u128 {
    if n >= 128 {
        u128::MAX
    } else {
        (1u128 << n) - 1
    }
}

/// Decomposes the low `width` nibbles of `value` into 4-bit chunks. Nibbles
/// above the width are discarded, missing ones are zero-padded.
pub fn to_nibbles(value: u128, width: usize, order: NibbleOrder) -> SmallVec<[u8; 8]> {
    let mut nibbles: SmallVec<[u8; 8]> = SmallVec::with_capacity(width);

    for i in 0..width {
        nibbles.push(((value >> (4 * i)) & 0xf) as u8);
    }

    if order == NibbleOrder::MsbFirst {
        nibbles.reverse();
    }

    nibbles
}

/// Exact inverse of `to_nibbles`. Each element is masked to 4 bits.
pub fn from_nibbles(nibbles: &[u8], order: NibbleOrder) -> u128 {
    let mut value = 0;

    match order {
        NibbleOrder::LsbFirst => {
            for (i, &nibble) in nibbles.iter().enumerate() {
                value |= u128::from(nibble & 0xf) << (4 * i);
            }
        }
        NibbleOrder::MsbFirst => {
            for &nibble in nibbles {
                value = (value << 4) | u128::from(nibble & 0xf);
            }
        }
    }

    value
}

/// Rotates `value` left by `amount` within a `width`-bit register. The input
/// is masked to `width` first and `amount` is reduced modulo `width`.
pub fn rotate_left(value: u128, amount: usize, width: usize) -> u128 {
    if width == 0 {
        return 0;
    }

    let value = value & mask(width);
    let amount = amount % width;

    if amount == 0 {
        return value;
    }

    (value.wrapping_shl(amount as u32) & mask(width)) | (value >> (width - amount))
}

/// Rotates `value` right by `amount` within a `width`-bit register.
pub fn rotate_right(value: u128, amount: usize, width: usize) -> u128 {
    if width == 0 {
        return 0;
    }

    let value = value & mask(width);
    let amount = amount % width;

    if amount == 0 {
        return value;
    }

    (value >> amount) | (value.wrapping_shl((width - amount) as u32) & mask(width))
}

/// Renders the low `width` bits of `value` as a zero-padded binary string in
/// groups of four, most significant group first, e.g. `1010|0001`. Intended
/// for console output only.
pub fn bit_string(value: u128, width: usize) -> String {
    let bits: String = (0..width)
        .rev()
        .map(|i| if (value >> i) & 1 == 1 { '1' } else { '0' })
        .collect();

    bits.as_bytes()
        .chunks(4)
        .map(|group| String::from_utf8_lossy(group))
        .join("|")
}

/// A struct representing a progress bar for progress printing on the command line.
pub struct ProgressBar {
    total_items: usize,
    current_items: usize,
    printed: usize,
}

impl ProgressBar {
    /// Creates a new progress bar for tracking progress of `num_items` steps.
    pub fn new(num_items: usize) -> ProgressBar {
        ProgressBar {
            total_items: num_items,
            current_items: 0,
            printed: 0,
        }
    }

    /// Increment the current progress of the bar. The progress bar prints if
    /// a new step was reached.
    #[inline(always)]
    pub fn increment(&mut self) {
        self.current_items += 1;

        if self.total_items == 0 {
            return;
        }

        let target = self.current_items * 100 / self.total_items;

        while self.printed < target {
            print!("=");
            io::stdout().flush().expect("Could not flush stdout");
            self.printed += 1;
        }
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        if self.printed > 0 {
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn mask_widths() {
        assert_eq!(mask(0), 0);
        assert_eq!(mask(1), 1);
        assert_eq!(mask(32), 0xffff_ffff);
        assert_eq!(mask(80), (1 << 80) - 1);
        assert_eq!(mask(128), u128::MAX);
        assert_eq!(mask(200), u128::MAX);
    }

    #[test]
    fn nibble_orders() {
        assert_eq!(
            to_nibbles(0x89ab_cdef, 8, NibbleOrder::LsbFirst).as_slice(),
            &[0xf, 0xe, 0xd, 0xc, 0xb, 0xa, 0x9, 0x8]
        );
        assert_eq!(
            to_nibbles(0x89ab_cdef, 8, NibbleOrder::MsbFirst).as_slice(),
            &[0x8, 0x9, 0xa, 0xb, 0xc, 0xd, 0xe, 0xf]
        );
        // values shorter than the width are zero padded, longer ones truncate
        assert_eq!(
            to_nibbles(0x12, 4, NibbleOrder::LsbFirst).as_slice(),
            &[0x2, 0x1, 0x0, 0x0]
        );
        assert_eq!(
            to_nibbles(0x123, 2, NibbleOrder::LsbFirst).as_slice(),
            &[0x3, 0x2]
        );
    }

    #[quickcheck]
    fn nibbles_round_trip(value: u64, msb_first: bool) -> bool {
        let order = if msb_first {
            NibbleOrder::MsbFirst
        } else {
            NibbleOrder::LsbFirst
        };

        let nibbles = to_nibbles(u128::from(value), 16, order);
        from_nibbles(&nibbles, order) == u128::from(value)
    }

    #[test]
    fn rotation_is_fixed_width() {
        assert_eq!(rotate_left(0x8000_0001, 1, 32), 0x0000_0003);
        assert_eq!(rotate_right(0x0000_0003, 1, 32), 0x8000_0001);

        // inputs wider than the register are truncated before rotating
        assert_eq!(rotate_left(0x1_0000_0001, 4, 32), 0x10);

        // rotation amounts wrap around the width
        assert_eq!(rotate_left(0xabcd, 16, 16), 0xabcd);
        assert_eq!(
            rotate_left(0xdead_beef, 40, 32),
            rotate_left(0xdead_beef, 8, 32)
        );
    }

    #[test]
    fn rotation_across_the_key_register() {
        // 80-bit rotation as used by the key schedule
        assert_eq!(rotate_left(1, 29, 80), 1 << 29);
        assert_eq!(rotate_left(1 << 60, 29, 80), 1 << 9);
        assert_eq!(rotate_right(1 << 9, 29, 80), 1 << 60);
    }

    #[quickcheck]
    fn rotations_invert(value: u128, amount: usize, width_seed: u8) -> bool {
        let width = 1 + usize::from(width_seed) % 128;
        let rotated = rotate_left(value, amount, width);

        rotate_right(rotated, amount, width) == value & mask(width)
    }

    #[test]
    fn bit_string_groups() {
        assert_eq!(bit_string(0b1010_0001, 8), "1010|0001");
        assert_eq!(bit_string(0, 8), "0000|0000");
        assert_eq!(
            bit_string(0x0f0f_0000, 32),
            "0000|1111|0000|1111|0000|0000|0000|0000"
        );
    }
}
