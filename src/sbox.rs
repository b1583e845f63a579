//! Type representing an S-box.

use crate::error::{Error, Result};
use lazy_static::lazy_static;

/// A structure that represents a bijective S-box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sbox {
    size: usize,
    table: Vec<u8>,
}

impl Sbox {
    /// Creates a new S-box from its table description. `size` is the bit size
    /// of the S-box. Fails if the table length does not match the size or if
    /// the table is not a permutation of its input domain.
    pub fn new(size: usize, table: Vec<u8>) -> Result<Sbox> {
        if size == 0 || size > 8 || table.len() != 1 << size {
            return Err(Error::MalformedSbox { size });
        }

        let mut sorted = table.clone();
        sorted.sort_unstable();

        if sorted.iter().enumerate().any(|(i, &v)| i != usize::from(v)) {
            return Err(Error::MalformedSbox { size });
        }

        Ok(Sbox { size, table })
    }

    /// Applies the S-box to the input. Inputs wider than the S-box size are
    /// masked down first.
    pub fn apply(&self, x: u8) -> u8 {
        self.table[usize::from(x) & (self.table.len() - 1)]
    }

    /// Returns the size of the S-box in bits.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Collapses a 4-bit difference value to the coarse difference domain:
/// zero stays zero, any non-zero value saturates to `0xf`.
pub fn saturate(x: u8) -> u8 {
    if x == 0 {
        0
    } else {
        0xf
    }
}

lazy_static! {
    /// The ten 4-bit S-boxes of LBlock. `SBOXES[i]` is applied to nibble `i`
    /// of the round function input for `i < 8`; `SBOXES[8]` and `SBOXES[9]`
    /// are reserved for the key schedule.
    pub static ref SBOXES: [Sbox; 10] = [
        Sbox::new(4, vec![14, 9, 15, 0, 13, 4, 10, 11, 1, 2, 8, 3, 7, 6, 12, 5])
            .expect("s0 table is a bijection"),
        Sbox::new(4, vec![4, 11, 14, 9, 15, 13, 0, 10, 7, 12, 5, 6, 2, 8, 1, 3])
            .expect("s1 table is a bijection"),
        Sbox::new(4, vec![1, 14, 7, 12, 15, 13, 0, 6, 11, 5, 9, 3, 2, 4, 8, 10])
            .expect("s2 table is a bijection"),
        Sbox::new(4, vec![7, 6, 8, 11, 0, 15, 3, 14, 9, 10, 12, 13, 5, 2, 4, 1])
            .expect("s3 table is a bijection"),
        Sbox::new(4, vec![14, 5, 15, 0, 7, 2, 12, 13, 1, 8, 4, 9, 11, 10, 6, 3])
            .expect("s4 table is a bijection"),
        Sbox::new(4, vec![2, 13, 11, 12, 15, 14, 0, 9, 7, 10, 6, 3, 1, 8, 4, 5])
            .expect("s5 table is a bijection"),
        Sbox::new(4, vec![11, 9, 4, 14, 0, 15, 10, 13, 6, 12, 5, 7, 3, 8, 1, 2])
            .expect("s6 table is a bijection"),
        Sbox::new(4, vec![13, 10, 15, 0, 14, 4, 9, 11, 2, 1, 8, 3, 7, 5, 12, 6])
            .expect("s7 table is a bijection"),
        Sbox::new(4, vec![8, 7, 14, 5, 15, 13, 0, 6, 11, 12, 9, 10, 2, 4, 1, 3])
            .expect("s8 table is a bijection"),
        Sbox::new(4, vec![11, 5, 15, 0, 7, 2, 9, 13, 4, 8, 1, 12, 14, 10, 3, 6])
            .expect("s9 table is a bijection"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_tables_are_bijections() {
        for sbox in SBOXES.iter() {
            assert_eq!(sbox.size(), 4);

            let mut image: Vec<u8> = (0..16).map(|x| sbox.apply(x)).collect();
            image.sort_unstable();
            let expected: Vec<u8> = (0..16).collect();
            assert_eq!(image, expected);
        }
    }

    #[test]
    fn known_entries() {
        assert_eq!(SBOXES[0].apply(0), 14);
        assert_eq!(SBOXES[0].apply(15), 5);
        assert_eq!(SBOXES[7].apply(0), 13);
        assert_eq!(SBOXES[8].apply(1), 7);
        assert_eq!(SBOXES[9].apply(0xc), 14);
    }

    #[test]
    fn apply_masks_wide_inputs() {
        assert_eq!(SBOXES[0].apply(0x10), SBOXES[0].apply(0));
        assert_eq!(SBOXES[0].apply(0xff), SBOXES[0].apply(0xf));
    }

    #[test]
    fn rejects_malformed_tables() {
        // wrong length
        assert_eq!(
            Sbox::new(4, vec![0, 1, 2, 3]),
            Err(Error::MalformedSbox { size: 4 })
        );
        // not a bijection
        assert_eq!(
            Sbox::new(2, vec![0, 0, 1, 2]),
            Err(Error::MalformedSbox { size: 2 })
        );
        // out of range entries
        assert_eq!(
            Sbox::new(2, vec![0, 1, 2, 4]),
            Err(Error::MalformedSbox { size: 2 })
        );
        // degenerate sizes
        assert_eq!(Sbox::new(0, vec![0]), Err(Error::MalformedSbox { size: 0 }));
        assert!(Sbox::new(9, (0..=255).collect()).is_err());
    }

    #[test]
    fn saturation_collapses_nonzero() {
        assert_eq!(saturate(0), 0);

        for x in 1..16 {
            assert_eq!(saturate(x), 0xf);
        }
    }
}
