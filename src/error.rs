//! Error conditions reported by the analysis engine.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// All failures are synchronous and non-retryable; the engine is
/// deterministic, so a rejected call fails the same way every time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A round range where `min` exceeds `max`, or one that is not covered
    /// by the supplied subkey sequence.
    InvalidRange { min: usize, max: usize },
    /// Weight or report queried on a trail with no recorded rounds.
    EmptyTrail,
    /// A substitution table that is not a bijection on its domain.
    MalformedSbox { size: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidRange { min, max } => {
                write!(f, "invalid round range [{}, {}]", min, max)
            }
            Error::EmptyTrail => write!(f, "trail has no recorded rounds"),
            Error::MalformedSbox { size } => {
                write!(f, "{}-bit substitution table is not a bijection", size)
            }
        }
    }
}

impl std::error::Error for Error {}
