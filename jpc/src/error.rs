//! Errors raised by the wavelet engine.
//!
//! The transforms themselves only fail when the scratch line cannot be allocated. The remaining
//! variants are reported by [`crate::tile::TileComponent::new`] while checking a caller supplied
//! resolution pyramid; the transforms assume that check has already happened.

use std::error;
use std::fmt;

/// Error values that may be returned from DWT functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DwtError {
    /// Allocation failure.
    ///
    /// The scratch line (or a tile buffer) of the given number of samples could not be reserved.
    OutOfMemory(usize),

    /// Buffer size mismatch.
    ///
    /// The coefficient buffer does not hold `width * height` samples.
    BufferSizeMismatch { expected: usize, actual: usize },

    /// No resolutions.
    ///
    /// A tile component needs at least one resolution level.
    NoResolutions,

    /// Resolution mismatch.
    ///
    /// The finest resolution level must cover exactly the tile-component rectangle.
    ResolutionMismatch,

    /// Invalid resolution.
    ///
    /// The level is either smaller than the level below it, or its extent cannot be split into
    /// the low-pass / high-pass counts the coarser level implies.
    InvalidResolution { level: usize },
}

impl error::Error for DwtError {}
impl fmt::Display for DwtError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::OutOfMemory(length) => {
                write!(f, "unable to allocate {} samples", length)
            }
            Self::BufferSizeMismatch { expected, actual } => {
                write!(
                    f,
                    "coefficient buffer holds {} samples, expected {}",
                    actual, expected
                )
            }
            Self::NoResolutions => {
                write!(f, "tile component has no resolution levels")
            }
            Self::ResolutionMismatch => {
                write!(
                    f,
                    "finest resolution does not match the tile-component rectangle"
                )
            }
            Self::InvalidResolution { level } => {
                write!(
                    f,
                    "resolution level {} is inconsistent with level {}",
                    level,
                    level.saturating_sub(1)
                )
            }
        }
    }
}

/// Allocate a zero-initialised `Vec`, turning allocation failure into [`DwtError::OutOfMemory`].
macro_rules! try_vec {
    ($elem:expr; $n:expr) => {{
        let n: usize = $n;
        let mut v = Vec::new();
        v.try_reserve_exact(n)
            .map_err(|_| $crate::error::DwtError::OutOfMemory(n))?;
        v.resize(n, $elem);
        v
    }};
}

pub(crate) use try_vec;
