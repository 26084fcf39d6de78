//! Tile-component wavelet engine for JPEG 2000 codestreams.
//!
//! The crate turns the samples of one tile component into the sub-band pyramid an entropy coder
//! expects, and back, using either the reversible 5-3 or the irreversible 9-7 lifting filter
//! (Annex F of ITU-T T.800). The 9-7 path runs in 13-bit fixed point. It also computes the
//! explicit quantization stepsizes of the sub-bands and exposes the gain and norm tables rate
//! control needs.
//!
//! ```
//! use jpc::{dwt, FilterType, Resolution, TileComponent};
//!
//! let rect = Resolution::new(0, 0, 8, 4);
//! let samples: Vec<i32> = (0..32).collect();
//! let mut tilec = TileComponent::with_levels(rect, samples.clone(), 3)?;
//! dwt::forward(&mut tilec, FilterType::Reversible53)?;
//! dwt::inverse(&mut tilec, 0, FilterType::Reversible53)?;
//! assert_eq!(tilec.data(), samples.as_slice());
//! # Ok::<(), jpc::DwtError>(())
//! ```

pub mod dwt;
pub mod error;
pub mod fixed;
pub mod params;
pub mod quantization;
pub mod tile;

pub use dwt::{FilterType, SubBandType};
pub use error::DwtError;
pub use params::{ComponentCodingParameters, QuantizationStyle};
pub use quantization::{calc_explicit_stepsizes, Stepsize};
pub use tile::{Resolution, TileComponent};
