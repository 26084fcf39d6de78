//! Quantization stepsizes.
//!
//! An explicit stepsize is a pair of an 11-bit mantissa and a 5-bit exponent, relative to the
//! nominal dynamic range of its sub-band (E.1.1 of ITU-T T.800):
//!
//! `Δb = 2^(Rb - εb) * (1 + μb / 2^11)`
//!
//! The encoder derives one pair per sub-band from the inverse of the band's synthesis norm, so
//! that quantisation noise weighs the same in every band of the reconstructed image.

use log::trace;

use crate::dwt::{norms, SubBandType};
use crate::fixed::{to_fixed, FRACTION_BITS};
use crate::params::{ComponentCodingParameters, QuantizationStyle};

/// Mantissa / exponent pair of one sub-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stepsize {
    /// μb, 11 bits.
    pub mantissa: u16,
    /// εb
    pub exponent: i32,
}

impl Stepsize {
    pub fn new(mantissa: u16, exponent: i32) -> Self {
        Self { mantissa, exponent }
    }

    /// The real stepsize the pair stands for, `numbps` being the band's nominal dynamic range.
    pub fn to_real(&self, numbps: i32) -> f64 {
        (1.0 + f64::from(self.mantissa) / 2048.0) * 2f64.powi(numbps - self.exponent)
    }
}

/// Encode a stepsize given in units of 2^-13.
///
/// A stepsize of 1 (2^-13) yields mantissa 0 and exponent `numbps + 13`; doubling the stepsize
/// keeps the mantissa and lowers the exponent by one. Zero is treated as 1.
pub fn encode_stepsize(stepsize: u32, numbps: i32) -> Stepsize {
    let log2 = stepsize.max(1).ilog2() as i32;
    let p = log2 - FRACTION_BITS as i32;
    let n = 11 - log2;
    let scaled = if n < 0 {
        stepsize >> -n
    } else {
        stepsize << n
    };
    let mantissa = scaled & 0x7ff;
    Stepsize {
        mantissa: mantissa as u16,
        exponent: numbps - p,
    }
}

/// Resolution number and orientation of sub-band `bandno`, in codestream order.
///
/// Band 0 is the LL band of resolution 0; each further resolution contributes HL, LH and HH.
pub fn band_location(bandno: usize) -> (usize, SubBandType) {
    if bandno == 0 {
        (0, SubBandType::LL)
    } else {
        (
            (bandno - 1) / 3 + 1,
            SubBandType::DETAIL[(bandno - 1) % 3],
        )
    }
}

/// Compute the explicit stepsize of every sub-band of a tile component.
///
/// `prec` is the component's sample precision. Without quantization every band gets a
/// stepsize of 1.0; otherwise the stepsize is `2^gain / norm` with the 9-7 synthesis norm, the
/// gain being that of the 5-3 filter when it is in use and zero for the 9-7 filter.
pub fn calc_explicit_stepsizes(params: &ComponentCodingParameters, prec: i32) -> Vec<Stepsize> {
    (0..params.numbands())
        .map(|bandno| {
            let (resno, orient) = band_location(bandno);
            let level = params.numresolutions - 1 - resno;
            let gain = params.filter.gain(orient);
            let stepsize = if params.quantization == QuantizationStyle::NoQuantization {
                1.0
            } else {
                f64::from(1 << gain) / norms::getnorm_real(level, orient)
            };
            let encoded = encode_stepsize(to_fixed(stepsize).max(1) as u32, prec + gain);
            trace!(
                "band {} ({:?}, resolution {}): {} -> {:?}",
                bandno,
                orient,
                resno,
                stepsize,
                encoded
            );
            encoded
        })
        .collect()
}

/// Expand the single LL stepsize of derived quantization to `numbands` sub-bands.
///
/// Every band keeps the LL mantissa; the exponent drops by one per decomposition level above
/// the coarsest (E-5), never below zero.
pub fn derive_stepsizes(base: Stepsize, numbands: usize) -> Vec<Stepsize> {
    (0..numbands)
        .map(|bandno| {
            if bandno == 0 {
                base
            } else {
                let shift = ((bandno - 1) / 3) as i32;
                Stepsize::new(base.mantissa, (base.exponent - shift).max(0))
            }
        })
        .collect()
}

/// Number of stepsizes a QCD / QCC segment carries for `params`.
///
/// Derived quantization signals only the first pair; the other styles signal all of them.
pub fn signalled_stepsizes(params: &ComponentCodingParameters, stepsizes: &[Stepsize]) -> usize {
    match params.quantization {
        QuantizationStyle::ScalarDerived => stepsizes.len().min(1),
        _ => stepsizes.len(),
    }
}
