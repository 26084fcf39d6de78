//! Coding parameters of a tile component.
//!
//! The subset of the COD / COC and QCD / QCC marker segments (A.6.1 to A.6.5 of ITU-T T.800)
//! that the wavelet transform and the stepsize calculation depend on.

use crate::dwt::FilterType;

/// Quantization style, the low five bits of Sqcd / Sqcc.
///
/// For more information, see ISO/IEC 15444-1 / ITU T-800 Table A.28.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantizationStyle {
    /// No quantization (0).
    ///
    /// Used with the reversible filter; one exponent per sub-band and no mantissa.
    #[default]
    NoQuantization,

    /// Scalar derived (1).
    ///
    /// Only the LL stepsize is signalled, the others are derived from it.
    ScalarDerived,

    /// Scalar expounded (2).
    ///
    /// One stepsize is signalled for every sub-band.
    ScalarExpounded,
}

impl QuantizationStyle {
    /// Decode a quantization style from an Sqcd byte; the guard bits are ignored.
    pub fn new(value: u8) -> Option<QuantizationStyle> {
        match value & 0b1_1111 {
            0 => Some(QuantizationStyle::NoQuantization),
            1 => Some(QuantizationStyle::ScalarDerived),
            2 => Some(QuantizationStyle::ScalarExpounded),
            _ => None,
        }
    }
}

impl FilterType {
    /// Decode the transformation byte of SPcod / SPcoc (Table A.20).
    pub fn new(value: u8) -> Option<FilterType> {
        match value {
            0 => Some(FilterType::Irreversible97),
            1 => Some(FilterType::Reversible53),
            _ => None,
        }
    }
}

/// Per tile-component coding parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentCodingParameters {
    /// Number of resolution levels, decomposition levels plus one.
    pub numresolutions: usize,
    /// Wavelet filter.
    pub filter: FilterType,
    /// Quantization style.
    pub quantization: QuantizationStyle,
}

impl Default for ComponentCodingParameters {
    /// Five decomposition levels, the codestream default.
    fn default() -> Self {
        Self {
            numresolutions: 6,
            filter: FilterType::default(),
            quantization: QuantizationStyle::default(),
        }
    }
}

impl ComponentCodingParameters {
    pub fn new(
        numresolutions: usize,
        filter: FilterType,
        quantization: QuantizationStyle,
    ) -> Self {
        Self {
            numresolutions,
            filter,
            quantization,
        }
    }

    /// Number of sub-bands, one LL plus three per decomposition level.
    pub fn numbands(&self) -> usize {
        if self.numresolutions == 0 {
            0
        } else {
            3 * self.numresolutions - 2
        }
    }

    pub fn decomposition_levels(&self) -> usize {
        self.numresolutions.saturating_sub(1)
    }
}
