//! Gain and energy-norm tables of the two filter banks.
//!
//! Consumed by quantisation and rate control, never by the transform loop. Rows are indexed by
//! sub-band orientation, columns by decomposition level.

use super::SubBandType;

/// Norms of the 5-3 wavelets for the different bands.
static DWT_NORMS: [[f64; 10]; 4] = [
    [1.000, 1.500, 2.750, 5.375, 10.68, 21.34, 42.67, 85.33, 170.7, 341.3],
    [1.038, 1.592, 2.919, 5.703, 11.33, 22.64, 45.25, 90.48, 180.9, 0.0],
    [1.038, 1.592, 2.919, 5.703, 11.33, 22.64, 45.25, 90.48, 180.9, 0.0],
    [0.7186, 0.9218, 1.586, 3.043, 6.019, 12.01, 24.00, 47.97, 95.93, 0.0],
];

/// Norms of the 9-7 wavelets for the different bands.
static DWT_NORMS_REAL: [[f64; 10]; 4] = [
    [1.000, 1.965, 4.177, 8.403, 16.90, 33.84, 67.69, 135.3, 270.6, 540.9],
    [2.022, 3.989, 8.355, 17.04, 34.27, 68.63, 137.3, 274.6, 549.0, 0.0],
    [2.022, 3.989, 8.355, 17.04, 34.27, 68.63, 137.3, 274.6, 549.0, 0.0],
    [2.080, 3.865, 8.307, 17.18, 34.71, 69.59, 139.3, 278.6, 557.2, 0.0],
];

/// Last populated level of a table row.
fn clamp_level(level: usize, orient: SubBandType) -> usize {
    match orient {
        SubBandType::LL => level.min(9),
        _ => level.min(8),
    }
}

/// Get gain of 5-3 wavelet transform, as a power of two.
pub fn getgain(orient: SubBandType) -> i32 {
    match orient {
        SubBandType::LL => 0,
        SubBandType::HL | SubBandType::LH => 1,
        SubBandType::HH => 2,
    }
}

/// Get gain of 9-7 wavelet transform.
pub fn getgain_real(_orient: SubBandType) -> i32 {
    0
}

/// Get norm of 5-3 wavelet.
///
/// Levels past the table reuse its deepest entry.
pub fn getnorm(level: usize, orient: SubBandType) -> f64 {
    DWT_NORMS[orient.index()][clamp_level(level, orient)]
}

/// Get norm of 9-7 wavelet.
///
/// Levels past the table reuse its deepest entry.
pub fn getnorm_real(level: usize, orient: SubBandType) -> f64 {
    DWT_NORMS_REAL[orient.index()][clamp_level(level, orient)]
}
