//! Fixed-point arithmetic shared by the irreversible filter and the quantiser.
//!
//! Values carry [`FRACTION_BITS`] fractional bits, so `ONE == 8192` represents 1.0. The 9-7
//! lifting coefficients and explicit stepsizes are both expressed on this scale.

/// Number of fractional bits.
pub const FRACTION_BITS: u32 = 13;

/// 1.0 in fixed point.
pub const ONE: i32 = 1 << FRACTION_BITS;

/// Multiply a sample by a fixed-point coefficient.
///
/// The product is formed in 64 bits and rounded on bit 12 before dropping the fraction, the
/// same rounding on encode and decode so reconstruction error stays bounded.
#[inline]
pub fn fix_mul(a: i32, b: i32) -> i32 {
    round_product(i64::from(a) * i64::from(b))
}

/// Multiply the sum of two neighbouring samples by a fixed-point coefficient.
///
/// The sum is formed in 64 bits, two samples near the `i32` range add up past it.
#[inline]
pub fn fix_mul_sum(a: i32, b: i32, coeff: i32) -> i32 {
    round_product((i64::from(a) + i64::from(b)) * i64::from(coeff))
}

#[inline]
fn round_product(mut temp: i64) -> i32 {
    temp += temp & 4096;
    (temp >> FRACTION_BITS) as i32
}

/// Convert a real value to fixed point, rounding towards negative infinity.
pub fn to_fixed(value: f64) -> i32 {
    (value * f64::from(ONE)).floor() as i32
}
