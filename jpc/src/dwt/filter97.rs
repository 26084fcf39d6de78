//! Irreversible 9-7 lifting filter in fixed point.
//!
//! The lifting steps of F.3.8.1 / F.4.8.1 with every multiplication done by
//! [`fix_mul`](crate::fixed::fix_mul) on 13-bit coefficients. Samples are expected to carry the
//! same 13 fractional bits; on that scale a forward + inverse pass reproduces an 8-bit line to
//! well within an eighth of a sample. The forward and inverse α differ in the last bit, so the
//! reconstruction error grows with amplitude, to a few hundredths of a percent of full scale.
//!
//! Neighbour sums are taken in 64 bits by [`fix_mul_sum`]. Samples of up to 16 bits scaled by
//! 2^13 keep every intermediate within `i32`.
//!
//! The inverse runs its four lifting steps through partial-update helpers. Each helper couples
//! as many samples as both bands allow and then applies a constant tail for the rest, which is
//! the same arithmetic the clamped border extension produces. [`decode_clamped`] spells the
//! inverse out with clamped accessors and is kept to check that equivalence.

use super::line::LiftingLine;
use crate::fixed::{fix_mul, fix_mul_sum};

/// Lifting parameters for the 9-7 irreversible filter (Table F.4) scaled by 2^13.
pub mod lifting_params_97 {
    /// |α| (alpha) lifting parameter, 1.586134342
    pub const ALPHA: i32 = 12993;
    /// |α| as used by the inverse
    pub const ALPHA_INV: i32 = 12994;
    /// |β| (beta) lifting parameter, 0.052980118
    pub const BETA: i32 = 434;
    /// γ (gamma) lifting parameter, 0.882911075
    pub const GAMMA: i32 = 7233;
    /// δ (delta) lifting parameter, 0.443506852
    pub const DELTA: i32 = 3633;
    /// K / 2, applied to the high-pass band
    pub const K_HALF: i32 = 5038;
    /// 1 / K, applied to the low-pass band
    pub const K_INV: i32 = 6659;
    /// K, undoes [`K_INV`]
    pub const K: i32 = 10078;
    /// 2 / K, undoes [`K_HALF`]
    pub const TWO_OVER_K: i32 = 13318;
}

use lifting_params_97::*;

/// Direction of a lifting update.
#[derive(Debug, Clone, Copy)]
enum Lift {
    Minus,
    Plus,
}

impl Lift {
    #[inline]
    fn apply(self, target: &mut i32, value: i32) {
        match self {
            Lift::Minus => *target -= value,
            Lift::Plus => *target += value,
        }
    }
}

/// Forward 9-7 wavelet transform in 1-D.
pub fn encode(line: &mut LiftingLine) {
    let (sn, dn) = (line.sn() as isize, line.dn() as isize);
    if line.cas() == 0 {
        if dn > 0 || sn > 1 {
            for i in 0..dn {
                let v = fix_mul_sum(line.s_ext(i), line.s_ext(i + 1), ALPHA);
                *line.d_mut(i as usize) -= v;
            }
            for i in 0..sn {
                let v = fix_mul_sum(line.d_ext(i - 1), line.d_ext(i), BETA);
                *line.s_mut(i as usize) -= v;
            }
            for i in 0..dn {
                let v = fix_mul_sum(line.s_ext(i), line.s_ext(i + 1), GAMMA);
                *line.d_mut(i as usize) += v;
            }
            for i in 0..sn {
                let v = fix_mul_sum(line.d_ext(i - 1), line.d_ext(i), DELTA);
                *line.s_mut(i as usize) += v;
            }
            for i in 0..dn as usize {
                let v = fix_mul(line.d(i), K_HALF);
                *line.d_mut(i) = v;
            }
            for i in 0..sn as usize {
                let v = fix_mul(line.s(i), K_INV);
                *line.s_mut(i) = v;
            }
        }
    } else if sn > 0 || dn > 1 {
        for i in 0..dn {
            let v = fix_mul_sum(line.dd_ext(i), line.dd_ext(i - 1), ALPHA);
            *line.s_mut(i as usize) -= v;
        }
        for i in 0..sn {
            let v = fix_mul_sum(line.ss_ext(i), line.ss_ext(i + 1), BETA);
            *line.d_mut(i as usize) -= v;
        }
        for i in 0..dn {
            let v = fix_mul_sum(line.dd_ext(i), line.dd_ext(i - 1), GAMMA);
            *line.s_mut(i as usize) += v;
        }
        for i in 0..sn {
            let v = fix_mul_sum(line.ss_ext(i), line.ss_ext(i + 1), DELTA);
            *line.d_mut(i as usize) += v;
        }
        for i in 0..dn as usize {
            let v = fix_mul(line.s(i), K_HALF);
            *line.s_mut(i) = v;
        }
        for i in 0..sn as usize {
            let v = fix_mul(line.d(i), K_INV);
            *line.d_mut(i) = v;
        }
    }
}

/// Update `k` even-offset samples from their odd neighbours `D(i - 1) + D(i)`.
///
/// Only `n` odd samples exist; past them the last one stands in for both neighbours.
fn lift_s(line: &mut LiftingLine, k: usize, n: usize, x: i32, dir: Lift) {
    let m = k.min(n);
    let mut l = line.d(0);
    for i in 0..m {
        let j = l;
        l = line.d(i);
        dir.apply(line.s_mut(i), fix_mul_sum(l, j, x));
    }
    if m < k {
        let tail = fix_mul_sum(l, l, x);
        for i in m..k {
            dir.apply(line.s_mut(i), tail);
        }
    }
}

/// Update `k` odd-offset samples from their even neighbours `S(i) + S(i + 1)`.
///
/// Only `n` even samples exist; past them the last one stands in for both neighbours.
fn lift_d(line: &mut LiftingLine, k: usize, n: usize, x: i32, dir: Lift) {
    let m = if k >= n { n.saturating_sub(1) } else { k };
    let mut l = line.s(0);
    for i in 0..m {
        let j = l;
        l = line.s(i + 1);
        dir.apply(line.d_mut(i), fix_mul_sum(l, j, x));
    }
    if m < k {
        let tail = fix_mul_sum(l, l, x);
        for i in m..k {
            dir.apply(line.d_mut(i), tail);
        }
    }
}

/// Inverse 9-7 wavelet transform in 1-D.
pub fn decode(line: &mut LiftingLine) {
    let (sn, dn) = (line.sn(), line.dn());
    if line.cas() == 0 {
        if dn > 0 || sn > 1 {
            for i in 0..sn {
                let v = fix_mul(line.s(i), K);
                *line.s_mut(i) = v;
            }
            for i in 0..dn {
                let v = fix_mul(line.d(i), TWO_OVER_K);
                *line.d_mut(i) = v;
            }
            lift_s(line, sn, dn, DELTA, Lift::Minus);
            lift_d(line, dn, sn, GAMMA, Lift::Minus);
            lift_s(line, sn, dn, BETA, Lift::Plus);
            lift_d(line, dn, sn, ALPHA_INV, Lift::Plus);
        }
    } else if sn > 0 || dn > 1 {
        for i in 0..sn {
            let v = fix_mul(line.d(i), K);
            *line.d_mut(i) = v;
        }
        for i in 0..dn {
            let v = fix_mul(line.s(i), TWO_OVER_K);
            *line.s_mut(i) = v;
        }
        lift_d(line, sn, dn, DELTA, Lift::Minus);
        lift_s(line, dn, sn, GAMMA, Lift::Minus);
        lift_d(line, sn, dn, BETA, Lift::Plus);
        lift_s(line, dn, sn, ALPHA_INV, Lift::Plus);
    }
}

/// Inverse 9-7 wavelet transform in 1-D using clamped border addressing.
///
/// Produces the same samples as [`decode`].
pub fn decode_clamped(line: &mut LiftingLine) {
    let (sn, dn) = (line.sn() as isize, line.dn() as isize);
    if line.cas() == 0 {
        if dn > 0 || sn > 1 {
            for i in 0..sn as usize {
                let v = fix_mul(line.s(i), K);
                *line.s_mut(i) = v;
            }
            for i in 0..dn as usize {
                let v = fix_mul(line.d(i), TWO_OVER_K);
                *line.d_mut(i) = v;
            }
            for i in 0..sn {
                let v = fix_mul_sum(line.d_ext(i - 1), line.d_ext(i), DELTA);
                *line.s_mut(i as usize) -= v;
            }
            for i in 0..dn {
                let v = fix_mul_sum(line.s_ext(i), line.s_ext(i + 1), GAMMA);
                *line.d_mut(i as usize) -= v;
            }
            for i in 0..sn {
                let v = fix_mul_sum(line.d_ext(i - 1), line.d_ext(i), BETA);
                *line.s_mut(i as usize) += v;
            }
            for i in 0..dn {
                let v = fix_mul_sum(line.s_ext(i), line.s_ext(i + 1), ALPHA_INV);
                *line.d_mut(i as usize) += v;
            }
        }
    } else if sn > 0 || dn > 1 {
        for i in 0..sn as usize {
            let v = fix_mul(line.d(i), K);
            *line.d_mut(i) = v;
        }
        for i in 0..dn as usize {
            let v = fix_mul(line.s(i), TWO_OVER_K);
            *line.s_mut(i) = v;
        }
        for i in 0..sn {
            let v = fix_mul_sum(line.ss_ext(i), line.ss_ext(i + 1), DELTA);
            *line.d_mut(i as usize) -= v;
        }
        for i in 0..dn {
            let v = fix_mul_sum(line.dd_ext(i), line.dd_ext(i - 1), GAMMA);
            *line.s_mut(i as usize) -= v;
        }
        for i in 0..sn {
            let v = fix_mul_sum(line.ss_ext(i), line.ss_ext(i + 1), BETA);
            *line.d_mut(i as usize) += v;
        }
        for i in 0..dn {
            let v = fix_mul_sum(line.dd_ext(i), line.dd_ext(i - 1), ALPHA_INV);
            *line.s_mut(i as usize) += v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{FRACTION_BITS, ONE};

    const TOLERANCE: i32 = ONE / 8;

    fn split(n: usize, cas: usize) -> (usize, usize) {
        if cas == 0 {
            (n.div_ceil(2), n / 2)
        } else {
            (n / 2, n.div_ceil(2))
        }
    }

    fn scaled(samples: &[i32]) -> Vec<i32> {
        samples.iter().map(|s| s << FRACTION_BITS).collect()
    }

    #[test]
    fn test_lifting_parameters() {
        let scale = f64::from(ONE);
        assert!((f64::from(ALPHA) / scale - 1.586_134_342).abs() < 1e-3);
        assert!((f64::from(BETA) / scale - 0.052_980_118).abs() < 1e-3);
        assert!((f64::from(GAMMA) / scale - 0.882_911_075).abs() < 1e-3);
        assert!((f64::from(DELTA) / scale - 0.443_506_852).abs() < 1e-3);
        // scaling pairs undo each other
        assert!((f64::from(K) * f64::from(K_INV) / (scale * scale) - 1.0).abs() < 1e-3);
        assert!((f64::from(K_HALF) * f64::from(TWO_OVER_K) / (scale * scale) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_encode_1d_97() {
        let samples = [101, 103, 104, 105, 96, 97, 96, 102, 109];
        let signal: Vec<i32> = scaled(&samples.iter().map(|v| v - 128).collect::<Vec<_>>());
        let mut line = LiftingLine::from_interleaved(&signal, 5, 4, 0).unwrap();
        encode(&mut line);
        assert_eq!(
            line.samples(),
            &[-219594, -314, -190223, 21689, -243279, 8854, -255507, -5750, -171990]
        );
    }

    #[test]
    fn test_1d_roundtrip_97_simple() {
        let signal = scaled(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let mut line = LiftingLine::from_interleaved(&signal, 4, 4, 0).unwrap();
        encode(&mut line);
        decode(&mut line);
        for (i, (&orig, &recon)) in signal.iter().zip(line.samples()).enumerate() {
            assert!(
                (orig - recon).abs() <= TOLERANCE,
                "Mismatch at index {}: expected {}, got {}",
                i,
                orig,
                recon
            );
        }
    }

    #[test]
    fn test_single_element_signal() {
        for cas in 0..2 {
            let (sn, dn) = split(1, cas);
            let mut line = LiftingLine::from_interleaved(&[42 << 13], sn, dn, cas).unwrap();
            encode(&mut line);
            assert_eq!(line.samples(), &[42 << 13]);
            decode(&mut line);
            assert_eq!(line.samples(), &[42 << 13]);
        }
    }

    #[test]
    fn test_full_scale_16_bit_line() {
        let peak = 32767 << FRACTION_BITS;
        for cas in 0..2 {
            for n in [2, 3, 16, 17] {
                let (sn, dn) = split(n, cas);
                let signal: Vec<i32> = (0..n)
                    .map(|i| if i % 2 == 0 { peak } else { -peak })
                    .collect();
                let mut line = LiftingLine::from_interleaved(&signal, sn, dn, cas).unwrap();
                let mut clamped = line.clone();
                encode(&mut line);
                encode(&mut clamped);
                decode(&mut line);
                decode_clamped(&mut clamped);
                assert_eq!(line.samples(), clamped.samples());
                for (&orig, &recon) in signal.iter().zip(line.samples()) {
                    assert!((orig - recon).abs() < 1 << 19, "n={} cas={}", n, cas);
                }
            }
        }
    }

    #[test]
    fn test_partial_update_matches_clamped() {
        // every band split, including ones whose counts differ by more than one
        let coefficients: Vec<i32> = (0..16).map(|i| (i * 7919 % 1001) - 500).collect();
        for sn in 1..8 {
            for dn in 1..8 {
                for cas in 0..2 {
                    let n = 2 * sn.max(dn);
                    let mut fast =
                        LiftingLine::from_interleaved(&coefficients[..n], sn, dn, cas).unwrap();
                    let mut clamped = fast.clone();
                    decode(&mut fast);
                    decode_clamped(&mut clamped);
                    assert_eq!(
                        &fast.raw()[..n],
                        &clamped.raw()[..n],
                        "sn={} dn={} cas={}",
                        sn,
                        dn,
                        cas
                    );
                }
            }
        }
    }
}
