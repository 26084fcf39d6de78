//! Reversible 5-3 lifting filter.
//!
//! Integer lifting on an interleaved [`LiftingLine`] (F.3.8.2 / F.4.8.2 of ITU-T T.800). Borders
//! replicate the nearest sample of the band. Shifts are arithmetic, which is what keeps the
//! forward / inverse pair lossless for negative intermediates. Neighbour sums are taken in 64
//! bits, so any line whose coefficients fit in `i32` transforms without overflow.

use super::line::LiftingLine;

/// `floor((a + b) / 2)`, summed in 64 bits.
#[inline]
fn predict(a: i32, b: i32) -> i32 {
    ((i64::from(a) + i64::from(b)) >> 1) as i32
}

/// `floor((a + b + 2) / 4)`, summed in 64 bits.
#[inline]
fn update(a: i32, b: i32) -> i32 {
    ((i64::from(a) + i64::from(b) + 2) >> 2) as i32
}

/// Forward 5-3 wavelet transform in 1-D.
pub fn encode(line: &mut LiftingLine) {
    let (sn, dn) = (line.sn(), line.dn());
    if line.cas() == 0 {
        if dn > 0 || sn > 1 {
            for i in 0..dn as isize {
                let p = predict(line.s_ext(i), line.s_ext(i + 1));
                *line.d_mut(i as usize) -= p;
            }
            for i in 0..sn as isize {
                let u = update(line.d_ext(i - 1), line.d_ext(i));
                *line.s_mut(i as usize) += u;
            }
        }
    } else if sn == 0 && dn == 1 {
        // lone sample on an odd coordinate is high-pass
        *line.s_mut(0) *= 2;
    } else {
        for i in 0..dn as isize {
            let p = predict(line.dd_ext(i), line.dd_ext(i - 1));
            *line.s_mut(i as usize) -= p;
        }
        for i in 0..sn as isize {
            let u = update(line.ss_ext(i), line.ss_ext(i + 1));
            *line.d_mut(i as usize) += u;
        }
    }
}

/// Inverse 5-3 wavelet transform in 1-D.
pub fn decode(line: &mut LiftingLine) {
    let (sn, dn) = (line.sn(), line.dn());
    if line.cas() == 0 {
        if dn > 0 || sn > 1 {
            for i in 0..sn as isize {
                let u = update(line.d_ext(i - 1), line.d_ext(i));
                *line.s_mut(i as usize) -= u;
            }
            for i in 0..dn as isize {
                let p = predict(line.s_ext(i), line.s_ext(i + 1));
                *line.d_mut(i as usize) += p;
            }
        }
    } else if sn == 0 && dn == 1 {
        *line.s_mut(0) /= 2;
    } else {
        for i in 0..sn as isize {
            let u = update(line.ss_ext(i), line.ss_ext(i + 1));
            *line.d_mut(i as usize) -= u;
        }
        for i in 0..dn as isize {
            let p = predict(line.dd_ext(i), line.dd_ext(i - 1));
            *line.s_mut(i as usize) += p;
        }
    }
}
