//! Lifting line and the lazy wavelet transforms.
//!
//! A [`LiftingLine`] holds one row or one column of a tile component while a 1-D filter runs on
//! it. Samples are interleaved: `S(i)` lives at offset `2i` and `D(i)` at offset `2i + 1`. The
//! phase `cas` decides which of the two carries the low-pass band. With `cas == 0` the `sn`
//! low-pass samples are the `S` values and the `dn` high-pass samples are the `D` values; with
//! `cas == 1` the roles are swapped, the low-pass samples sit at odd offsets.
//!
//! The lazy transforms move between that interleaved layout and the separated layout used by
//! the tile buffer (`sn` low-pass samples followed by `dn` high-pass samples). Horizontal
//! variants read and write a contiguous row, vertical variants walk a column with the row
//! stride of the tile.

use crate::error::{try_vec, DwtError};

/// Extra samples kept past the end of the line.
///
/// The 9-7 partial-update helpers peek at `S(0)` / `D(0)` even when a band is empty.
pub const LINE_PADDING: usize = 5;

/// Scratch state for one 1-D transform call.
#[derive(Debug, Clone)]
pub struct LiftingLine {
    mem: Vec<i32>,
    sn: usize,
    dn: usize,
    cas: usize,
}

/// Phase of a sub-rectangle axis, the parity of its origin on the reference grid.
pub fn phase(origin: i32) -> usize {
    origin.rem_euclid(2) as usize
}

#[inline]
fn clamp_index(i: isize, bound: usize) -> usize {
    if i < 0 {
        0
    } else {
        (i as usize).min(bound.saturating_sub(1))
    }
}

impl LiftingLine {
    /// Allocate a line able to hold `capacity` samples.
    pub fn new(capacity: usize) -> Result<Self, DwtError> {
        Ok(Self {
            mem: try_vec![0; capacity + LINE_PADDING],
            sn: 0,
            dn: 0,
            cas: 0,
        })
    }

    /// Build a line holding `samples` in interleaved order.
    pub fn from_interleaved(
        samples: &[i32],
        sn: usize,
        dn: usize,
        cas: usize,
    ) -> Result<Self, DwtError> {
        let mut line = Self::new(samples.len().max(2 * sn.max(dn)))?;
        line.configure(sn, dn, cas);
        line.mem[..samples.len()].copy_from_slice(samples);
        Ok(line)
    }

    /// Set the band counts and phase for the next filter call.
    pub fn configure(&mut self, sn: usize, dn: usize, cas: usize) {
        debug_assert!(cas < 2, "phase must be 0 or 1");
        debug_assert!(sn + dn <= self.capacity());
        self.sn = sn;
        self.dn = dn;
        self.cas = cas;
    }

    pub fn capacity(&self) -> usize {
        self.mem.len() - LINE_PADDING
    }

    /// Low-pass sample count
    pub fn sn(&self) -> usize {
        self.sn
    }

    /// High-pass sample count
    pub fn dn(&self) -> usize {
        self.dn
    }

    pub fn cas(&self) -> usize {
        self.cas
    }

    pub fn len(&self) -> usize {
        self.sn + self.dn
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The interleaved samples
    pub fn samples(&self) -> &[i32] {
        &self.mem[..self.len()]
    }

    pub fn samples_mut(&mut self) -> &mut [i32] {
        let len = self.len();
        &mut self.mem[..len]
    }

    /// Copy `len()` contiguous samples in.
    pub fn load(&mut self, src: &[i32]) {
        let len = self.len();
        self.samples_mut().copy_from_slice(&src[..len]);
    }

    /// Copy `len()` samples in, reading every `stride`-th value of `src`.
    pub fn load_strided(&mut self, src: &[i32], stride: usize) {
        for (dst, &value) in self
            .samples_mut()
            .iter_mut()
            .zip(src.iter().step_by(stride))
        {
            *dst = value;
        }
    }

    /// Copy `len()` samples out, writing every `stride`-th value of `dst`.
    pub fn store_strided(&self, dst: &mut [i32], stride: usize) {
        for (out, &value) in dst.iter_mut().step_by(stride).zip(self.samples()) {
            *out = value;
        }
    }

    #[inline]
    pub(crate) fn s(&self, i: usize) -> i32 {
        self.mem[2 * i]
    }

    #[inline]
    pub(crate) fn d(&self, i: usize) -> i32 {
        self.mem[2 * i + 1]
    }

    #[inline]
    pub(crate) fn s_mut(&mut self, i: usize) -> &mut i32 {
        &mut self.mem[2 * i]
    }

    #[inline]
    pub(crate) fn d_mut(&mut self, i: usize) -> &mut i32 {
        &mut self.mem[2 * i + 1]
    }

    /// `S(i)` with `i` clamped to `[0, sn)`.
    #[inline]
    pub(crate) fn s_ext(&self, i: isize) -> i32 {
        self.s(clamp_index(i, self.sn))
    }

    /// `D(i)` with `i` clamped to `[0, dn)`.
    #[inline]
    pub(crate) fn d_ext(&self, i: isize) -> i32 {
        self.d(clamp_index(i, self.dn))
    }

    /// `S(i)` with `i` clamped to `[0, dn)`, for `cas == 1` where `S` holds the high-pass band.
    #[inline]
    pub(crate) fn ss_ext(&self, i: isize) -> i32 {
        self.s(clamp_index(i, self.dn))
    }

    /// `D(i)` with `i` clamped to `[0, sn)`, for `cas == 1` where `D` holds the low-pass band.
    #[inline]
    pub(crate) fn dd_ext(&self, i: isize) -> i32 {
        self.d(clamp_index(i, self.sn))
    }

    /// The whole buffer, padding included
    #[cfg(test)]
    pub(crate) fn raw(&self) -> &[i32] {
        &self.mem
    }
}

/// Forward lazy transform (horizontal).
///
/// Writes the low-pass samples of `line` to `dst[..sn]` and the high-pass samples to
/// `dst[sn..sn + dn]`.
pub fn deinterleave_h(line: &LiftingLine, dst: &mut [i32]) {
    let (low, high) = dst[..line.len()].split_at_mut(line.sn);
    for (out, &value) in low.iter_mut().zip(line.mem[line.cas..].iter().step_by(2)) {
        *out = value;
    }
    for (out, &value) in high
        .iter_mut()
        .zip(line.mem[1 - line.cas..].iter().step_by(2))
    {
        *out = value;
    }
}

/// Forward lazy transform (vertical).
///
/// Same as [`deinterleave_h`] but `dst` is walked with a stride of `stride` samples.
pub fn deinterleave_v(line: &LiftingLine, dst: &mut [i32], stride: usize) {
    let low = line.mem[line.cas..].iter().step_by(2).take(line.sn);
    for (out, &value) in dst.iter_mut().step_by(stride).zip(low) {
        *out = value;
    }
    if line.dn > 0 {
        let high = line.mem[1 - line.cas..].iter().step_by(2).take(line.dn);
        for (out, &value) in dst[line.sn * stride..].iter_mut().step_by(stride).zip(high) {
            *out = value;
        }
    }
}

/// Inverse lazy transform (horizontal).
///
/// Reads `sn` low-pass samples followed by `dn` high-pass samples from `src` and interleaves
/// them into `line`, low-pass at offsets `cas, cas + 2, ...`.
pub fn interleave_h(line: &mut LiftingLine, src: &[i32]) {
    let (sn, dn, cas) = (line.sn, line.dn, line.cas);
    for (slot, &value) in line.mem[cas..].iter_mut().step_by(2).zip(&src[..sn]) {
        *slot = value;
    }
    for (slot, &value) in line.mem[1 - cas..]
        .iter_mut()
        .step_by(2)
        .zip(&src[sn..sn + dn])
    {
        *slot = value;
    }
}

/// Inverse lazy transform (vertical).
///
/// Same as [`interleave_h`] but `src` is walked with a stride of `stride` samples.
pub fn interleave_v(line: &mut LiftingLine, src: &[i32], stride: usize) {
    let (sn, dn, cas) = (line.sn, line.dn, line.cas);
    let low = src.iter().step_by(stride).take(sn);
    for (slot, &value) in line.mem[cas..].iter_mut().step_by(2).zip(low) {
        *slot = value;
    }
    if dn > 0 {
        let high = src[sn * stride..].iter().step_by(stride).take(dn);
        for (slot, &value) in line.mem[1 - cas..].iter_mut().step_by(2).zip(high) {
            *slot = value;
        }
    }
}
