//! Tile-component coefficient buffers and their resolution pyramids.
//!
//! A [`TileComponent`] owns the row-major coefficients of one component of one tile together
//! with the rectangles of its resolution levels on the reference grid (B.5 of ITU-T T.800).
//! Level 0 is the coarsest, the last level covers the whole component. The wavelet driver
//! reads the pyramid to size the low-pass / high-pass split of every line.

use std::ops::{Index, IndexMut};

use log::debug;

use crate::dwt::line::phase;
use crate::dwt::SubBandType;
use crate::error::{try_vec, DwtError};

/// A rectangle on the reference grid, `x1` and `y1` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

/// `ceil(a / 2^b)`, also for negative `a` and for shifts past the width of `i32`.
fn ceil_div_pow2(a: i32, b: u32) -> i32 {
    (-((-i64::from(a)) >> b.min(63))) as i32
}

/// Whether `sn` low-pass and `dn` high-pass samples make up a line starting on phase `cas`.
fn valid_split(sn: usize, dn: usize, cas: usize) -> bool {
    if cas == 0 {
        sn == dn || sn == dn + 1
    } else {
        dn == sn || dn == sn + 1
    }
}

impl Resolution {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> usize {
        (i64::from(self.x1) - i64::from(self.x0)).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (i64::from(self.y1) - i64::from(self.y0)).max(0) as usize
    }

    /// Derive the rectangles of `numresolutions` levels for a component covering `self`.
    ///
    /// Level `r` is the component rectangle divided by `2^(numresolutions - 1 - r)` with both
    /// bounds rounded up (equation B-14).
    pub fn pyramid(&self, numresolutions: usize) -> Vec<Resolution> {
        (0..numresolutions)
            .map(|r| {
                let shift = (numresolutions - 1 - r) as u32;
                Resolution::new(
                    ceil_div_pow2(self.x0, shift),
                    ceil_div_pow2(self.y0, shift),
                    ceil_div_pow2(self.x1, shift),
                    ceil_div_pow2(self.y1, shift),
                )
            })
            .collect()
    }
}

/// Coefficients of one tile component.
#[derive(Debug, Clone)]
pub struct TileComponent {
    rect: Resolution,
    data: Vec<i32>,
    resolutions: Vec<Resolution>,
}

impl TileComponent {
    /// Wrap `data` covering `rect` with an explicit resolution pyramid, coarsest level first.
    ///
    /// Every level must be at least as large as the one below it and split into the low-pass /
    /// high-pass counts its origin parity allows, and the last level must be `rect` itself.
    pub fn new(
        rect: Resolution,
        data: Vec<i32>,
        resolutions: Vec<Resolution>,
    ) -> Result<Self, DwtError> {
        let expected = rect.width() * rect.height();
        if data.len() != expected {
            return Err(DwtError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        match resolutions.last() {
            None => return Err(DwtError::NoResolutions),
            Some(last) if *last != rect => return Err(DwtError::ResolutionMismatch),
            Some(_) => {}
        }
        for (level, pair) in resolutions.windows(2).enumerate() {
            let (coarser, finer) = (&pair[0], &pair[1]);
            let consistent = coarser.width() <= finer.width()
                && coarser.height() <= finer.height()
                && valid_split(
                    coarser.width(),
                    finer.width() - coarser.width(),
                    phase(finer.x0),
                )
                && valid_split(
                    coarser.height(),
                    finer.height() - coarser.height(),
                    phase(finer.y0),
                );
            if !consistent {
                return Err(DwtError::InvalidResolution { level: level + 1 });
            }
        }
        debug!(
            "tile component {}x{} at ({}, {}), {} resolutions",
            rect.width(),
            rect.height(),
            rect.x0,
            rect.y0,
            resolutions.len()
        );
        Ok(Self {
            rect,
            data,
            resolutions,
        })
    }

    /// Wrap `data` covering `rect`, deriving a pyramid of `numresolutions` levels.
    pub fn with_levels(
        rect: Resolution,
        data: Vec<i32>,
        numresolutions: usize,
    ) -> Result<Self, DwtError> {
        let resolutions = rect.pyramid(numresolutions);
        Self::new(rect, data, resolutions)
    }

    /// An all-zero component covering `rect`.
    pub fn zeroed(rect: Resolution, numresolutions: usize) -> Result<Self, DwtError> {
        let data = try_vec![0; rect.width() * rect.height()];
        Self::with_levels(rect, data, numresolutions)
    }

    pub fn rect(&self) -> Resolution {
        self.rect
    }

    pub fn width(&self) -> usize {
        self.rect.width()
    }

    pub fn height(&self) -> usize {
        self.rect.height()
    }

    pub fn numresolutions(&self) -> usize {
        self.resolutions.len()
    }

    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [i32] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<i32> {
        self.data
    }

    /// Samples of row `row`.
    pub fn row(&self, row: usize) -> &[i32] {
        let w = self.width();
        &self.data[row * w..(row + 1) * w]
    }

    /// The pyramid and the buffer, borrowed together for the transform loop.
    pub(crate) fn parts_mut(&mut self) -> (&[Resolution], &mut [i32]) {
        (&self.resolutions, &mut self.data)
    }

    /// Buffer area holding a sub-band after a forward transform, as `(x0, y0, x1, y1)`.
    ///
    /// Resolution 0 only has the LL band; every other resolution has HL, LH and HH next to and
    /// below the area of the level beneath it.
    pub fn band_area(&self, resno: usize, orient: SubBandType) -> (usize, usize, usize, usize) {
        let res = &self.resolutions[resno];
        if resno == 0 {
            return (0, 0, res.width(), res.height());
        }
        let lower = &self.resolutions[resno - 1];
        let (lw, lh) = (lower.width(), lower.height());
        let (w, h) = (res.width(), res.height());
        match orient {
            SubBandType::LL => (0, 0, lw, lh),
            SubBandType::HL => (lw, 0, w, lh),
            SubBandType::LH => (0, lh, lw, h),
            SubBandType::HH => (lw, lh, w, h),
        }
    }

    /// Copy of the coefficients of one sub-band, row by row.
    pub fn band(&self, resno: usize, orient: SubBandType) -> Vec<i32> {
        let (x0, y0, x1, y1) = self.band_area(resno, orient);
        (y0..y1)
            .flat_map(|row| self.row(row)[x0..x1].iter().copied())
            .collect()
    }
}

impl Index<(usize, usize)> for TileComponent {
    type Output = i32;

    fn index(&self, (col, row): (usize, usize)) -> &Self::Output {
        &self.data[row * self.width() + col]
    }
}

impl IndexMut<(usize, usize)> for TileComponent {
    fn index_mut(&mut self, (col, row): (usize, usize)) -> &mut Self::Output {
        let w = self.width();
        &mut self.data[row * w + col]
    }
}
