//! Discrete Wavelet Transformation for JPEG 2000
//!
//! This module implements the forward and inverse discrete wavelet transformations
//! as specified in Annex F of ITU-T T.800 (ISO/IEC 15444-1) - JPEG 2000 Core Coding System.
//!
//! The implementation supports:
//! - 5-3 Reversible (lossless) wavelet transformation
//! - 9-7 Irreversible (lossy) wavelet transformation, in 13-bit fixed point
//!
//! Both transformations work in place on a [`TileComponent`] buffer. Every decomposition level
//! filters the columns and then the rows of the current resolution; the low-pass half of each
//! line is written first so the next level finds its input in the top-left corner. The inverse
//! can stop early and leave the finest levels untouched, which is what a decoder asks for when
//! it reduces the output resolution.

use log::{debug, trace};
use rayon::prelude::*;

use crate::error::DwtError;
use crate::tile::{Resolution, TileComponent};

pub mod filter53;
pub mod filter97;
pub mod line;
pub mod norms;

use line::{deinterleave_h, deinterleave_v, interleave_h, interleave_v, phase, LiftingLine};

/// Filter type selection for DWT operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    /// 5-3 Reversible filter for lossless compression
    #[default]
    Reversible53,
    /// 9-7 Irreversible filter for lossy compression
    Irreversible97,
}

impl FilterType {
    /// Gain of a sub-band, as a power of two.
    pub fn gain(&self, orient: SubBandType) -> i32 {
        match self {
            FilterType::Reversible53 => norms::getgain(orient),
            FilterType::Irreversible97 => norms::getgain_real(orient),
        }
    }

    /// Energy norm of a sub-band at a decomposition level.
    pub fn norm(&self, level: usize, orient: SubBandType) -> f64 {
        match self {
            FilterType::Reversible53 => norms::getnorm(level, orient),
            FilterType::Irreversible97 => norms::getnorm_real(level, orient),
        }
    }
}

/// Sub-band types in the wavelet decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubBandType {
    /// Low-pass horizontal, Low-pass vertical
    LL,
    /// High-pass horizontal, Low-pass vertical
    HL,
    /// Low-pass horizontal, High-pass vertical
    LH,
    /// High-pass horizontal, High-pass vertical
    HH,
}

impl SubBandType {
    /// The three detail bands of a resolution level, in codestream order.
    pub const DETAIL: [SubBandType; 3] = [SubBandType::HL, SubBandType::LH, SubBandType::HH];

    /// Orientation number as used by the norm tables (LL 0, HL 1, LH 2, HH 3).
    pub fn index(&self) -> usize {
        match self {
            SubBandType::LL => 0,
            SubBandType::HL => 1,
            SubBandType::LH => 2,
            SubBandType::HH => 3,
        }
    }
}

/// A 1-D lifting filter working on an interleaved line.
pub trait LineFilter {
    /// Forward transform of `line`, in place.
    fn encode(line: &mut LiftingLine);
    /// Inverse transform of `line`, in place.
    fn decode(line: &mut LiftingLine);
}

/// The 5-3 integer filter.
pub struct Reversible53;

/// The 9-7 fixed-point filter.
pub struct Irreversible97;

impl LineFilter for Reversible53 {
    fn encode(line: &mut LiftingLine) {
        filter53::encode(line)
    }

    fn decode(line: &mut LiftingLine) {
        filter53::decode(line)
    }
}

impl LineFilter for Irreversible97 {
    fn encode(line: &mut LiftingLine) {
        filter97::encode(line)
    }

    fn decode(line: &mut LiftingLine) {
        filter97::decode(line)
    }
}

/// Largest width or height among `resolutions`.
fn max_resolution(resolutions: &[Resolution]) -> usize {
    resolutions
        .iter()
        .map(|r| r.width().max(r.height()))
        .max()
        .unwrap_or(0)
}

/// FDWT procedure - forward transform of every level of `tilec`.
fn encode_tile<F: LineFilter>(tilec: &mut TileComponent) -> Result<(), DwtError> {
    let w = tilec.width();
    let h = tilec.height();
    let (resolutions, data) = tilec.parts_mut();
    let l = resolutions.len() - 1;

    let mut line = LiftingLine::new(w.max(h))?;
    debug!(
        "forward dwt on {}x{}, {} levels, scratch {}",
        w,
        h,
        l,
        line.capacity()
    );

    for i in 0..l {
        let finer = &resolutions[l - i];
        let coarser = &resolutions[l - i - 1];
        let (rw, rh) = (finer.width(), finer.height());
        let (rw1, rh1) = (coarser.width(), coarser.height());
        let cas_row = phase(finer.x0);
        let cas_col = phase(finer.y0);
        trace!(
            "level {}: {}x{} -> {}x{} (cas {} {})",
            i,
            rw,
            rh,
            rw1,
            rh1,
            cas_row,
            cas_col
        );

        // VER_SD
        line.configure(rh1, rh - rh1, cas_col);
        // no rows, and no column to slice into
        if !line.is_empty() {
            for j in 0..rw {
                line.load_strided(&data[j..], w);
                F::encode(&mut line);
                deinterleave_v(&line, &mut data[j..], w);
            }
        }

        // HOR_SD
        line.configure(rw1, rw - rw1, cas_row);
        for j in 0..rh {
            let row = &mut data[j * w..j * w + rw];
            line.load(row);
            F::encode(&mut line);
            deinterleave_h(&line, row);
        }
    }
    Ok(())
}

/// IDWT procedure - inverse transform of `tilec` up to `numresolutions - stop` levels.
fn decode_tile<F: LineFilter>(tilec: &mut TileComponent, stop: usize) -> Result<(), DwtError> {
    let numres = tilec.numresolutions();
    if numres <= stop {
        return Ok(());
    }
    let levels = numres - stop;
    let w = tilec.width();
    let h = tilec.height();
    let (resolutions, data) = tilec.parts_mut();

    let mut line = LiftingLine::new(max_resolution(&resolutions[1..levels]).max(1))?;
    debug!(
        "inverse dwt on {}x{}, {} of {} resolutions, scratch {}",
        w,
        h,
        levels,
        numres,
        line.capacity()
    );

    let mut rw = resolutions[0].width();
    let mut rh = resolutions[0].height();
    for res in &resolutions[1..levels] {
        let h_sn = rw;
        let v_sn = rh;
        rw = res.width();
        rh = res.height();
        trace!("level {}x{} -> {}x{}", h_sn, v_sn, rw, rh);

        // HOR_SR
        line.configure(h_sn, rw - h_sn, phase(res.x0));
        for j in 0..rh {
            let row = &mut data[j * w..j * w + rw];
            interleave_h(&mut line, row);
            F::decode(&mut line);
            row.copy_from_slice(line.samples());
        }

        // VER_SR
        line.configure(v_sn, rh - v_sn, phase(res.y0));
        if !line.is_empty() {
            for j in 0..rw {
                interleave_v(&mut line, &data[j..], w);
                F::decode(&mut line);
                line.store_strided(&mut data[j..], w);
            }
        }
    }
    Ok(())
}

/// The main DWT processor implementing Annex F procedures
#[derive(Debug, Clone, Copy, Default)]
pub struct DwtProcessor {
    filter_type: FilterType,
}

impl DwtProcessor {
    /// Create a new DWT processor with specified filter type
    pub fn new(filter_type: FilterType) -> Self {
        Self { filter_type }
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Forward transform over every level of the pyramid.
    pub fn forward(&self, tilec: &mut TileComponent) -> Result<(), DwtError> {
        match self.filter_type {
            FilterType::Reversible53 => encode_tile::<Reversible53>(tilec),
            FilterType::Irreversible97 => encode_tile::<Irreversible97>(tilec),
        }
    }

    /// Inverse transform, leaving the `stop` finest levels decomposed.
    ///
    /// `stop == 0` reconstructs the full component. Afterwards the top-left corner of the
    /// buffer holds resolution `numresolutions - 1 - stop`.
    pub fn inverse(&self, tilec: &mut TileComponent, stop: usize) -> Result<(), DwtError> {
        match self.filter_type {
            FilterType::Reversible53 => decode_tile::<Reversible53>(tilec, stop),
            FilterType::Irreversible97 => decode_tile::<Irreversible97>(tilec, stop),
        }
    }

    /// Perform a complete forward then inverse transform (for testing round-trip)
    pub fn round_trip(&self, tilec: &mut TileComponent) -> Result<(), DwtError> {
        self.forward(tilec)?;
        self.inverse(tilec, 0)
    }
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// Forward DWT of a tile component.
///
/// 9-7 samples carry 13 fractional bits; components of up to 16 bits keep every lifting
/// intermediate within `i32`.
pub fn forward(tilec: &mut TileComponent, filter: FilterType) -> Result<(), DwtError> {
    DwtProcessor::new(filter).forward(tilec)
}

/// Inverse DWT of a tile component, stopping `stop` levels short of full resolution.
pub fn inverse(tilec: &mut TileComponent, stop: usize, filter: FilterType) -> Result<(), DwtError> {
    DwtProcessor::new(filter).inverse(tilec, stop)
}

/// Perform forward 5-3 DWT over all levels of `tilec`
pub fn dwt_53_forward(tilec: &mut TileComponent) -> Result<(), DwtError> {
    encode_tile::<Reversible53>(tilec)
}

/// Perform inverse 5-3 DWT
pub fn dwt_53_inverse(tilec: &mut TileComponent, stop: usize) -> Result<(), DwtError> {
    decode_tile::<Reversible53>(tilec, stop)
}

/// Perform forward 9-7 DWT over all levels of `tilec`
pub fn dwt_97_forward(tilec: &mut TileComponent) -> Result<(), DwtError> {
    encode_tile::<Irreversible97>(tilec)
}

/// Perform inverse 9-7 DWT
pub fn dwt_97_inverse(tilec: &mut TileComponent, stop: usize) -> Result<(), DwtError> {
    decode_tile::<Irreversible97>(tilec, stop)
}

/// Forward DWT of independent tile components, in parallel.
pub fn forward_components(
    components: &mut [TileComponent],
    filter: FilterType,
) -> Result<(), DwtError> {
    components
        .par_iter_mut()
        .try_for_each(|tilec| forward(tilec, filter))
}

/// Inverse DWT of independent tile components, in parallel.
pub fn inverse_components(
    components: &mut [TileComponent],
    stop: usize,
    filter: FilterType,
) -> Result<(), DwtError> {
    components
        .par_iter_mut()
        .try_for_each(|tilec| inverse(tilec, stop, filter))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use log::info;

    use super::*;
    use crate::fixed::FRACTION_BITS;

    fn init_logger() {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Info)
            .try_init();
    }

    /// Sample data similar to Table J.3 (13x17)
    fn table_j3_data() -> TileComponent {
        let sample_data: Vec<Vec<i32>> = vec![
            vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
            vec![1, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
            vec![2, 2, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
            vec![3, 3, 3, 4, 5, 5, 6, 7, 8, 9, 10, 11, 12],
            vec![4, 4, 4, 5, 5, 6, 7, 8, 8, 9, 10, 11, 12],
            vec![5, 5, 5, 5, 6, 7, 7, 8, 9, 10, 11, 12, 13],
            vec![6, 6, 6, 6, 7, 7, 8, 9, 10, 10, 11, 12, 13],
            vec![7, 7, 7, 7, 8, 8, 9, 9, 10, 11, 12, 13, 13],
            vec![8, 8, 8, 8, 8, 9, 10, 10, 11, 12, 12, 13, 14],
            vec![9, 9, 9, 9, 9, 10, 10, 11, 12, 12, 13, 14, 15],
            vec![10, 10, 10, 10, 10, 11, 11, 12, 12, 13, 14, 14, 15],
            vec![11, 11, 11, 11, 11, 12, 12, 13, 13, 14, 14, 15, 16],
            vec![12, 12, 12, 12, 12, 13, 13, 13, 14, 15, 15, 16, 16],
            vec![13, 13, 13, 13, 13, 13, 14, 14, 15, 15, 16, 17, 17],
            vec![14, 14, 14, 14, 14, 14, 15, 15, 16, 16, 17, 17, 18],
            vec![15, 15, 15, 15, 15, 15, 16, 16, 17, 17, 18, 18, 19],
            vec![16, 16, 16, 16, 16, 16, 17, 17, 17, 18, 18, 19, 20],
        ];
        let data: Vec<i32> = sample_data.into_iter().flatten().collect();
        TileComponent::with_levels(Resolution::new(0, 0, 13, 17), data, 3).unwrap()
    }

    #[test]
    fn test_filter_type_enum() {
        let ft1 = FilterType::Reversible53;
        let ft2 = FilterType::Irreversible97;
        assert_ne!(ft1, ft2);
        assert_eq!(FilterType::default(), FilterType::Reversible53);
        assert_eq!(ft1.gain(SubBandType::HH), 2);
        assert_eq!(ft2.gain(SubBandType::HH), 0);
        assert_eq!(ft1.norm(0, SubBandType::LL), 1.0);
        assert_eq!(ft2.norm(1, SubBandType::LH), 3.989);
        assert_eq!(DwtProcessor::new(ft2).filter_type(), ft2);
        assert_eq!(DwtProcessor::default().filter_type(), ft1);
    }

    #[test]
    fn test_subband_type_index() {
        assert_eq!(SubBandType::LL.index(), 0);
        let detail: Vec<usize> = SubBandType::DETAIL.iter().map(|b| b.index()).collect();
        assert_eq!(detail, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_1d_53() {
        // example given in J.10, a single row
        init_logger();
        let samples = [101, 103, 104, 105, 96, 97, 96, 102, 109];
        let level_shift = 1 << 7; // Ssiz = 7
        let signal: Vec<i32> = samples.iter().map(|v| v - level_shift).collect();
        let rect = Resolution::new(0, 0, 9, 1);
        let mut tilec = TileComponent::with_levels(rect, signal.clone(), 2).unwrap();

        dwt_53_forward(&mut tilec).unwrap();
        info!("transformed: {:?}", tilec.data());
        assert_eq!(tilec.data(), &[-26, -22, -30, -32, -19, 1, 5, 1, 0]);

        dwt_53_inverse(&mut tilec, 0).unwrap();
        assert_eq!(tilec.data(), signal.as_slice());
    }

    #[test]
    fn test_2d_roundtrip_53() {
        let data: Vec<i32> = (0..64).collect();
        let mut tilec = TileComponent::with_levels(Resolution::new(0, 0, 8, 8), data.clone(), 2)
            .unwrap();
        let processor = DwtProcessor::new(FilterType::Reversible53);
        processor.round_trip(&mut tilec).unwrap();
        assert_eq!(tilec.data(), data.as_slice());
    }

    #[test]
    fn test_2d_roundtrip_97() {
        let data: Vec<i32> = (0..64).map(|x| x << FRACTION_BITS).collect();
        let mut tilec = TileComponent::with_levels(Resolution::new(0, 0, 8, 8), data.clone(), 2)
            .unwrap();
        let processor = DwtProcessor::new(FilterType::Irreversible97);
        processor.round_trip(&mut tilec).unwrap();
        for (i, (&orig, &recon)) in data.iter().zip(tilec.data()).enumerate() {
            assert_eq!(orig >> FRACTION_BITS, (recon + 4096) >> FRACTION_BITS, "at {}", i);
        }
    }

    #[test]
    fn test_subband_dimensions() {
        // 7x5 input (odd dimensions), one decomposition
        let data: Vec<i32> = (0..35).collect();
        let mut tilec =
            TileComponent::with_levels(Resolution::new(0, 0, 7, 5), data.clone(), 2).unwrap();
        forward(&mut tilec, FilterType::Reversible53).unwrap();

        // LL: ceil(7/2) x ceil(5/2) = 4x3
        // HL: floor(7/2) x ceil(5/2) = 3x3
        // LH: ceil(7/2) x floor(5/2) = 4x2
        // HH: floor(7/2) x floor(5/2) = 3x2
        assert_eq!(tilec.band(0, SubBandType::LL).len(), 4 * 3);
        assert_eq!(tilec.band(1, SubBandType::HL).len(), 3 * 3);
        assert_eq!(tilec.band(1, SubBandType::LH).len(), 4 * 2);
        assert_eq!(tilec.band(1, SubBandType::HH).len(), 3 * 2);

        inverse(&mut tilec, 0, FilterType::Reversible53).unwrap();
        assert_eq!(tilec.data(), data.as_slice());
    }

    #[test]
    fn test_example_data_53() {
        init_logger();
        let original = table_j3_data();
        let mut tilec = original.clone();
        dwt_53_forward(&mut tilec).unwrap();

        // second decomposition level
        let exp2: Vec<(SubBandType, usize, Vec<i32>)> = vec![
            (
                SubBandType::LL,
                0,
                vec![
                    0, 4, 8, 12, 4, 5, 8, 12, 8, 8, 11, 15, 12, 12, 14, 18, 16, 16, 18, 20,
                ],
            ),
            (
                SubBandType::HL,
                1,
                vec![0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0],
            ),
            (
                SubBandType::LH,
                1,
                vec![0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0],
            ),
            (
                SubBandType::HH,
                1,
                vec![-1, 0, 0, 0, -1, 0, 0, 1, 0, 0, 0, 0],
            ),
        ];
        for (orient, resno, exp) in exp2.iter() {
            assert_eq!(exp, &tilec.band(*resno, *orient), "{:?}", orient);
        }

        // first decomposition level
        let exp1: Vec<(SubBandType, Vec<i32>)> = vec![
            (
                SubBandType::HL,
                vec![
                    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, -1, 1, 0, 0,
                    0, 0, 1, 1, 0, 0, 1, 1, 0, -1, 0, 0, 1, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                    0, 0,
                ],
            ),
            (
                SubBandType::LH,
                vec![
                    0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 1, 0, 0,
                    1, 1, 0, 0, 0, 0, 1, 0, 2, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0,
                    0, 1, 1, 0,
                ],
            ),
            (
                SubBandType::HH,
                vec![
                    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0,
                    0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, -1, 0,
                ],
            ),
        ];
        for (orient, exp) in exp1.iter() {
            assert_eq!(exp, &tilec.band(2, *orient), "{:?}", orient);
        }

        dwt_53_inverse(&mut tilec, 0).unwrap();
        for row in 0..tilec.height() {
            for col in 0..tilec.width() {
                assert_eq!(
                    original[(col, row)],
                    tilec[(col, row)],
                    "5-3 mismatch at ({}, {})",
                    col,
                    row
                );
            }
        }
    }

    #[test]
    fn test_example_data_97() {
        let original = table_j3_data();
        let scaled: Vec<i32> = original.data().iter().map(|v| v << FRACTION_BITS).collect();
        let mut tilec =
            TileComponent::new(original.rect(), scaled, original.resolutions().to_vec()).unwrap();

        dwt_97_forward(&mut tilec).unwrap();
        // the smooth ramp leaves almost all energy in LL
        let ll_energy: i64 = tilec
            .band(0, SubBandType::LL)
            .iter()
            .map(|&v| i64::from(v >> FRACTION_BITS).pow(2))
            .sum();
        assert!(ll_energy > 0);

        dwt_97_inverse(&mut tilec, 0).unwrap();
        for row in 0..tilec.height() {
            for col in 0..tilec.width() {
                let recon = (tilec[(col, row)] + 4096) >> FRACTION_BITS;
                assert_eq!(
                    original[(col, row)],
                    recon,
                    "9-7 mismatch at ({}, {})",
                    col,
                    row
                );
            }
        }
    }

    #[test]
    fn test_partial_inverse_keeps_fine_levels() {
        let mut tilec = table_j3_data();
        dwt_53_forward(&mut tilec).unwrap();
        let transformed = tilec.clone();

        dwt_53_inverse(&mut tilec, 1).unwrap();
        // only the 7x9 corner of resolution 1 was touched
        for row in 0..tilec.height() {
            for col in 0..tilec.width() {
                if col >= 7 || row >= 9 {
                    assert_eq!(transformed[(col, row)], tilec[(col, row)]);
                }
            }
        }
    }

    #[test]
    fn test_stop_past_numresolutions_is_noop() {
        let mut tilec = table_j3_data();
        dwt_53_forward(&mut tilec).unwrap();
        let transformed = tilec.data().to_vec();
        for stop in [3, 4, 100] {
            inverse(&mut tilec, stop, FilterType::Reversible53).unwrap();
            assert_eq!(tilec.data(), transformed.as_slice());
        }
        // stop == numresolutions - 1 keeps the coarsest LL as is
        inverse(&mut tilec, 2, FilterType::Irreversible97).unwrap();
        assert_eq!(tilec.data(), transformed.as_slice());
    }

    #[test]
    fn test_single_resolution_is_identity() {
        let data: Vec<i32> = (0..20).map(|v| v * 3 - 11).collect();
        let mut tilec =
            TileComponent::with_levels(Resolution::new(1, 3, 6, 7), data.clone(), 1).unwrap();
        forward(&mut tilec, FilterType::Irreversible97).unwrap();
        assert_eq!(tilec.data(), data.as_slice());
        inverse(&mut tilec, 0, FilterType::Irreversible97).unwrap();
        assert_eq!(tilec.data(), data.as_slice());
    }

    #[test]
    fn test_single_sample_odd_origin() {
        // a lone sample on odd coordinates is high-pass on both axes
        let mut tilec = TileComponent::with_levels(Resolution::new(1, 1, 2, 2), vec![7], 2).unwrap();
        dwt_53_forward(&mut tilec).unwrap();
        assert_eq!(tilec.data(), &[28]);
        dwt_53_inverse(&mut tilec, 0).unwrap();
        assert_eq!(tilec.data(), &[7]);
    }

    #[test]
    fn test_empty_component() {
        let mut tilec = TileComponent::zeroed(Resolution::new(4, 4, 4, 9), 3).unwrap();
        forward(&mut tilec, FilterType::Reversible53).unwrap();
        inverse(&mut tilec, 0, FilterType::Reversible53).unwrap();
        assert!(tilec.data().is_empty());

        let mut flat = TileComponent::zeroed(Resolution::new(0, 0, 5, 0), 2).unwrap();
        forward(&mut flat, FilterType::Irreversible97).unwrap();
        inverse(&mut flat, 0, FilterType::Irreversible97).unwrap();
        assert!(flat.data().is_empty());
    }

    #[test]
    fn test_components_in_parallel() {
        let mut components: Vec<TileComponent> = (0..4).map(|_| table_j3_data()).collect();
        forward_components(&mut components, FilterType::Reversible53).unwrap();

        let mut single = table_j3_data();
        forward(&mut single, FilterType::Reversible53).unwrap();
        for tilec in &components {
            assert_eq!(tilec.data(), single.data());
        }

        inverse_components(&mut components, 0, FilterType::Reversible53).unwrap();
        let original = table_j3_data();
        for tilec in &components {
            assert_eq!(tilec.data(), original.data());
        }
    }
}
