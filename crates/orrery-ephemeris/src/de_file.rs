//! DE-style binary planetary ephemeris loader.
//!
//! The on-disk layout is the fixed-offset header of a JPL development
//! ephemeris: three 84-byte title lines, 400 six-byte constant names,
//! the time span and record step in Julian days (here relative to J2000),
//! the constant count, AU and Earth/Moon mass ratio, and the coefficient
//! pointer tables. The first pointer table covers the nine planets, the
//! Moon, the Sun, and Earth nutation; the lunar-libration row follows the
//! DE version word. When the constant count exceeds 400, the overflow
//! names are followed by a third pointer group (lunar mantle angular
//! velocity and TT-TDB).
//!
//! Data records are `2 + record_coefficient_count` doubles wide: two
//! reserved doubles, then per-item Chebyshev coefficient blocks at the
//! offsets the pointer tables declare, laid out sub-interval-major and
//! component-minor. The header occupies the first two record slots.
//!
//! Byte order: the DE version word is probed at its fixed offset; if its
//! upper 16 bits are nonzero the file was written with the opposite byte
//! order and every subsequent 32- and 64-bit read is swapped.

use std::path::Path;

use tracing::debug;

use orrery_frames::BodyId;

use crate::error::EphemerisError;
use crate::trajectory::{Ephemeris, Trajectory};

/// Conventional body ids assigned by the loader, in DE item order.
pub const MERCURY: BodyId = BodyId(0);
pub const VENUS: BodyId = BodyId(1);
pub const EARTH_MOON_BARYCENTER: BodyId = BodyId(2);
pub const MARS: BodyId = BodyId(3);
pub const JUPITER: BodyId = BodyId(4);
pub const SATURN: BodyId = BodyId(5);
pub const URANUS: BodyId = BodyId(6);
pub const NEPTUNE: BodyId = BodyId(7);
pub const PLUTO: BodyId = BodyId(8);
pub const MOON: BodyId = BodyId(9);
pub const SUN: BodyId = BodyId(10);

const TITLE_BYTES: usize = 3 * 84;
const NAME_BYTES: usize = 6;
const BASE_CONSTANT_SLOTS: usize = 400;

/// Byte offsets of the fixed header fields.
const SS_OFFSET: usize = TITLE_BYTES + BASE_CONSTANT_SLOTS * NAME_BYTES; // 2652
const NCON_OFFSET: usize = SS_OFFSET + 3 * 8; // 2676
const AU_OFFSET: usize = NCON_OFFSET + 4; // 2680
const EMRAT_OFFSET: usize = AU_OFFSET + 8; // 2688
const IPT_OFFSET: usize = EMRAT_OFFSET + 8; // 2696, 12 rows * 3 i32
const NUMDE_OFFSET: usize = IPT_OFFSET + 12 * 3 * 4; // 2840
const LPT_OFFSET: usize = NUMDE_OFFSET + 4; // 2844
const FIXED_HEADER_END: usize = LPT_OFFSET + 3 * 4; // 2856

/// Number of interpolated items a DE file can carry.
const ITEM_COUNT: usize = 15;

/// Cartesian (or angular) components per item: 11 position items,
/// 2 nutation angles, 3 libration angles, 3 mantle angular velocity
/// components, 1 time correction.
const ITEM_COMPONENTS: [usize; ITEM_COUNT] = [3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 2, 3, 3, 1];

const SECONDS_PER_DAY: f64 = 86_400.0;
const METERS_PER_KM: f64 = 1_000.0;

/// One row of a pointer table.
#[derive(Clone, Copy, Debug, Default)]
struct ItemPointer {
    /// 1-based offset into a record's coefficient area.
    offset: usize,
    /// Chebyshev coefficients per component.
    coeffs: usize,
    /// Sub-intervals per record.
    sub_intervals: usize,
}

impl ItemPointer {
    fn present(&self) -> bool {
        self.coeffs > 0 && self.sub_intervals > 0 && self.offset > 0
    }

    fn span(&self, components: usize) -> usize {
        components * self.coeffs * self.sub_intervals
    }
}

/// Cursor over the raw bytes with lazy byte-order swapping.
struct Reader<'a> {
    bytes: &'a [u8],
    swap: bool,
}

impl<'a> Reader<'a> {
    fn require(&self, offset: usize, len: usize) -> Result<(), EphemerisError> {
        if offset + len > self.bytes.len() {
            return Err(EphemerisError::TruncatedHeader {
                len: self.bytes.len(),
                needed: offset + len,
            });
        }
        Ok(())
    }

    fn u32_at(&self, offset: usize) -> Result<u32, EphemerisError> {
        self.require(offset, 4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.bytes[offset..offset + 4]);
        Ok(if self.swap {
            u32::from_be_bytes(raw)
        } else {
            u32::from_le_bytes(raw)
        })
    }

    fn f64_at(&self, offset: usize) -> Result<f64, EphemerisError> {
        self.require(offset, 8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.bytes[offset..offset + 8]);
        Ok(if self.swap {
            f64::from_be_bytes(raw)
        } else {
            f64::from_le_bytes(raw)
        })
    }

    fn pointer_at(&self, offset: usize) -> Result<ItemPointer, EphemerisError> {
        Ok(ItemPointer {
            offset: self.u32_at(offset)? as usize,
            coeffs: self.u32_at(offset + 4)? as usize,
            sub_intervals: self.u32_at(offset + 8)? as usize,
        })
    }
}

/// Load a DE-style binary ephemeris from a file.
pub fn load_de_file(path: &Path) -> Result<Ephemeris, EphemerisError> {
    let bytes = std::fs::read(path)?;
    load_de_bytes(&bytes)
}

/// Parse a DE-style binary ephemeris from memory.
///
/// Header times are Julian days relative to J2000, coefficients km; the
/// resulting [`Ephemeris`] is seconds-since-J2000 and meters. Only the
/// eleven 3-component position items become trajectories; nutation,
/// libration, mantle velocity, and TT-TDB blocks are parsed for record
/// accounting but not interpolated.
pub fn load_de_bytes(bytes: &[u8]) -> Result<Ephemeris, EphemerisError> {
    // Probe the version word to settle byte order before trusting any
    // other field.
    let probe = Reader { bytes, swap: false };
    let numde_native = probe.u32_at(NUMDE_OFFSET)?;
    let swap = numde_native & 0xFFFF_0000 != 0;
    let reader = Reader { bytes, swap };

    let start_days = reader.f64_at(SS_OFFSET)?;
    let end_days = reader.f64_at(SS_OFFSET + 8)?;
    let step_days = reader.f64_at(SS_OFFSET + 16)?;
    let ncon = reader.u32_at(NCON_OFFSET)? as usize;
    let numde = reader.u32_at(NUMDE_OFFSET)?;

    if !(step_days > 0.0) || !(end_days > start_days) {
        return Err(EphemerisError::InvalidHeader("non-positive time span or step"));
    }

    let mut items = [ItemPointer::default(); ITEM_COUNT];
    for (i, item) in items.iter_mut().take(12).enumerate() {
        *item = reader.pointer_at(IPT_OFFSET + i * 12)?;
    }
    items[12] = reader.pointer_at(LPT_OFFSET)?;

    // The third pointer group follows any overflow constant names.
    let mut header_end = FIXED_HEADER_END;
    if ncon > BASE_CONSTANT_SLOTS {
        header_end += (ncon - BASE_CONSTANT_SLOTS) * NAME_BYTES;
        items[13] = reader.pointer_at(header_end)?;
        items[14] = reader.pointer_at(header_end + 12)?;
        header_end += 2 * 12;
    }

    // Record width: the furthest coefficient any item reaches.
    let mut record_coefficients = 0usize;
    for (i, item) in items.iter().enumerate() {
        if !item.present() {
            continue;
        }
        record_coefficients =
            record_coefficients.max(item.offset - 1 + item.span(ITEM_COMPONENTS[i]));
    }
    if record_coefficients == 0 {
        return Err(EphemerisError::InvalidHeader("no interpolated items"));
    }

    let record_doubles = 2 + record_coefficients;
    let record_bytes = record_doubles * 8;

    // The header and constant values occupy the first two record slots.
    let data_offset = 2 * record_bytes;
    if data_offset < header_end {
        return Err(EphemerisError::InvalidHeader("record too small to hold header"));
    }
    if bytes.len() < data_offset
        || (bytes.len() - data_offset) % record_bytes != 0
    {
        return Err(EphemerisError::RecordSizeMismatch {
            record_bytes,
            file_bytes: bytes.len().saturating_sub(data_offset),
        });
    }

    let record_count = (bytes.len() - data_offset) / record_bytes;
    let expected_records = ((end_days - start_days) / step_days).round() as usize;
    if record_count != expected_records {
        return Err(EphemerisError::RecordSizeMismatch {
            record_bytes,
            file_bytes: bytes.len() - data_offset,
        });
    }

    debug!(
        version = numde,
        records = record_count,
        coefficients = record_coefficients,
        swapped = swap,
        "parsed ephemeris header"
    );

    // Decode the position items into trajectories.
    let mut trajectories = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if ITEM_COMPONENTS[i] != 3 || i > 10 || !item.present() {
            continue;
        }
        if item.offset - 1 + item.span(3) > record_coefficients {
            return Err(EphemerisError::PointerOutOfBounds {
                item: i,
                offset: item.offset,
                record_len: record_coefficients,
            });
        }

        let mut coeffs = Vec::with_capacity(record_count * item.span(3));
        for record in 0..record_count {
            let record_base = data_offset + record * record_bytes;
            // Skip the two reserved doubles, then the item's 1-based offset.
            let item_base = record_base + (2 + item.offset - 1) * 8;
            for value_index in 0..item.span(3) {
                let raw = reader.f64_at(item_base + value_index * 8)?;
                coeffs.push(raw * METERS_PER_KM);
            }
        }

        let t0 = start_days * SECONDS_PER_DAY;
        let t1 = end_days * SECONDS_PER_DAY;
        let dt = step_days * SECONDS_PER_DAY / item.sub_intervals as f64;
        trajectories.push(Trajectory::new(
            BodyId(i as u32),
            t0,
            t1,
            dt,
            item.coeffs,
            coeffs,
        ));
    }

    Ok(Ephemeris::new(trajectories))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a minimal single-item file: Mercury only, `ncoeff`
    /// coefficients per component, one sub-interval per record.
    struct FileBuilder {
        start_days: f64,
        end_days: f64,
        step_days: f64,
        ncoeff: usize,
        big_endian: bool,
    }

    impl FileBuilder {
        fn record_doubles(&self) -> usize {
            2 + 3 * self.ncoeff
        }

        fn put_u32(&self, buf: &mut [u8], offset: usize, value: u32) {
            let raw = if self.big_endian {
                value.to_be_bytes()
            } else {
                value.to_le_bytes()
            };
            buf[offset..offset + 4].copy_from_slice(&raw);
        }

        fn put_f64(&self, buf: &mut [u8], offset: usize, value: f64) {
            let raw = if self.big_endian {
                value.to_be_bytes()
            } else {
                value.to_le_bytes()
            };
            buf[offset..offset + 8].copy_from_slice(&raw);
        }

        /// `coeff_fn(record, component, k)` supplies each Chebyshev
        /// coefficient in km.
        fn build(&self, coeff_fn: impl Fn(usize, usize, usize) -> f64) -> Vec<u8> {
            let record_bytes = self.record_doubles() * 8;
            let records = ((self.end_days - self.start_days) / self.step_days).round() as usize;
            let mut buf = vec![0u8; (2 + records) * record_bytes];

            self.put_f64(&mut buf, SS_OFFSET, self.start_days);
            self.put_f64(&mut buf, SS_OFFSET + 8, self.end_days);
            self.put_f64(&mut buf, SS_OFFSET + 16, self.step_days);
            self.put_u32(&mut buf, NCON_OFFSET, 4);
            // A DE version number below 2^16 keeps the swap probe honest.
            self.put_u32(&mut buf, NUMDE_OFFSET, 440);
            // Mercury row: offset 1, ncoeff, one sub-interval.
            self.put_u32(&mut buf, IPT_OFFSET, 1);
            self.put_u32(&mut buf, IPT_OFFSET + 4, self.ncoeff as u32);
            self.put_u32(&mut buf, IPT_OFFSET + 8, 1);

            for record in 0..records {
                let base = (2 + record) * record_bytes;
                for component in 0..3 {
                    for k in 0..self.ncoeff {
                        let offset = base + (2 + component * self.ncoeff + k) * 8;
                        self.put_f64(&mut buf, offset, coeff_fn(record, component, k));
                    }
                }
            }
            buf
        }
    }

    fn builder(big_endian: bool) -> FileBuilder {
        FileBuilder {
            start_days: -16.0,
            end_days: 16.0,
            step_days: 8.0,
            // Large enough that two records cover the fixed header.
            ncoeff: 80,
            big_endian,
        }
    }

    /// Constant 1000 km on x, zero elsewhere.
    fn constant_coeffs(_record: usize, component: usize, k: usize) -> f64 {
        if component == 0 && k == 0 { 1000.0 } else { 0.0 }
    }

    #[test]
    fn test_parse_little_endian() {
        let eph = load_de_bytes(&builder(false).build(constant_coeffs)).expect("parse");
        assert!(eph.covers(MERCURY));
        assert!(!eph.covers(SUN));

        let (t0, t1) = eph.trajectory(MERCURY).expect("mercury").valid_range();
        assert_eq!(t0, -16.0 * 86_400.0);
        assert_eq!(t1, 16.0 * 86_400.0);

        // 1000 km in the file comes out as 1e6 m.
        let pos = eph.position_at(MERCURY, 0.0).expect("in range").inner();
        assert!((pos.x - 1.0e6).abs() < 1e-6, "x = {}", pos.x);
        assert_eq!(pos.y, 0.0);
    }

    #[test]
    fn test_byte_swapped_file_parses_identically() {
        let le = load_de_bytes(&builder(false).build(constant_coeffs)).expect("LE");
        let be = load_de_bytes(&builder(true).build(constant_coeffs)).expect("BE");
        let t_le = le.position_at(MERCURY, 12_345.0).expect("LE pos").inner();
        let t_be = be.position_at(MERCURY, 12_345.0).expect("BE pos").inner();
        assert_eq!(t_le, t_be);
    }

    #[test]
    fn test_record_size_mismatch_is_rejected() {
        let mut bytes = builder(false).build(constant_coeffs);
        // Chop half a record off the end.
        let cut = bytes.len() - 100;
        bytes.truncate(cut);
        assert!(matches!(
            load_de_bytes(&bytes),
            Err(EphemerisError::RecordSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_truncated_header_is_rejected() {
        let bytes = vec![0u8; 128];
        assert!(matches!(
            load_de_bytes(&bytes),
            Err(EphemerisError::TruncatedHeader { .. })
        ));
    }

    #[test]
    fn test_inverted_time_span_is_rejected() {
        let mut b = builder(false);
        b.end_days = -32.0;
        // A degenerate span also breaks the record count, but the header
        // check must fire first.
        let mut bytes = b.build(constant_coeffs);
        bytes.truncate(2 * b.record_doubles() * 8);
        assert!(matches!(
            load_de_bytes(&bytes),
            Err(EphemerisError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_sub_interval_boundaries_continuous() {
        // Per-record linear motion in km: x = record * 8 days of drift;
        // encode x(u) = base + slope * u with u in [0, 1] as Chebyshev
        // c0 = base + slope/2, c1 = slope/2.
        let slope_km = 100.0;
        let eph = load_de_bytes(&builder(false).build(|record, component, k| {
            if component != 0 {
                return 0.0;
            }
            let base = record as f64 * slope_km;
            match k {
                0 => base + slope_km / 2.0,
                1 => slope_km / 2.0,
                _ => 0.0,
            }
        }))
        .expect("parse");

        let boundary = -8.0 * 86_400.0;
        let left = eph.position_at(MERCURY, boundary - 1e-3).expect("left").inner();
        let right = eph.position_at(MERCURY, boundary).expect("right").inner();
        assert!(
            (left.x - right.x).abs() < 1.0,
            "jump of {} m across record boundary",
            (left.x - right.x).abs()
        );
    }
}
