//! Versioned table of time-scale and Earth-orientation constants.
//!
//! Every ΔT and obliquity evaluation in the workspace reads its coefficients
//! from here. Bump [`MODEL_VERSION`] whenever a coefficient changes so that
//! persisted results can be traced back to the model that produced them.
//!
//! Sources:
//! - ΔT: Espenak & Meeus (2006), "Five Millennium Canon of Solar Eclipses",
//!   polynomial expressions for ΔT. Public domain (NASA).
//! - Obliquity: IAU 2006 (Hilton et al. 2006), IERS Conventions 2010, Eq. 5.40.

/// Identifier of the constants set below.
pub const MODEL_VERSION: &str = "iau2006+espenak-meeus-2006/v1";

/// Julian Date of J2000.0 (2000-01-01T12:00:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Date of the Unix epoch (1970-01-01T00:00:00 UTC).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Seconds in one day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days in one Julian century.
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Days in one Julian millennium.
pub const DAYS_PER_JULIAN_MILLENNIUM: f64 = 365_250.0;

/// IAU 2006 mean obliquity polynomial, arcseconds, ascending powers of T
/// (Julian centuries of TT since J2000.0).
pub const OBLIQUITY_IAU2006_ARCSEC: [f64; 6] = [
    84_381.406,
    -46.836_769,
    -0.000_183_1,
    0.002_003_40,
    -0.000_000_576,
    -0.000_000_043_4,
];

/// One segment of the piecewise ΔT model.
///
/// ΔT = Σ coeffs[i] · u^i, with u = (year − origin) / scale, valid for
/// `start <= year < end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaTSegment {
    pub start: f64,
    pub end: f64,
    pub origin: f64,
    pub scale: f64,
    pub coeffs: &'static [f64],
}

/// Espenak & Meeus ΔT segments between −500 and +2050.
///
/// Outside this range the long-term parabola (plus the 2050–2150 blend) in
/// [`crate::delta_t`] applies.
#[rustfmt::skip]
pub const DELTA_T_SEGMENTS: [DeltaTSegment; 12] = [
    DeltaTSegment { start: -500.0, end: 500.0, origin: 0.0, scale: 100.0,
        coeffs: &[10583.6, -1014.41, 33.78311, -5.952053, -0.1798452, 0.022174192, 0.0090316521] },
    DeltaTSegment { start: 500.0, end: 1600.0, origin: 1000.0, scale: 100.0,
        coeffs: &[1574.2, -556.01, 71.23472, 0.319781, -0.8503463, -0.005050998, 0.0083572073] },
    DeltaTSegment { start: 1600.0, end: 1700.0, origin: 1600.0, scale: 1.0,
        coeffs: &[120.0, -0.9808, -0.01532, 1.0 / 7129.0] },
    DeltaTSegment { start: 1700.0, end: 1800.0, origin: 1700.0, scale: 1.0,
        coeffs: &[8.83, 0.1603, -0.0059285, 0.00013336, -1.0 / 1_174_000.0] },
    DeltaTSegment { start: 1800.0, end: 1860.0, origin: 1800.0, scale: 1.0,
        coeffs: &[13.72, -0.332447, 0.0068612, 0.0041116, -0.00037436, 0.0000121272,
                  -0.0000001699, 0.000000000875] },
    DeltaTSegment { start: 1860.0, end: 1900.0, origin: 1860.0, scale: 1.0,
        coeffs: &[7.62, 0.5737, -0.251754, 0.01680668, -0.0004473624, 1.0 / 233_174.0] },
    DeltaTSegment { start: 1900.0, end: 1920.0, origin: 1900.0, scale: 1.0,
        coeffs: &[-2.79, 1.494119, -0.0598939, 0.0061966, -0.000197] },
    DeltaTSegment { start: 1920.0, end: 1941.0, origin: 1920.0, scale: 1.0,
        coeffs: &[21.20, 0.84493, -0.076100, 0.0020936] },
    DeltaTSegment { start: 1941.0, end: 1961.0, origin: 1950.0, scale: 1.0,
        coeffs: &[29.07, 0.407, -1.0 / 233.0, 1.0 / 2547.0] },
    DeltaTSegment { start: 1961.0, end: 1986.0, origin: 1975.0, scale: 1.0,
        coeffs: &[45.45, 1.067, -1.0 / 260.0, -1.0 / 718.0] },
    DeltaTSegment { start: 1986.0, end: 2005.0, origin: 2000.0, scale: 1.0,
        coeffs: &[63.86, 0.3345, -0.060374, 0.0017275, 0.000651814, 0.00002373599] },
    DeltaTSegment { start: 2005.0, end: 2050.0, origin: 2000.0, scale: 1.0,
        coeffs: &[62.92, 0.32217, 0.005589] },
];
