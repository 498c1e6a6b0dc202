//! Proleptic Gregorian calendar ↔ Julian Date.
//!
//! Source: Meeus, "Astronomical Algorithms" (2nd ed), Chapter 7. The
//! Gregorian branch is used for every date, so dates before 1582-Oct-15 are
//! interpreted in the proleptic Gregorian calendar.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Timelike, Utc};

use crate::constants::{
    DAYS_PER_JULIAN_CENTURY, DAYS_PER_JULIAN_MILLENNIUM, J2000_JD, SECONDS_PER_DAY,
};
use crate::error::TimeError;

/// Julian Date from a proleptic Gregorian calendar date.
///
/// `day` may carry a fractional part: 1.5 is noon on the first of the month.
pub fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };
    let y = y as f64;
    let m = m as f64;
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day + b - 1524.5
}

/// Proleptic Gregorian calendar date from a Julian Date.
///
/// Returns `(year, month, day_with_fraction)`.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let z = (jd + 0.5).floor();
    let f = jd + 0.5 - z;
    let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
    let a = z + 1.0 + alpha - (alpha / 4.0).floor();
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };
    (year as i32, month as u32, day)
}

/// Julian Day Number (the integer JD at noon) of a civil date.
pub fn julian_day_number(year: i32, month: u32, day: u32) -> i64 {
    calendar_to_jd(year, month, day as f64 + 0.5).round() as i64
}

/// Julian Date (UT) of a UTC instant.
pub fn date_to_jd(instant: &DateTime<Utc>) -> f64 {
    let secs = instant.num_seconds_from_midnight() as f64
        + instant.nanosecond() as f64 / 1e9;
    let day = instant.day() as f64 + secs / SECONDS_PER_DAY;
    calendar_to_jd(instant.year(), instant.month(), day)
}

/// UTC instant of a Julian Date (UT), rounded to the microsecond.
pub fn jd_to_date(jd: f64) -> Result<DateTime<Utc>, TimeError> {
    if !jd.is_finite() {
        return Err(TimeError::InvalidDate(format!("non-finite Julian Date {jd}")));
    }
    let (year, month, day_frac) = jd_to_calendar(jd);
    let day = day_frac.floor();
    let micros = ((day_frac - day) * SECONDS_PER_DAY * 1e6).round() as i64;
    let date = NaiveDate::from_ymd_opt(year, month, day as u32)
        .ok_or_else(|| TimeError::InvalidDate(format!("JD {jd} -> {year}-{month}-{day}")))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| TimeError::InvalidDate(format!("JD {jd}")))?;
    Ok((midnight + TimeDelta::microseconds(micros)).and_utc())
}

/// Julian centuries since J2000.0.
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_JULIAN_CENTURY
}

/// Julian millennia since J2000.0 (the VSOP87 time argument τ).
pub fn millennia_since_j2000(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_JULIAN_MILLENNIUM
}

/// Decimal year of a Julian Date, used as the ΔT argument.
pub fn decimal_year(jd: f64) -> f64 {
    let (year, month, _) = jd_to_calendar(jd);
    year as f64 + (month as f64 - 0.5) / 12.0
}
