//! Equation of time and true (apparent) solar time.

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Timelike, Utc};

const MINUTES_PER_DAY: f64 = 1440.0;

/// Equation of time in minutes (apparent minus mean solar time).
///
/// NOAA low-precision form, good to about 30 s:
/// B = 2π(N − 81)/364, EoT = 9.87 sin 2B − 7.53 cos B − 1.5 sin B.
pub fn equation_of_time_minutes(day_of_year: u32) -> f64 {
    let b = 2.0 * PI * (day_of_year as f64 - 81.0) / 364.0;
    9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()
}

/// True solar time at east longitude `longitude_deg`, minutes after local
/// apparent midnight in [0, 1440).
pub fn true_solar_time_minutes(utc: &DateTime<Utc>, longitude_deg: f64) -> f64 {
    let utc_minutes = utc.num_seconds_from_midnight() as f64 / 60.0;
    let tst = utc_minutes + longitude_deg * 4.0 + equation_of_time_minutes(utc.ordinal());
    tst.rem_euclid(MINUTES_PER_DAY)
}
